//! Whole-file reading and writing
//!
//! A ZTR file is an 8-byte magic number, a two-byte version, and a sequence
//! of chunks running to the end of the stream.

use std::io::{Read, Write};

use log::{debug, warn};
use ztr_transforms::TransformRegistry;

use crate::DecodeConfig;
use crate::chunk::ChunkTag;
use crate::error::{Result, ZtrError};
use crate::frame::{ChunkReader, write_chunk};
use crate::record::ChromatogramRecord;

/// Leading bytes of every ZTR file.
pub const MAGIC: [u8; 8] = [0xae, b'Z', b'T', b'R', 0x0d, 0x0a, 0x1a, 0x0a];

/// Major format version written and expected.
pub const VERSION_MAJOR: u8 = 1;

/// Minor format version written.
pub const VERSION_MINOR: u8 = 2;

/// Read a complete chromatogram.
///
/// Chunks are applied to the record in file order; a `CNF4` chunk must
/// follow the `BASE` chunk. Any chunk error aborts the read.
///
/// # Errors
///
/// Returns [`ZtrError::BadMagic`] for a foreign file, the first chunk error
/// encountered, or a [`RecordError`](crate::RecordError) if the decoded
/// fields are inconsistent.
pub fn read_chromatogram<R: Read>(reader: &mut R, config: &DecodeConfig) -> Result<ChromatogramRecord> {
    read_chromatogram_with(reader, &ChunkReader::new(*config))
}

/// [`read_chromatogram`] with a custom chunk reader.
///
/// # Errors
///
/// As for [`read_chromatogram`].
pub fn read_chromatogram_with<R: Read, T: TransformRegistry>(
    reader: &mut R,
    chunks: &ChunkReader<T>,
) -> Result<ChromatogramRecord> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ZtrError::BadMagic(magic));
    }
    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    if version[0] != VERSION_MAJOR {
        warn!("unexpected ZTR version {}.{}, decoding anyway", version[0], version[1]);
    }

    let mut builder = ChromatogramRecord::builder();
    let mut count = 0usize;
    while let Some(chunk) = chunks.read_chunk(reader, &builder)? {
        builder.apply(chunk.data);
        count += 1;
    }
    debug!("read {count} chunks from ZTR {}.{} file", version[0], version[1]);

    Ok(builder.build()?)
}

/// Write a complete chromatogram.
///
/// Chunks are written as `BASE`, `BPOS`, `CLIP`, `CNF4`, `SMP4`, `TEXT`.
/// Absent fields are skipped, except `CLIP`, which is always written.
/// Payloads are written untransformed.
///
/// # Errors
///
/// Returns the first chunk encode error or write failure.
pub fn write_chromatogram<W: Write>(writer: &mut W, record: &ChromatogramRecord) -> Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[VERSION_MAJOR, VERSION_MINOR])?;

    for tag in ChunkTag::WRITE_ORDER {
        if !has_field(tag, record) {
            continue;
        }
        let payload = tag.encode(record)?;
        write_chunk(writer, tag, &payload)?;
    }
    Ok(())
}

fn has_field(tag: ChunkTag, record: &ChromatogramRecord) -> bool {
    match tag {
        ChunkTag::Basecalls => record.basecalls().is_some(),
        ChunkTag::Positions => record.peak_positions().is_some(),
        ChunkTag::Clip => true,
        ChunkTag::Confidence => record.confidence().is_some(),
        ChunkTag::Samples => record.samples().is_some(),
        ChunkTag::Comments => record.comments().is_some(),
    }
}
