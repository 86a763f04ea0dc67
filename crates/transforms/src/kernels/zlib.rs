//! zlib layer.
//!
//! Layout: format byte, decoded length (4 bytes, little-endian), zlib stream.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use super::MAX_PREALLOCATION;
use crate::error::{Result, TransformError};
use crate::TransformKind;

const HEADER_LEN: usize = 5;

/// Strip one zlib layer.
pub fn invert(buf: &[u8]) -> Result<Vec<u8>> {
    const KIND: TransformKind = TransformKind::Zlib;

    if buf.len() < HEADER_LEN {
        return Err(TransformError::truncated(KIND, HEADER_LEN, buf.len()));
    }
    let expected = LittleEndian::read_u32(&buf[1..HEADER_LEN]) as usize;

    let mut out = Vec::with_capacity(expected.min(MAX_PREALLOCATION));
    // one byte past the declared size is enough to detect an oversized stream
    ZlibDecoder::new(&buf[HEADER_LEN..])
        .take(expected as u64 + 1)
        .read_to_end(&mut out)?;

    if out.len() != expected {
        return Err(TransformError::length_mismatch(KIND, expected, out.len()));
    }
    Ok(out)
}

/// Wrap `data` in a zlib layer.
///
/// # Errors
///
/// Fails when `data` is too long for the 32-bit length field, or on an
/// encoder failure.
pub fn apply(data: &[u8], level: Compression) -> Result<Vec<u8>> {
    let declared = u32::try_from(data.len())
        .map_err(|_| TransformError::too_large(TransformKind::Zlib, data.len()))?;
    let mut header = [0u8; HEADER_LEN];
    header[0] = TransformKind::Zlib.format_byte();
    LittleEndian::write_u32(&mut header[1..], declared);

    let mut encoder = ZlibEncoder::new(header.to_vec(), level);
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
