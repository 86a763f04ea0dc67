//! Chunk codec for ZTR DNA sequencer trace files
//!
//! A ZTR file stores one sequencing read as a series of tagged chunks:
//! basecalls, peak positions, a clip range, per-channel confidences, trace
//! samples and free-text comments. This crate reads and writes those chunks
//! and assembles them into a [`ChromatogramRecord`].
//!
//! ## Key Components
//!
//! - [`ChromatogramRecord`]: the decoded read, built with [`ChromatogramBuilder`]
//! - [`ChunkTag`]: the six chunk types and their codecs
//! - [`ChunkReader`]: framing, byte-order fallback and transform unwrapping
//! - [`read_chromatogram`] / [`write_chromatogram`]: whole files
//!
//! ## Usage Examples
//!
//! ```
//! use ztr_codec::{Channels, ChromatogramRecord, DecodeConfig, read_chromatogram, write_chromatogram};
//!
//! let record = ChromatogramRecord::builder()
//!     .with_basecalls("ACGT")
//!     .with_peak_positions(vec![5, 12, 20, 27])
//!     .with_confidence(Channels::new(
//!         vec![30, 1, 1, 1],
//!         vec![1, 30, 1, 1],
//!         vec![1, 1, 30, 1],
//!         vec![1, 1, 1, 30],
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let mut file = Vec::new();
//! write_chromatogram(&mut file, &record).unwrap();
//!
//! let decoded = read_chromatogram(&mut file.as_slice(), &DecodeConfig::default()).unwrap();
//! assert_eq!(decoded.basecalls(), Some("ACGT"));
//! ```
//!
//! Single chunks can be handled without the file container:
//!
//! ```
//! use ztr_codec::{ChromatogramRecord, ChunkReader, ChunkTag, DecodeConfig, encode_chunk, write_chunk};
//!
//! let record = ChromatogramRecord::builder().with_basecalls("GATTACA").build().unwrap();
//! let payload = encode_chunk(ChunkTag::Basecalls, &record).unwrap();
//!
//! let mut stream = Vec::new();
//! write_chunk(&mut stream, ChunkTag::Basecalls, &payload).unwrap();
//!
//! let reader = ChunkReader::new(DecodeConfig::default());
//! let chunk = reader
//!     .read_chunk(&mut stream.as_slice(), &ChromatogramRecord::builder())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(chunk.tag, ChunkTag::Basecalls);
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-export dependencies that are part of our public API
pub use bytes;
pub use ztr_transforms as transforms;

pub mod chunk;
mod config;
pub mod error;
pub mod file;
pub mod frame;
pub mod record;

pub use config::{DEFAULT_MAX_TRANSFORM_LAYERS, DecodeConfig};
pub use error::{Result, ZtrError};

pub use chunk::{
    ChunkCodec, ChunkData, ChunkDecodeError, ChunkEncodeError, ChunkTag, DecodedChunk, TagBytes,
    encode_chunk,
};
pub use file::{read_chromatogram, read_chromatogram_with, write_chromatogram};
pub use frame::{ChunkReader, decode_chunk, encode_frame, write_chunk};
pub use record::{
    Channel, Channels, ChromatogramBuilder, ChromatogramRecord, ClipRange, Comments, RecordError,
};
