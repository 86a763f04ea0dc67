//! Error types for the ztr-codec crate
//!
//! The crate uses a two-level error hierarchy:
//!
//! - [`ZtrError`]: the top-level error returned by whole-file operations
//! - Component errors: [`ChunkDecodeError`], [`ChunkEncodeError`] and
//!   [`RecordError`], returned by the per-chunk and record APIs
//!
//! ```
//! use ztr_codec::{ChunkDecodeError, ZtrError, read_chromatogram, DecodeConfig};
//!
//! let bytes = b"not a ztr file";
//! match read_chromatogram(&mut &bytes[..], &DecodeConfig::default()) {
//!     Err(ZtrError::BadMagic(magic)) => println!("bad magic {magic:02x?}"),
//!     Err(ZtrError::Decode(ChunkDecodeError::UnknownChunkTag(tag))) => println!("unknown {tag}"),
//!     Err(e) => println!("other error: {e}"),
//!     Ok(record) => println!("{:?} bases", record.num_bases()),
//! }
//! ```

use thiserror::Error;

use crate::chunk::{ChunkDecodeError, ChunkEncodeError};
use crate::record::RecordError;

/// Result type for whole-file operations
pub type Result<T> = std::result::Result<T, ZtrError>;

/// Main error type for the ztr-codec crate
#[derive(Error, Debug)]
pub enum ZtrError {
    /// A chunk could not be read or decoded
    #[error(transparent)]
    Decode(#[from] ChunkDecodeError),

    /// A chunk could not be encoded
    #[error(transparent)]
    Encode(#[from] ChunkEncodeError),

    /// The decoded fields are inconsistent
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The stream does not start with the ZTR magic number
    #[error("Not a ZTR file: magic {0:02x?}")]
    BadMagic([u8; 8]),

    /// Input/output errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
