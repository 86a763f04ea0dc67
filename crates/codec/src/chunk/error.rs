use std::io;

use thiserror::Error;
use ztr_transforms::TransformError;

use super::tag::{ChunkTag, TagBytes};
use crate::record::Channel;

/// Result type for chunk decoding
pub(crate) type DecodeResult<T> = std::result::Result<T, ChunkDecodeError>;

/// Result type for chunk encoding
pub(crate) type EncodeResult<T> = std::result::Result<T, ChunkEncodeError>;

/// Errors raised while reading or decoding a single chunk
///
/// Every variant fails the whole chunk; there is no partial result.
#[derive(Error, Debug)]
pub enum ChunkDecodeError {
    /// The stream ended before a declared length was satisfied
    #[error("Truncated {tag} chunk: {what} needs {expected} bytes, stream had {actual}")]
    TruncatedStream {
        tag: TagBytes,
        what: &'static str,
        expected: u64,
        actual: u64,
    },

    /// The payload size does not fit the chunk's layout
    #[error("{tag} payload size mismatch: expected {expected}, got {actual} bytes")]
    SizeMismatch {
        tag: ChunkTag,
        expected: &'static str,
        actual: usize,
    },

    /// The tag names no known chunk type
    #[error("Unknown chunk type: {0}")]
    UnknownChunkTag(TagBytes),

    /// Text content is not valid for the chunk
    #[error("Invalid text in {tag} chunk: {reason}")]
    InvalidEncoding { tag: ChunkTag, reason: String },

    /// A length word is negative in both byte orders
    #[error("Invalid {field} length {bytes:02x?} in {tag} chunk")]
    InvalidLength {
        tag: TagBytes,
        field: &'static str,
        bytes: [u8; 4],
    },

    /// The chunk depends on a field that has not been decoded yet
    #[error("{tag} chunk requires {field} to be decoded first")]
    MissingField {
        tag: ChunkTag,
        field: &'static str,
    },

    /// Transform unwrapping hit the layer limit or revisited a buffer
    #[error("{tag} chunk transform unwrapping stopped after {layers} layers")]
    TransformCycleExceeded { tag: ChunkTag, layers: usize },

    /// A transform layer could not be inverted
    #[error("Transform error in {tag} chunk: {source}")]
    Transform {
        tag: ChunkTag,
        #[source]
        source: TransformError,
    },

    /// Reading from the stream failed for a reason other than end of data
    #[error("I/O error reading {tag} chunk: {source}")]
    Io {
        tag: TagBytes,
        #[source]
        source: io::Error,
    },
}

impl ChunkDecodeError {
    pub const fn truncated(tag: TagBytes, what: &'static str, expected: u64, actual: u64) -> Self {
        Self::TruncatedStream {
            tag,
            what,
            expected,
            actual,
        }
    }

    pub const fn size_mismatch(tag: ChunkTag, expected: &'static str, actual: usize) -> Self {
        Self::SizeMismatch {
            tag,
            expected,
            actual,
        }
    }

    pub fn invalid_encoding<S: Into<String>>(tag: ChunkTag, reason: S) -> Self {
        Self::InvalidEncoding {
            tag,
            reason: reason.into(),
        }
    }

    pub const fn missing_field(tag: ChunkTag, field: &'static str) -> Self {
        Self::MissingField { tag, field }
    }

    pub const fn io(tag: TagBytes, source: io::Error) -> Self {
        Self::Io { tag, source }
    }
}

/// Errors raised while encoding a single chunk from a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkEncodeError {
    /// A per-base or per-channel array has the wrong length
    #[error("{tag} {field}{} has {actual} values, expected {expected}", .channel.map(|c| format!("[{c}]")).unwrap_or_default())]
    ChannelLengthMismatch {
        tag: ChunkTag,
        field: &'static str,
        channel: Option<Channel>,
        expected: usize,
        actual: usize,
    },

    /// Content cannot be represented in the chunk's wire encoding
    #[error("Cannot encode {tag} chunk: {reason}")]
    InvalidEncoding { tag: ChunkTag, reason: String },

    /// The record lacks the field this chunk is built from
    #[error("{tag} chunk requires {field}")]
    MissingField {
        tag: ChunkTag,
        field: &'static str,
    },
}

impl ChunkEncodeError {
    pub const fn channel_length_mismatch(
        tag: ChunkTag,
        field: &'static str,
        channel: Option<Channel>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::ChannelLengthMismatch {
            tag,
            field,
            channel,
            expected,
            actual,
        }
    }

    pub fn invalid_encoding<S: Into<String>>(tag: ChunkTag, reason: S) -> Self {
        Self::InvalidEncoding {
            tag,
            reason: reason.into(),
        }
    }

    pub const fn missing_field(tag: ChunkTag, field: &'static str) -> Self {
        Self::MissingField { tag, field }
    }
}
