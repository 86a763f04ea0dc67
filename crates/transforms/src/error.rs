use thiserror::Error;

use crate::TransformKind;

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors raised while classifying or inverting a transform layer
#[derive(Error, Debug)]
pub enum TransformError {
    /// The leading format byte names no known transform
    #[error("Unsupported transform format byte: {0}")]
    Unsupported(u8),

    /// The buffer ended before the transform's header or body was complete
    #[error("Truncated {kind} data: expected at least {expected} bytes, got {actual}")]
    Truncated {
        kind: TransformKind,
        expected: usize,
        actual: usize,
    },

    /// The transform body is internally inconsistent
    #[error("Corrupt {kind} data: {reason}")]
    Corrupt {
        kind: TransformKind,
        reason: &'static str,
    },

    /// The declared decoded size disagrees with what was produced
    #[error("{kind} length mismatch: declared {expected} bytes, produced {actual}")]
    LengthMismatch {
        kind: TransformKind,
        expected: usize,
        actual: usize,
    },

    /// The input is too long for a layer's 32-bit length field
    #[error("{kind} input of {len} bytes exceeds the 32-bit length field")]
    TooLarge { kind: TransformKind, len: usize },

    /// zlib stream failure
    #[error("zlib error: {0}")]
    Zlib(#[from] std::io::Error),
}

impl TransformError {
    pub const fn truncated(kind: TransformKind, expected: usize, actual: usize) -> Self {
        Self::Truncated {
            kind,
            expected,
            actual,
        }
    }

    pub const fn corrupt(kind: TransformKind, reason: &'static str) -> Self {
        Self::Corrupt { kind, reason }
    }

    pub const fn too_large(kind: TransformKind, len: usize) -> Self {
        Self::TooLarge { kind, len }
    }

    pub const fn length_mismatch(kind: TransformKind, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            kind,
            expected,
            actual,
        }
    }
}
