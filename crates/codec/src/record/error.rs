use thiserror::Error;

/// Result type for record validation
pub type Result<T> = std::result::Result<T, RecordError>;

/// A decoded or assembled record breaks one of the cross-field invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A per-base field does not have one entry per basecall
    #[error("{field} has {actual} entries but there are {expected} basecalls")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The four lanes of a per-channel field differ in length
    #[error("{field} channels have unequal lengths")]
    UnequalChannels { field: &'static str },

    /// The clip range is not within `0..=num_bases`
    #[error("clip range ({begin}, {end}) is outside 0..={num_bases}")]
    ClipOutOfRange {
        begin: i32,
        end: i32,
        num_bases: usize,
    },
}
