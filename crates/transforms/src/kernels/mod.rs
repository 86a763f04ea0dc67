//! Transform kernels
//!
//! Each kernel inverts one layer (`invert`, input includes the format byte)
//! and can produce that layer from plain bytes (`apply`).

pub mod delta;
pub mod follow;
pub mod rle;
pub mod shrink;
pub mod zlib;

/// Upper bound on speculative allocation driven by a declared length.
///
/// Declared lengths come from untrusted input; buffers still grow past this
/// when the data is really there.
pub(crate) const MAX_PREALLOCATION: usize = 1 << 20;
