//! The chromatogram record decoded from, and encoded into, ZTR chunks.
//!
//! A [`ChromatogramRecord`] holds the fields of one sequencing read. Every
//! field is optional until the chunk carrying it has been seen. Records are
//! assembled with a [`ChromatogramBuilder`], either field by field or by
//! applying [`ChunkData`](crate::chunk::ChunkData) as chunks are decoded.

mod channel;
mod chromatogram;
mod clip;
mod comments;
pub(crate) mod error;

pub use channel::{Channel, Channels};
pub use chromatogram::{ChromatogramBuilder, ChromatogramRecord};
pub use clip::ClipRange;
pub use comments::Comments;
pub use error::RecordError;
