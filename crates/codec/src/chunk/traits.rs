//! Traits implemented by every chunk codec

use bytes::Bytes;

use super::error::{ChunkDecodeError, ChunkEncodeError};
use super::tag::ChunkTag;
use crate::record::{ChromatogramBuilder, ChromatogramRecord};

/// Encoding and decoding of one chunk type's raw payload.
///
/// Payloads seen by [`decode`](ChunkCodec::decode) have already had every
/// transform layer removed, so they start with the chunk's own padding.
/// [`encode`](ChunkCodec::encode) produces the same untransformed layout.
pub trait ChunkCodec {
    /// The wire tag handled by this codec.
    const TAG: ChunkTag;

    /// The field value carried by the chunk.
    type Output;

    /// Decode a raw payload.
    ///
    /// `context` is the record decoded so far; only chunks whose layout
    /// depends on earlier fields consult it.
    fn decode(payload: &[u8], context: &ChromatogramBuilder)
    -> Result<Self::Output, ChunkDecodeError>;

    /// Encode the chunk's field from a record.
    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError>;
}
