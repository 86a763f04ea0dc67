//! Chunk types and their payload codecs
//!
//! A ZTR file is a sequence of tagged chunks, each carrying one field of the
//! chromatogram. This module maps tags to codecs and converts between raw
//! (fully untransformed) payloads and record fields.
//!
//! ## Key Components
//!
//! - [`ChunkTag`]: the six chunk types, looked up from their wire tag
//! - [`ChunkCodec`]: the per-type decode/encode pair
//! - [`ChunkData`]: a decoded field, ready to apply to a
//!   [`ChromatogramBuilder`]
//! - [`encode_chunk`]: produce one chunk's raw payload from a record

use bytes::Bytes;
use log::debug;

use crate::record::{ChromatogramBuilder, ChromatogramRecord, Channels, ClipRange, Comments};

mod codecs;
mod error;
mod tag;
mod traits;

pub use codecs::{
    BasecallsChunk, ClipChunk, CommentsChunk, ConfidenceChunk, PositionsChunk, SamplesChunk,
};
pub(crate) use error::{DecodeResult, EncodeResult};
pub use error::{ChunkDecodeError, ChunkEncodeError};
pub use tag::{ChunkTag, TagBytes};
pub use traits::ChunkCodec;

/// A field decoded from one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkData {
    /// `BASE`
    Basecalls(String),
    /// `BPOS`
    Positions(Vec<i16>),
    /// `CLIP`
    Clip(ClipRange),
    /// `CNF4`
    Confidence(Channels<u8>),
    /// `SMP4`
    Samples(Channels<i16>),
    /// `TEXT`
    Comments(Comments),
}

impl ChunkData {
    /// The chunk type this field came from.
    pub const fn tag(&self) -> ChunkTag {
        match self {
            Self::Basecalls(_) => ChunkTag::Basecalls,
            Self::Positions(_) => ChunkTag::Positions,
            Self::Clip(_) => ChunkTag::Clip,
            Self::Confidence(_) => ChunkTag::Confidence,
            Self::Samples(_) => ChunkTag::Samples,
            Self::Comments(_) => ChunkTag::Comments,
        }
    }
}

/// A chunk read from a stream: its type and decoded field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedChunk {
    /// Chunk type
    pub tag: ChunkTag,
    /// Decoded field
    pub data: ChunkData,
}

impl From<ChunkData> for DecodedChunk {
    fn from(data: ChunkData) -> Self {
        Self {
            tag: data.tag(),
            data,
        }
    }
}

impl ChunkTag {
    /// Order in which a record's chunks are written.
    pub const WRITE_ORDER: [Self; 6] = [
        Self::Basecalls,
        Self::Positions,
        Self::Clip,
        Self::Confidence,
        Self::Samples,
        Self::Comments,
    ];

    /// Decode a raw payload with this tag's codec.
    ///
    /// `context` is the record decoded so far; `CNF4` needs its basecalls.
    ///
    /// # Errors
    ///
    /// Returns the codec's [`ChunkDecodeError`].
    pub fn decode(self, payload: &[u8], context: &ChromatogramBuilder) -> DecodeResult<ChunkData> {
        let data = match self {
            Self::Basecalls => ChunkData::Basecalls(BasecallsChunk::decode(payload, context)?),
            Self::Positions => ChunkData::Positions(PositionsChunk::decode(payload, context)?),
            Self::Clip => ChunkData::Clip(ClipChunk::decode(payload, context)?),
            Self::Confidence => ChunkData::Confidence(ConfidenceChunk::decode(payload, context)?),
            Self::Samples => ChunkData::Samples(SamplesChunk::decode(payload, context)?),
            Self::Comments => ChunkData::Comments(CommentsChunk::decode(payload, context)?),
        };
        debug!("decoded {self} chunk from {} payload bytes", payload.len());
        Ok(data)
    }

    /// Encode this tag's field of `record` as a raw payload.
    ///
    /// # Errors
    ///
    /// Returns the codec's [`ChunkEncodeError`].
    pub fn encode(self, record: &ChromatogramRecord) -> EncodeResult<Bytes> {
        let payload = match self {
            Self::Basecalls => BasecallsChunk::encode(record),
            Self::Positions => PositionsChunk::encode(record),
            Self::Clip => ClipChunk::encode(record),
            Self::Confidence => ConfidenceChunk::encode(record),
            Self::Samples => SamplesChunk::encode(record),
            Self::Comments => CommentsChunk::encode(record),
        }?;
        debug!("encoded {self} chunk into {} payload bytes", payload.len());
        Ok(payload)
    }
}

/// Produce the raw, untransformed payload for one chunk of `record`.
///
/// # Errors
///
/// Fails if the record lacks the field, or the field cannot be represented.
pub fn encode_chunk(tag: ChunkTag, record: &ChromatogramRecord) -> EncodeResult<Bytes> {
    tag.encode(record)
}
