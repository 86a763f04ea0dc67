use bytes::{BufMut, Bytes, BytesMut};

use crate::chunk::error::{ChunkDecodeError, ChunkEncodeError};
use crate::chunk::{ChunkCodec, ChunkTag};
use crate::record::{Channel, Channels, ChromatogramBuilder, ChromatogramRecord};

/// Uncalled values stored per base.
const UNCALLED: usize = 3;

/// `CNF4`: one padding byte, a region of N called-base confidences, then a
/// region of 3N uncalled-base confidences.
///
/// Which channel each byte belongs to is decided by the basecall at that
/// position (see [`Channel::called`] and [`Channel::uncalled`]), so decoding
/// requires the basecalls to be known already.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfidenceChunk;

impl ChunkCodec for ConfidenceChunk {
    const TAG: ChunkTag = ChunkTag::Confidence;
    type Output = Channels<u8>;

    fn decode(payload: &[u8], context: &ChromatogramBuilder) -> Result<Channels<u8>, ChunkDecodeError> {
        let bases = context
            .basecalls()
            .ok_or(ChunkDecodeError::missing_field(Self::TAG, "basecalls"))?
            .as_bytes();

        if payload.len() != 1 + (1 + UNCALLED) * bases.len() {
            return Err(ChunkDecodeError::size_mismatch(
                Self::TAG,
                "1 + 4 bytes per basecall",
                payload.len(),
            ));
        }

        let (called, uncalled) = payload[1..].split_at(bases.len());
        let mut lanes = Channels::filled(bases.len());
        for (i, (&base, others)) in bases.iter().zip(uncalled.chunks_exact(UNCALLED)).enumerate() {
            lanes[Channel::called(base)][i] = called[i];
            for (channel, &value) in Channel::uncalled(base).into_iter().zip(others) {
                lanes[channel][i] = value;
            }
        }
        Ok(lanes)
    }

    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError> {
        let bases = record
            .basecalls()
            .ok_or(ChunkEncodeError::missing_field(Self::TAG, "basecalls"))?
            .as_bytes();
        let lanes = record
            .confidence()
            .ok_or(ChunkEncodeError::missing_field(Self::TAG, "confidence"))?;

        for (channel, lane) in lanes.iter() {
            if lane.len() != bases.len() {
                return Err(ChunkEncodeError::channel_length_mismatch(
                    Self::TAG,
                    "confidence",
                    Some(channel),
                    bases.len(),
                    lane.len(),
                ));
            }
        }

        let mut called = BytesMut::with_capacity(1 + (1 + UNCALLED) * bases.len());
        let mut uncalled = BytesMut::with_capacity(UNCALLED * bases.len());
        called.put_u8(0);
        for (i, &base) in bases.iter().enumerate() {
            called.put_u8(lanes[Channel::called(base)][i]);
            for channel in Channel::uncalled(base) {
                uncalled.put_u8(lanes[channel][i]);
            }
        }
        called.unsplit(uncalled);
        Ok(called.freeze())
    }
}
