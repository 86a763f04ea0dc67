use bytes::{BufMut, Bytes, BytesMut};
use byteorder::{BigEndian, ByteOrder};

use crate::chunk::error::{ChunkDecodeError, ChunkEncodeError};
use crate::chunk::{ChunkCodec, ChunkTag};
use crate::record::{ChromatogramBuilder, ChromatogramRecord, ClipRange};

const SIZE: usize = 9;

/// `CLIP`: one padding byte, then big-endian `i32` begin and end.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipChunk;

impl ChunkCodec for ClipChunk {
    const TAG: ChunkTag = ChunkTag::Clip;
    type Output = ClipRange;

    fn decode(payload: &[u8], _context: &ChromatogramBuilder) -> Result<ClipRange, ChunkDecodeError> {
        if payload.len() != SIZE {
            return Err(ChunkDecodeError::size_mismatch(Self::TAG, "9 bytes", payload.len()));
        }
        Ok(ClipRange::new(
            BigEndian::read_i32(&payload[1..5]),
            BigEndian::read_i32(&payload[5..9]),
        ))
    }

    /// A record without a clip range encodes as `(0, 0)`.
    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError> {
        let clip = record.clip_range().unwrap_or_default();

        let mut buf = BytesMut::with_capacity(SIZE);
        buf.put_u8(0);
        buf.put_i32(clip.begin());
        buf.put_i32(clip.end());
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(payload: &[u8]) -> Result<ClipRange, ChunkDecodeError> {
        ClipChunk::decode(payload, &ChromatogramBuilder::default())
    }

    #[test]
    fn test_decode() {
        let payload = [0xaa, 0, 0, 0, 12, 0, 0, 1, 0];
        assert_eq!(decode(&payload).unwrap(), ClipRange::new(12, 256));
    }

    #[test]
    fn test_absent_clip_encodes_zero() {
        let payload = ClipChunk::encode(&ChromatogramRecord::default()).unwrap();
        assert_eq!(payload.as_ref(), &[0; 9]);
    }

    proptest! {
        #[test]
        fn test_wrong_size_always_fails(len in 0usize..64) {
            prop_assume!(len != SIZE);
            let result = decode(&vec![0; len]);
            let rejected = matches!(
                result,
                Err(ChunkDecodeError::SizeMismatch { tag: ChunkTag::Clip, actual, .. }) if actual == len
            );
            prop_assert!(rejected, "len {}: {:?}", len, result);
        }

        #[test]
        fn test_roundtrip(begin in any::<i32>(), end in any::<i32>()) {
            let record = ChromatogramRecord::builder()
                .with_clip_range((begin, end))
                .build_unchecked();
            let payload = ClipChunk::encode(&record).unwrap();
            prop_assert_eq!(decode(&payload).unwrap(), ClipRange::new(begin, end));
        }
    }
}
