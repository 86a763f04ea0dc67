use bytes::{BufMut, Bytes, BytesMut};

use crate::chunk::error::{ChunkDecodeError, ChunkEncodeError};
use crate::chunk::{ChunkCodec, ChunkTag};
use crate::record::{ChromatogramBuilder, ChromatogramRecord};

/// `BASE`: one padding byte, then one ASCII character per base.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasecallsChunk;

impl ChunkCodec for BasecallsChunk {
    const TAG: ChunkTag = ChunkTag::Basecalls;
    type Output = String;

    fn decode(payload: &[u8], _context: &ChromatogramBuilder) -> Result<String, ChunkDecodeError> {
        let Some((_, bases)) = payload.split_first() else {
            return Err(ChunkDecodeError::size_mismatch(Self::TAG, "at least 1 byte", 0));
        };
        if let Some(pos) = bases.iter().position(|b| !b.is_ascii()) {
            return Err(ChunkDecodeError::invalid_encoding(
                Self::TAG,
                format!("non-ASCII byte {:#04x} at base {pos}", bases[pos]),
            ));
        }
        // ASCII is always valid UTF-8
        String::from_utf8(bases.to_vec())
            .map_err(|e| ChunkDecodeError::invalid_encoding(Self::TAG, e.to_string()))
    }

    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError> {
        let bases = record
            .basecalls()
            .ok_or(ChunkEncodeError::missing_field(Self::TAG, "basecalls"))?;
        if let Some((pos, c)) = bases.char_indices().find(|(_, c)| !c.is_ascii()) {
            return Err(ChunkEncodeError::invalid_encoding(
                Self::TAG,
                format!("non-ASCII basecall {c:?} at byte {pos}"),
            ));
        }

        let mut buf = BytesMut::with_capacity(1 + bases.len());
        buf.put_u8(0);
        buf.put_slice(bases.as_bytes());
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decode(payload: &[u8]) -> Result<String, ChunkDecodeError> {
        BasecallsChunk::decode(payload, &ChromatogramBuilder::default())
    }

    #[test]
    fn test_decode_ignores_padding_and_keeps_case() {
        assert_eq!(decode(b"\x07ACgtN").unwrap(), "ACgtN");
        assert_eq!(decode(&[0]).unwrap(), "");
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(matches!(
            decode(&[]),
            Err(ChunkDecodeError::SizeMismatch { tag: ChunkTag::Basecalls, actual: 0, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_non_ascii() {
        assert!(matches!(
            decode(&[0, b'A', 0xc3, 0xa9]),
            Err(ChunkDecodeError::InvalidEncoding { tag: ChunkTag::Basecalls, .. })
        ));
    }

    #[test]
    fn test_encode() {
        let record = ChromatogramRecord::builder().with_basecalls("ACGT").build_unchecked();
        assert_eq!(BasecallsChunk::encode(&record).unwrap().as_ref(), b"\0ACGT");
    }

    #[test]
    fn test_encode_errors() {
        let empty = ChromatogramRecord::default();
        assert_eq!(
            BasecallsChunk::encode(&empty),
            Err(ChunkEncodeError::missing_field(ChunkTag::Basecalls, "basecalls"))
        );

        let accented = ChromatogramRecord::builder().with_basecalls("ACé").build_unchecked();
        assert!(matches!(
            BasecallsChunk::encode(&accented),
            Err(ChunkEncodeError::InvalidEncoding { .. })
        ));
    }

    proptest! {
        #[test]
        fn test_roundtrip(bases in "[ACGTNacgtn-]{0,200}") {
            let record = ChromatogramRecord::builder().with_basecalls(bases.clone()).build_unchecked();
            let payload = BasecallsChunk::encode(&record).unwrap();
            prop_assert_eq!(payload.len(), bases.len() + 1);
            prop_assert_eq!(decode(&payload).unwrap(), bases);
        }
    }
}
