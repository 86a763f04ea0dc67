use bytes::{BufMut, Bytes, BytesMut};
use byteorder::{BigEndian, ByteOrder};
use log::warn;

use crate::chunk::error::{ChunkDecodeError, ChunkEncodeError};
use crate::chunk::{ChunkCodec, ChunkTag};
use crate::record::{ChromatogramBuilder, ChromatogramRecord};

const PADDING: usize = 4;
const WIDTH: usize = 4;

/// `BPOS`: four padding bytes, then one big-endian `i32` per base.
///
/// Positions are held as `i16`. Decoding narrows each wire value by
/// truncation, so values outside the `i16` range do not survive; encoding
/// sign-extends.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionsChunk;

impl ChunkCodec for PositionsChunk {
    const TAG: ChunkTag = ChunkTag::Positions;
    type Output = Vec<i16>;

    fn decode(payload: &[u8], _context: &ChromatogramBuilder) -> Result<Vec<i16>, ChunkDecodeError> {
        if payload.len() < PADDING || (payload.len() - PADDING) % WIDTH != 0 {
            return Err(ChunkDecodeError::size_mismatch(
                Self::TAG,
                "4 + 4n bytes",
                payload.len(),
            ));
        }

        let mut narrowed = 0usize;
        let peaks: Vec<i16> = payload[PADDING..]
            .chunks_exact(WIDTH)
            .map(|word| {
                let wide = BigEndian::read_i32(word);
                if i16::try_from(wide).is_err() {
                    narrowed += 1;
                }
                wide as i16
            })
            .collect();

        if narrowed > 0 {
            warn!("{narrowed} of {} peak positions truncated to 16 bits", peaks.len());
        }
        Ok(peaks)
    }

    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError> {
        let peaks = record
            .peak_positions()
            .ok_or(ChunkEncodeError::missing_field(Self::TAG, "peak positions"))?;

        let mut buf = BytesMut::with_capacity(PADDING + WIDTH * peaks.len());
        buf.put_u32(0);
        for &peak in peaks {
            buf.put_i32(i32::from(peak));
        }
        Ok(buf.freeze())
    }
}
