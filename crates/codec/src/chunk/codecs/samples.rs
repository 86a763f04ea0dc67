use bytes::{BufMut, Bytes, BytesMut};
use byteorder::{BigEndian, ByteOrder};
use strum::VariantArray;

use crate::chunk::error::{ChunkDecodeError, ChunkEncodeError};
use crate::chunk::{ChunkCodec, ChunkTag};
use crate::record::{Channel, Channels, ChromatogramBuilder, ChromatogramRecord};

const PADDING: usize = 2;
const WIDTH: usize = 2;

/// `SMP4`: one padding short, then four blocks of big-endian 16-bit
/// samples in A, C, G, T order.
///
/// Amplitudes are stored as `i16`; unsigned instrument values wrap into the
/// negative range and keep their exact bit pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct SamplesChunk;

impl ChunkCodec for SamplesChunk {
    const TAG: ChunkTag = ChunkTag::Samples;
    type Output = Channels<i16>;

    fn decode(payload: &[u8], _context: &ChromatogramBuilder) -> Result<Channels<i16>, ChunkDecodeError> {
        if payload.len() < PADDING || (payload.len() - PADDING) % (4 * WIDTH) != 0 {
            return Err(ChunkDecodeError::size_mismatch(
                Self::TAG,
                "2 + 8n bytes",
                payload.len(),
            ));
        }

        let block = (payload.len() - PADDING) / 4;
        let mut lanes = Channels::filled(block / WIDTH);
        for (k, &channel) in Channel::VARIANTS.iter().enumerate() {
            let start = PADDING + k * block;
            BigEndian::read_i16_into(&payload[start..start + block], lanes.get_mut(channel));
        }
        Ok(lanes)
    }

    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError> {
        let lanes = record
            .samples()
            .ok_or(ChunkEncodeError::missing_field(Self::TAG, "samples"))?;
        let per_channel = lanes.get(Channel::A).len();
        for (channel, lane) in lanes.iter() {
            if lane.len() != per_channel {
                return Err(ChunkEncodeError::channel_length_mismatch(
                    Self::TAG,
                    "samples",
                    Some(channel),
                    per_channel,
                    lane.len(),
                ));
            }
        }

        let mut buf = BytesMut::with_capacity(PADDING + 4 * WIDTH * per_channel);
        buf.put_i16(0);
        for (_, lane) in lanes.iter() {
            for &sample in lane {
                buf.put_i16(sample);
            }
        }
        Ok(buf.freeze())
    }
}
