use bytes::{BufMut, Bytes, BytesMut};
use log::warn;

use crate::chunk::error::{ChunkDecodeError, ChunkEncodeError};
use crate::chunk::{ChunkCodec, ChunkTag};
use crate::record::{ChromatogramBuilder, ChromatogramRecord, Comments};

/// `TEXT`: one padding byte, then NUL-terminated key and value strings,
/// then a final NUL.
///
/// Runs of NULs act as a single delimiter when decoding. An empty value, or
/// an empty key anywhere but first, therefore merges with its neighbour and
/// does not survive a round trip.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommentsChunk;

impl ChunkCodec for CommentsChunk {
    const TAG: ChunkTag = ChunkTag::Comments;
    type Output = Comments;

    fn decode(payload: &[u8], _context: &ChromatogramBuilder) -> Result<Comments, ChunkDecodeError> {
        let Some((_, body)) = payload.split_first() else {
            return Err(ChunkDecodeError::size_mismatch(Self::TAG, "at least 1 byte", 0));
        };
        let text = std::str::from_utf8(body)
            .map_err(|e| ChunkDecodeError::invalid_encoding(Self::TAG, e.to_string()))?;

        let tokens = split_collapsed(text);
        let mut comments = Comments::new();
        for pair in tokens.chunks(2) {
            comments.push(pair[0], pair.get(1).copied().unwrap_or_default());
        }
        Ok(comments)
    }

    /// A record without comments encodes as an empty block.
    fn encode(record: &ChromatogramRecord) -> Result<Bytes, ChunkEncodeError> {
        let empty = Comments::new();
        let comments = record.comments().unwrap_or(&empty);

        let size = 2 + comments.iter().map(|(k, v)| k.len() + v.len() + 2).sum::<usize>();
        let mut buf = BytesMut::with_capacity(size);
        buf.put_u8(0);
        for (i, (key, value)) in comments.iter().enumerate() {
            if key.contains('\0') || value.contains('\0') {
                return Err(ChunkEncodeError::invalid_encoding(
                    Self::TAG,
                    format!("comment {key:?} contains a NUL byte"),
                ));
            }
            if value.is_empty() || (i > 0 && key.is_empty()) {
                warn!("empty string in comment {i} ({key:?}) will not decode back as written");
            }
            buf.put_slice(key.as_bytes());
            buf.put_u8(0);
            buf.put_slice(value.as_bytes());
            buf.put_u8(0);
        }
        buf.put_u8(0);
        Ok(buf.freeze())
    }
}

/// Split on runs of NULs. A leading empty token is kept, every other empty
/// token is dropped.
fn split_collapsed(text: &str) -> Vec<&str> {
    let mut pieces = text.split('\0');
    let mut tokens: Vec<&str> = pieces.next().into_iter().collect();
    tokens.extend(pieces.filter(|piece| !piece.is_empty()));
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}
