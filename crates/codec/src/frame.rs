//! Chunk framing
//!
//! On the wire every chunk is
//!
//! ```text
//! tag(4) | metadata length(4) | metadata | payload length(4) | payload
//! ```
//!
//! Lengths are big-endian signed 32-bit integers. Some writers emitted them
//! little-endian, and the format carries no byte-order marker, so a length
//! that is negative when read big-endian is read again little-endian.
//!
//! The payload may be wrapped in transform layers. [`ChunkReader`] strips
//! them through a [`TransformRegistry`] before handing the raw payload to
//! the chunk's codec. Writing never applies transforms.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, trace, warn};
use ztr_transforms::{Classification, StandardTransforms, TransformRegistry};

use crate::DecodeConfig;
use crate::chunk::{ChunkDecodeError, ChunkTag, DecodeResult, DecodedChunk, TagBytes};
use crate::record::ChromatogramBuilder;

/// Upper bound on buffer space reserved from an untrusted length word.
const MAX_PREALLOCATION: usize = 1 << 20;

/// Reads chunks from a stream and decodes them.
///
/// The reader holds no per-stream state; one instance can serve any number
/// of streams.
#[derive(Clone, Debug)]
pub struct ChunkReader<R = StandardTransforms> {
    registry: R,
    config: DecodeConfig,
}

impl ChunkReader {
    /// Reader over the standard ZTR transforms.
    pub const fn new(config: DecodeConfig) -> Self {
        Self::with_registry(StandardTransforms, config)
    }
}

impl Default for ChunkReader {
    fn default() -> Self {
        Self::new(DecodeConfig::default())
    }
}

impl<R: TransformRegistry> ChunkReader<R> {
    /// Reader over a custom transform registry.
    pub const fn with_registry(registry: R, config: DecodeConfig) -> Self {
        Self { registry, config }
    }

    /// The reader's limits.
    pub const fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Read and decode the next chunk.
    ///
    /// `context` is the record decoded so far. Returns `Ok(None)` when the
    /// stream ends cleanly before a new chunk.
    ///
    /// A chunk with an unknown tag is consumed in full before
    /// [`ChunkDecodeError::UnknownChunkTag`] is returned, so the stream is left
    /// at the next chunk.
    ///
    /// # Errors
    ///
    /// Fails with [`ChunkDecodeError::TruncatedStream`] if the stream ends
    /// inside a chunk, and with the codec's error if the payload is invalid.
    pub fn read_chunk<S: Read>(
        &self,
        stream: &mut S,
        context: &ChromatogramBuilder,
    ) -> DecodeResult<Option<DecodedChunk>> {
        let mut tag = [0u8; 4];
        let read = fill(stream, &mut tag).map_err(|e| ChunkDecodeError::io(TagBytes::new(tag), e))?;
        if read == 0 {
            return Ok(None);
        }
        let tag = TagBytes::new(tag);
        if read < tag.as_bytes().len() {
            return Err(ChunkDecodeError::truncated(tag, "tag", 4, read as u64));
        }

        let metadata_len = read_length_word(stream, tag, "metadata")?;
        skip_metadata(stream, tag, parse_length(tag, "metadata", metadata_len)?)?;
        let payload_len = read_length_word(stream, tag, "payload")?;
        let payload = read_payload(stream, tag, parse_length(tag, "payload", payload_len)?)?;

        self.decode_payload(tag, payload, context).map(Some)
    }

    /// Decode a chunk whose tag and length words have already been read.
    ///
    /// `stream` must yield the metadata bytes followed directly by the
    /// payload bytes.
    ///
    /// # Errors
    ///
    /// As for [`read_chunk`](Self::read_chunk), and
    /// [`ChunkDecodeError::InvalidLength`] if a length word is negative in
    /// both byte orders.
    pub fn decode_chunk<S: Read>(
        &self,
        tag: [u8; 4],
        metadata_len: [u8; 4],
        payload_len: [u8; 4],
        stream: &mut S,
        context: &ChromatogramBuilder,
    ) -> DecodeResult<DecodedChunk> {
        let tag = TagBytes::new(tag);
        let metadata_len = parse_length(tag, "metadata", metadata_len)?;
        let payload_len = parse_length(tag, "payload", payload_len)?;
        skip_metadata(stream, tag, metadata_len)?;
        let payload = read_payload(stream, tag, payload_len)?;

        self.decode_payload(tag, payload, context)
    }

    /// Strip every transform layer from a payload.
    ///
    /// # Errors
    ///
    /// Fails with [`ChunkDecodeError::TransformCycleExceeded`] once more
    /// layers than the configured maximum remain, or (with cycle detection
    /// on) as soon as an intermediate buffer repeats.
    pub fn unwrap_payload(&self, tag: ChunkTag, mut buf: Vec<u8>) -> DecodeResult<Vec<u8>> {
        let mut seen = HashSet::new();
        let mut layers = 0;
        loop {
            let kind = match self
                .registry
                .classify(&buf)
                .map_err(|source| ChunkDecodeError::Transform { tag, source })?
            {
                Classification::Raw => return Ok(buf),
                Classification::Wrapped(kind) => kind,
            };

            if layers >= self.config.max_transform_layers()
                || (self.config.detect_cycles() && !seen.insert(fingerprint(&buf)))
            {
                return Err(ChunkDecodeError::TransformCycleExceeded { tag, layers });
            }

            trace!("{tag}: removing {kind} layer {}", layers + 1);
            buf = self
                .registry
                .invert(kind, &buf)
                .map_err(|source| ChunkDecodeError::Transform { tag, source })?;
            layers += 1;
        }
    }

    fn decode_payload(
        &self,
        tag: TagBytes,
        payload: Vec<u8>,
        context: &ChromatogramBuilder,
    ) -> DecodeResult<DecodedChunk> {
        let tag = ChunkTag::try_from(tag)?;
        let wire_len = payload.len();
        let payload = self.unwrap_payload(tag, payload)?;
        debug!("{tag} chunk: {wire_len} bytes on the wire, {} raw", payload.len());

        Ok(DecodedChunk {
            tag,
            data: tag.decode(&payload, context)?,
        })
    }
}

/// Decode one chunk with the standard transforms and default limits.
///
/// See [`ChunkReader::decode_chunk`].
///
/// # Errors
///
/// As for [`ChunkReader::decode_chunk`].
pub fn decode_chunk<S: Read>(
    tag: [u8; 4],
    metadata_len: [u8; 4],
    payload_len: [u8; 4],
    stream: &mut S,
    context: &ChromatogramBuilder,
) -> DecodeResult<DecodedChunk> {
    ChunkReader::new(DecodeConfig::default()).decode_chunk(tag, metadata_len, payload_len, stream, context)
}

/// Frame a raw payload: zero metadata length, big-endian payload length,
/// payload.
///
/// # Errors
///
/// Fails with [`io::ErrorKind::InvalidInput`] if the payload is longer than
/// a length word can express.
pub fn encode_frame(payload: &[u8]) -> io::Result<Bytes> {
    let len = i32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds the frame limit", payload.len()),
        )
    })?;

    let mut buf = BytesMut::with_capacity(8 + payload.len());
    buf.put_i32(0);
    buf.put_i32(len);
    buf.put_slice(payload);
    Ok(buf.freeze())
}

/// Write one chunk: tag followed by [`encode_frame`].
///
/// # Errors
///
/// Propagates write failures and the [`encode_frame`] length check.
pub fn write_chunk<W: Write>(sink: &mut W, tag: ChunkTag, payload: &[u8]) -> io::Result<()> {
    let frame = encode_frame(payload)?;
    sink.write_all(&tag.as_bytes())?;
    sink.write_all(&frame)?;
    debug!("wrote {tag} chunk with {} payload bytes", payload.len());
    Ok(())
}

/// Interpret a length word, falling back to little-endian when the
/// big-endian reading is negative.
fn parse_length(tag: TagBytes, field: &'static str, bytes: [u8; 4]) -> DecodeResult<u64> {
    let big = BigEndian::read_i32(&bytes);
    if let Ok(len) = u64::try_from(big) {
        return Ok(len);
    }
    let little = LittleEndian::read_i32(&bytes);
    if let Ok(len) = u64::try_from(little) {
        warn!("{tag}: {field} length {bytes:02x?} read as little-endian ({len})");
        return Ok(len);
    }
    Err(ChunkDecodeError::InvalidLength { tag, field, bytes })
}

/// Read into `buf` until it is full or the stream ends.
fn fill<S: Read>(stream: &mut S, buf: &mut [u8]) -> io::Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match stream.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}

fn read_length_word<S: Read>(stream: &mut S, tag: TagBytes, field: &'static str) -> DecodeResult<[u8; 4]> {
    let mut word = [0u8; 4];
    let read = fill(stream, &mut word).map_err(|e| ChunkDecodeError::io(tag, e))?;
    if read < word.len() {
        return Err(ChunkDecodeError::truncated(tag, field, 4, read as u64));
    }
    Ok(word)
}

fn skip_metadata<S: Read>(stream: &mut S, tag: TagBytes, len: u64) -> DecodeResult<()> {
    let skipped = io::copy(&mut stream.by_ref().take(len), &mut io::sink())
        .map_err(|e| ChunkDecodeError::io(tag, e))?;
    if skipped < len {
        return Err(ChunkDecodeError::truncated(tag, "metadata", len, skipped));
    }
    Ok(())
}

fn read_payload<S: Read>(stream: &mut S, tag: TagBytes, len: u64) -> DecodeResult<Vec<u8>> {
    let capacity = usize::try_from(len).map_or(MAX_PREALLOCATION, |len| len.min(MAX_PREALLOCATION));
    let mut payload = Vec::with_capacity(capacity);
    stream
        .by_ref()
        .take(len)
        .read_to_end(&mut payload)
        .map_err(|e| ChunkDecodeError::io(tag, e))?;
    if (payload.len() as u64) < len {
        return Err(ChunkDecodeError::truncated(tag, "payload", len, payload.len() as u64));
    }
    Ok(payload)
}

fn fingerprint(buf: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    buf.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkData;
    use std::io::Cursor;
    use ztr_transforms::{Layer, TransformError, TransformKind, wrap};

    fn frame(tag: &[u8; 4], metadata_len: [u8; 4], metadata: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut out = tag.to_vec();
        out.extend_from_slice(&metadata_len);
        out.extend_from_slice(metadata);
        out.extend_from_slice(&(payload.len() as i32).to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn read(bytes: &[u8]) -> DecodeResult<Option<DecodedChunk>> {
        ChunkReader::new(DecodeConfig::default()).read_chunk(&mut Cursor::new(bytes), &ChromatogramBuilder::default())
    }

    fn basecalls(chunk: Option<DecodedChunk>) -> String {
        match chunk.map(|c| c.data) {
            Some(ChunkData::Basecalls(bases)) => bases,
            other => panic!("expected basecalls, got {other:?}"),
        }
    }

    #[test]
    fn test_write_then_read() {
        let mut out = Vec::new();
        write_chunk(&mut out, ChunkTag::Basecalls, b"\0ACGT").unwrap();
        assert_eq!(out, b"BASE\0\0\0\0\0\0\0\x05\0ACGT");

        let mut stream = Cursor::new(out);
        let reader = ChunkReader::new(DecodeConfig::default());
        let context = ChromatogramBuilder::default();
        let chunk = reader.read_chunk(&mut stream, &context).unwrap();
        assert_eq!(chunk.as_ref().map(|c| c.tag), Some(ChunkTag::Basecalls));
        assert_eq!(basecalls(chunk), "ACGT");
        assert!(reader.read_chunk(&mut stream, &context).unwrap().is_none());
    }

    #[test]
    fn test_encode_frame() {
        assert_eq!(encode_frame(&[0, 7]).unwrap().as_ref(), &[0, 0, 0, 0, 0, 0, 0, 2, 0, 7]);
    }

    #[test]
    fn test_metadata_is_skipped() {
        let bytes = frame(b"BASE", 3i32.to_be_bytes(), b"xyz", b"\0TT");
        assert_eq!(basecalls(read(&bytes).unwrap()), "TT");
    }

    #[test]
    fn test_little_endian_fallback() {
        let metadata = [0xeeu8; 0x84];
        let bytes = frame(b"BASE", [0x84, 0, 0, 0], &metadata, b"\0G");
        assert_eq!(basecalls(read(&bytes).unwrap()), "G");

        let mut bytes = b"BASE\0\0\0\0".to_vec();
        bytes.extend_from_slice(&[0x82, 0, 0, 0]);
        bytes.extend_from_slice(&[0; 0x82]);
        match read(&bytes).unwrap().map(|c| c.data) {
            Some(ChunkData::Basecalls(bases)) => assert_eq!(bases.len(), 0x81),
            other => panic!("unexpected chunk: {other:?}"),
        }
    }

    #[test]
    fn test_negative_in_both_orders() {
        let bytes = frame(b"BASE", [0x80, 0, 0, 0x80], &[], b"\0A");
        assert!(matches!(
            read(&bytes),
            Err(ChunkDecodeError::InvalidLength { field: "metadata", bytes: [0x80, 0, 0, 0x80], .. })
        ));
    }

    #[test]
    fn test_clean_eof() {
        assert!(read(&[]).unwrap().is_none());
    }

    #[test]
    fn test_truncation() {
        assert!(matches!(
            read(b"BA"),
            Err(ChunkDecodeError::TruncatedStream { what: "tag", expected: 4, actual: 2, .. })
        ));
        assert!(matches!(
            read(b"BASE\0\0"),
            Err(ChunkDecodeError::TruncatedStream { what: "metadata", expected: 4, actual: 2, .. })
        ));
        assert!(matches!(
            read(b"BASE\0\0\0\x10abc"),
            Err(ChunkDecodeError::TruncatedStream { what: "metadata", expected: 16, actual: 3, .. })
        ));

        let mut bytes = frame(b"BASE", [0; 4], &[], b"\0ACGTACGT");
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            read(&bytes),
            Err(ChunkDecodeError::TruncatedStream { what: "payload", expected: 9, actual: 6, .. })
        ));
    }

    /// Yields its bytes, then fails every further read.
    struct BrokenStream {
        data: Cursor<Vec<u8>>,
    }

    impl Read for BrokenStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("device gone")),
                n => Ok(n),
            }
        }
    }

    fn read_broken(bytes: Vec<u8>) -> DecodeResult<Option<DecodedChunk>> {
        let mut stream = BrokenStream { data: Cursor::new(bytes) };
        ChunkReader::new(DecodeConfig::default()).read_chunk(&mut stream, &ChromatogramBuilder::default())
    }

    #[test]
    fn test_io_error_is_not_truncation() {
        let mut bytes = frame(b"BASE", [0; 4], &[], b"\0ACGTACGT");
        bytes.truncate(bytes.len() - 3);
        match read_broken(bytes) {
            Err(ChunkDecodeError::Io { tag, source }) => {
                assert_eq!(tag.as_bytes(), b"BASE");
                assert_eq!(source.kind(), io::ErrorKind::Other);
            }
            other => panic!("expected I/O error, got {other:?}"),
        }

        assert!(matches!(
            read_broken(b"BASE\0\0\0\x10abc".to_vec()),
            Err(ChunkDecodeError::Io { .. })
        ));
        assert!(matches!(
            read_broken(b"BASE\0\0".to_vec()),
            Err(ChunkDecodeError::Io { .. })
        ));
    }

    #[test]
    fn test_unknown_tag_skips_chunk() {
        let mut bytes = frame(b"ZZZZ", 2i32.to_be_bytes(), b"md", b"\0whatever");
        bytes.extend(frame(b"BASE", [0; 4], &[], b"\0CC"));
        let mut stream = Cursor::new(bytes);
        let reader = ChunkReader::new(DecodeConfig::default());
        let context = ChromatogramBuilder::default();

        match reader.read_chunk(&mut stream, &context) {
            Err(ChunkDecodeError::UnknownChunkTag(tag)) => assert_eq!(tag.as_bytes(), b"ZZZZ"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(basecalls(reader.read_chunk(&mut stream, &context).unwrap()), "CC");
    }

    #[test]
    fn test_decode_chunk_with_lifted_lengths() {
        let mut stream = Cursor::new(b"meta\0ACG".to_vec());
        let chunk = decode_chunk(
            *b"BASE",
            4i32.to_be_bytes(),
            4i32.to_be_bytes(),
            &mut stream,
            &ChromatogramBuilder::default(),
        )
        .unwrap();
        assert_eq!(chunk.data, ChunkData::Basecalls("ACG".into()));
    }

    #[test]
    fn test_nested_layers_up_to_limit() {
        let raw = b"\0ACGT".to_vec();
        let mut wrapped = raw.clone();
        for _ in 0..64 {
            wrapped = wrap(&wrapped, Layer::RunLength { guard: None }).unwrap();
        }
        let reader = ChunkReader::new(DecodeConfig::default());
        assert_eq!(reader.unwrap_payload(ChunkTag::Basecalls, wrapped.clone()).unwrap(), raw);

        let one_more = wrap(&wrapped, Layer::RunLength { guard: None }).unwrap();
        assert!(matches!(
            reader.unwrap_payload(ChunkTag::Basecalls, one_more),
            Err(ChunkDecodeError::TransformCycleExceeded { layers: 64, .. })
        ));
    }

    #[test]
    fn test_wrapped_payload_in_stream() {
        let payload = wrap(b"\0NNNNNNNNNNNNNNNN", Layer::RunLength { guard: None }).unwrap();
        let payload = wrap(&payload, Layer::Zlib(ztr_transforms::Compression::default())).unwrap();
        let bytes = frame(b"BASE", [0; 4], &[], &payload);
        assert_eq!(basecalls(read(&bytes).unwrap()), "N".repeat(16));
    }

    /// Claims every buffer is wrapped and hands it back unchanged.
    #[derive(Debug)]
    struct Looping;

    impl TransformRegistry for Looping {
        fn classify(&self, _buf: &[u8]) -> ztr_transforms::Result<Classification> {
            Ok(Classification::Wrapped(TransformKind::RunLength))
        }

        fn invert(&self, _kind: TransformKind, buf: &[u8]) -> ztr_transforms::Result<Vec<u8>> {
            Ok(buf.to_vec())
        }
    }

    /// Alternates between two buffers.
    #[derive(Debug)]
    struct PingPong;

    impl TransformRegistry for PingPong {
        fn classify(&self, _buf: &[u8]) -> ztr_transforms::Result<Classification> {
            Ok(Classification::Wrapped(TransformKind::Zlib))
        }

        fn invert(&self, _kind: TransformKind, buf: &[u8]) -> ztr_transforms::Result<Vec<u8>> {
            Ok(if buf == b"ping" { b"pong".to_vec() } else { b"ping".to_vec() })
        }
    }

    #[test]
    fn test_cycle_detected_early() {
        let reader = ChunkReader::with_registry(Looping, DecodeConfig::default());
        assert!(matches!(
            reader.unwrap_payload(ChunkTag::Samples, vec![1, 2, 3]),
            Err(ChunkDecodeError::TransformCycleExceeded { tag: ChunkTag::Samples, layers: 1 })
        ));

        let reader = ChunkReader::with_registry(PingPong, DecodeConfig::default());
        assert!(matches!(
            reader.unwrap_payload(ChunkTag::Samples, b"ping".to_vec()),
            Err(ChunkDecodeError::TransformCycleExceeded { layers: 2, .. })
        ));
    }

    #[test]
    fn test_cycle_hits_layer_cap() {
        let config = DecodeConfig::default()
            .with_detect_cycles(false)
            .with_max_transform_layers(10);
        let reader = ChunkReader::with_registry(Looping, config);
        assert!(matches!(
            reader.unwrap_payload(ChunkTag::Clip, vec![9]),
            Err(ChunkDecodeError::TransformCycleExceeded { layers: 10, .. })
        ));
    }

    #[test]
    fn test_unsupported_transform() {
        let bytes = frame(b"CLIP", [0; 4], &[], &[3, 0, 0]);
        assert!(matches!(
            read(&bytes),
            Err(ChunkDecodeError::Transform {
                tag: ChunkTag::Clip,
                source: TransformError::Unsupported(3)
            })
        ));
    }
}
