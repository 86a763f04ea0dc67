//! Run-length encoding with a guard byte.
//!
//! Layout: format byte, decoded length (4 bytes, little-endian), guard byte,
//! then the body. In the body `guard 0` is a literal guard byte and
//! `guard n c` is `n` copies of `c`; every other byte is literal.

use byteorder::{ByteOrder, LittleEndian};

use super::MAX_PREALLOCATION;
use crate::error::{Result, TransformError};
use crate::TransformKind;

const HEADER_LEN: usize = 6;
const MIN_RUN: usize = 3;
const MAX_RUN: usize = u8::MAX as usize;

/// Strip one run-length layer.
pub fn invert(buf: &[u8]) -> Result<Vec<u8>> {
    const KIND: TransformKind = TransformKind::RunLength;

    if buf.len() < HEADER_LEN {
        return Err(TransformError::truncated(KIND, HEADER_LEN, buf.len()));
    }
    let expected = LittleEndian::read_u32(&buf[1..5]) as usize;
    let guard = buf[5];

    let mut out = Vec::with_capacity(expected.min(MAX_PREALLOCATION));
    let mut body = buf[HEADER_LEN..].iter().copied();
    while let Some(byte) = body.next() {
        let (value, run) = if byte != guard {
            (byte, 1)
        } else {
            match body.next() {
                None => return Err(TransformError::corrupt(KIND, "guard byte at end of data")),
                Some(0) => (guard, 1),
                Some(run) => {
                    let value = body
                        .next()
                        .ok_or(TransformError::corrupt(KIND, "run is missing its value"))?;
                    (value, run as usize)
                }
            }
        };
        // never expand past the declared size
        if out.len() + run > expected {
            return Err(TransformError::length_mismatch(KIND, expected, out.len() + run));
        }
        out.extend(std::iter::repeat_n(value, run));
    }

    if out.len() != expected {
        return Err(TransformError::length_mismatch(KIND, expected, out.len()));
    }
    Ok(out)
}

/// Wrap `data` in a run-length layer.
///
/// With `guard` unset, the least frequent byte value is used as the guard.
///
/// # Errors
///
/// Fails when `data` is too long for the 32-bit length field.
pub fn apply(data: &[u8], guard: Option<u8>) -> Result<Vec<u8>> {
    let declared = u32::try_from(data.len())
        .map_err(|_| TransformError::too_large(TransformKind::RunLength, data.len()))?;
    let guard = guard.unwrap_or_else(|| least_frequent(data));

    let mut out = Vec::with_capacity(HEADER_LEN + data.len());
    out.push(TransformKind::RunLength.format_byte());
    let mut len = [0u8; 4];
    LittleEndian::write_u32(&mut len, declared);
    out.extend_from_slice(&len);
    out.push(guard);

    let mut i = 0;
    while i < data.len() {
        let value = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();

        if run >= MIN_RUN {
            out.extend_from_slice(&[guard, run as u8, value]);
            i += run;
        } else {
            if value == guard {
                out.extend_from_slice(&[guard, 0]);
            } else {
                out.push(value);
            }
            i += 1;
        }
    }
    Ok(out)
}

fn least_frequent(data: &[u8]) -> u8 {
    let mut counts = [0usize; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    // first minimum, so ties pick the lowest byte value
    let mut best = 0;
    for (value, &count) in counts.iter().enumerate() {
        if count < counts[best] {
            best = value;
        }
    }
    best as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_invert_known_bytes() {
        // "ab" + 5x'c' + literal guard 'z'
        let buf = [1, 8, 0, 0, 0, b'z', b'a', b'b', b'z', 5, b'c', b'z', 0];
        assert_eq!(invert(&buf).unwrap(), b"abcccccz");
    }

    #[test]
    fn test_apply_collapses_runs() {
        let data = [7u8; 10];
        let wrapped = apply(&data, Some(0)).unwrap();
        assert_eq!(wrapped, vec![1, 10, 0, 0, 0, 0, 0, 10, 7]);
        assert_eq!(invert(&wrapped).unwrap(), data);
    }

    #[test]
    fn test_long_run_is_split() {
        let data = vec![9u8; 600];
        let wrapped = apply(&data, Some(1)).unwrap();
        assert_eq!(&wrapped[HEADER_LEN..], &[1, 255, 9, 1, 255, 9, 1, 90, 9]);
        assert_eq!(invert(&wrapped).unwrap(), data);
    }

    #[test]
    fn test_truncated_header() {
        let result = invert(&[1, 0, 0]);
        assert!(matches!(
            result,
            Err(TransformError::Truncated { expected: 6, actual: 3, .. })
        ));
    }

    #[test]
    fn test_dangling_guard() {
        let result = invert(&[1, 1, 0, 0, 0, 0xee, 0xee]);
        assert!(matches!(result, Err(TransformError::Corrupt { .. })));
    }

    #[test]
    fn test_declared_length_mismatch() {
        let result = invert(&[1, 5, 0, 0, 0, 0xee, b'a']);
        assert!(matches!(
            result,
            Err(TransformError::LengthMismatch { expected: 5, actual: 1, .. })
        ));
    }

    #[test]
    fn test_runs_past_declared_length_stop_early() {
        let mut buf = vec![1, 1, 0, 0, 0, 0xee];
        for _ in 0..4000 {
            buf.extend_from_slice(&[0xee, 255, 7]);
        }
        assert!(matches!(
            invert(&buf),
            Err(TransformError::LengthMismatch { expected: 1, actual: 255, .. })
        ));
    }

    #[test]
    fn test_literals_past_declared_length_stop_early() {
        let result = invert(&[1, 2, 0, 0, 0, 0xee, b'a', b'b', b'c', b'd']);
        assert!(matches!(
            result,
            Err(TransformError::LengthMismatch { expected: 2, actual: 3, .. })
        ));
    }

    proptest! {
        #[test]
        fn test_rle_inverts_apply(data in proptest::collection::vec(0u8..4, 0..512), guard in proptest::option::of(any::<u8>())) {
            let wrapped = apply(&data, guard).unwrap();
            prop_assert_eq!(invert(&wrapped).unwrap(), data);
        }
    }
}
