//! Delta coding at levels 1 to 3.
//!
//! Values are predicted from the previous one, two or three decoded values
//! (zero before the start) and only the wrapping difference is stored:
//!
//! | level | prediction |
//! |---|---|
//! | 1 | `x[i-1]` |
//! | 2 | `2x[i-1] - x[i-2]` |
//! | 3 | `3x[i-1] - 3x[i-2] + x[i-3]` |
//!
//! Layouts: `Delta1` is format byte, level byte, 8-bit values. `Delta2` is
//! format byte, level byte, big-endian 16-bit values. `Delta4` is format
//! byte, level byte, two zero bytes, big-endian 32-bit values.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Result, TransformError};
use crate::TransformKind;

/// Value width handled by a delta layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    /// 8-bit values (`Delta1`)
    One,
    /// 16-bit values (`Delta2`)
    Two,
    /// 32-bit values (`Delta4`)
    Four,
}

impl Width {
    const fn kind(self) -> TransformKind {
        match self {
            Self::One => TransformKind::Delta1,
            Self::Two => TransformKind::Delta2,
            Self::Four => TransformKind::Delta4,
        }
    }

    const fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    const fn header_len(self) -> usize {
        match self {
            Self::Four => 4,
            _ => 2,
        }
    }

    const fn mask(self) -> u32 {
        match self {
            Self::One => 0xff,
            Self::Two => 0xffff,
            Self::Four => u32::MAX,
        }
    }

    fn read(self, chunk: &[u8]) -> u32 {
        match self {
            Self::One => chunk[0] as u32,
            Self::Two => BigEndian::read_u16(chunk) as u32,
            Self::Four => BigEndian::read_u32(chunk),
        }
    }

    fn write(self, value: u32, out: &mut Vec<u8>) {
        match self {
            Self::One => out.push(value as u8),
            Self::Two => out.extend_from_slice(&(value as u16).to_be_bytes()),
            Self::Four => out.extend_from_slice(&value.to_be_bytes()),
        }
    }
}

/// Rolling history of the last three decoded values.
#[derive(Default)]
struct History([u32; 3]);

impl History {
    fn predict(&self, level: u8) -> u32 {
        let [p1, p2, p3] = self.0;
        match level {
            1 => p1,
            2 => p1.wrapping_mul(2).wrapping_sub(p2),
            _ => p1
                .wrapping_mul(3)
                .wrapping_sub(p2.wrapping_mul(3))
                .wrapping_add(p3),
        }
    }

    fn push(&mut self, value: u32) {
        self.0 = [value, self.0[0], self.0[1]];
    }
}

fn check_level(kind: TransformKind, level: u8) -> Result<()> {
    if !(1..=3).contains(&level) {
        return Err(TransformError::corrupt(kind, "delta level must be 1, 2 or 3"));
    }
    Ok(())
}

/// Strip one delta layer of the given width.
pub fn invert(buf: &[u8], width: Width) -> Result<Vec<u8>> {
    let kind = width.kind();
    let header_len = width.header_len();
    if buf.len() < header_len {
        return Err(TransformError::truncated(kind, header_len, buf.len()));
    }
    let level = buf[1];
    check_level(kind, level)?;

    let body = &buf[header_len..];
    if body.len() % width.bytes() != 0 {
        return Err(TransformError::corrupt(
            kind,
            "body is not a whole number of values",
        ));
    }

    let mask = width.mask();
    let mut history = History::default();
    let mut out = Vec::with_capacity(body.len());
    for chunk in body.chunks_exact(width.bytes()) {
        let value = width.read(chunk).wrapping_add(history.predict(level)) & mask;
        history.push(value);
        width.write(value, &mut out);
    }
    Ok(out)
}

/// Wrap `data` in a delta layer of the given width and level.
pub fn apply(data: &[u8], width: Width, level: u8) -> Result<Vec<u8>> {
    let kind = width.kind();
    check_level(kind, level)?;
    if data.len() % width.bytes() != 0 {
        return Err(TransformError::corrupt(
            kind,
            "input is not a whole number of values",
        ));
    }

    let mut out = Vec::with_capacity(width.header_len() + data.len());
    out.push(kind.format_byte());
    out.push(level);
    out.resize(width.header_len(), 0);

    let mask = width.mask();
    let mut history = History::default();
    for chunk in data.chunks_exact(width.bytes()) {
        let value = width.read(chunk);
        let residual = value.wrapping_sub(history.predict(level)) & mask;
        // history holds masked originals so both directions see the same predictions
        history.push(value);
        width.write(residual, &mut out);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_delta1_level1() {
        let buf = [64, 1, 10, 1, 1, 255];
        assert_eq!(invert(&buf, Width::One).unwrap(), vec![10, 11, 12, 11]);
    }

    #[test]
    fn test_delta2_level2_linear_ramp() {
        // a linear ramp predicts perfectly at level 2 after two samples
        let data: Vec<u8> = [100u16, 200, 300, 400, 500]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let wrapped = apply(&data, Width::Two, 2).unwrap();
        assert_eq!(&wrapped[..2], &[65, 2]);
        let residuals: Vec<u16> = wrapped[2..]
            .chunks_exact(2)
            .map(BigEndian::read_u16)
            .collect();
        assert_eq!(residuals, vec![100, 0, 0, 0, 0]);
        assert_eq!(invert(&wrapped, Width::Two).unwrap(), data);
    }

    #[test]
    fn test_delta4_header_padding() {
        let wrapped = apply(&7u32.to_be_bytes(), Width::Four, 1).unwrap();
        assert_eq!(wrapped, vec![66, 1, 0, 0, 0, 0, 0, 7]);
    }

    #[test]
    fn test_bad_level() {
        assert!(matches!(
            invert(&[64, 0, 1, 2], Width::One),
            Err(TransformError::Corrupt { .. })
        ));
        assert!(apply(&[1, 2], Width::One, 4).is_err());
    }

    #[test]
    fn test_ragged_body() {
        assert!(matches!(
            invert(&[65, 1, 0, 1, 2], Width::Two),
            Err(TransformError::Corrupt { .. })
        ));
    }

    proptest! {
        #[test]
        fn test_delta_inverts_apply(
            values in proptest::collection::vec(any::<u32>(), 0..128),
            level in 1u8..=3,
        ) {
            let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
            for width in [Width::One, Width::Two, Width::Four] {
                let wrapped = apply(&bytes, width, level).unwrap();
                prop_assert_eq!(invert(&wrapped, width).unwrap(), bytes.clone());
            }
        }
    }
}
