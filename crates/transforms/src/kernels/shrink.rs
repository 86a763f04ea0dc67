//! 16- and 32-bit values stored as single signed bytes.
//!
//! Layout: format byte, then one byte per value. A value that fits in
//! `-127..=127` is stored as that byte; anything else is the escape byte
//! `0x80` followed by the full big-endian value. Decoding restores
//! big-endian values of the original width.

use crate::error::{Result, TransformError};
use crate::TransformKind;

const ESCAPE: u8 = 0x80;

/// Value width restored by a shrink layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wide {
    /// 16-bit values (`Shrink16To8`)
    Sixteen,
    /// 32-bit values (`Shrink32To8`)
    ThirtyTwo,
}

impl Wide {
    const fn kind(self) -> TransformKind {
        match self {
            Self::Sixteen => TransformKind::Shrink16To8,
            Self::ThirtyTwo => TransformKind::Shrink32To8,
        }
    }

    const fn bytes(self) -> usize {
        match self {
            Self::Sixteen => 2,
            Self::ThirtyTwo => 4,
        }
    }
}

/// Strip one shrink layer, widening values back to `wide`.
pub fn invert(buf: &[u8], wide: Wide) -> Result<Vec<u8>> {
    let kind = wide.kind();
    if buf.is_empty() {
        return Err(TransformError::truncated(kind, 1, 0));
    }

    let body = &buf[1..];
    let width = wide.bytes();
    let mut out = Vec::with_capacity(body.len() * width);
    let mut i = 0;
    while i < body.len() {
        let byte = body[i];
        i += 1;
        if byte == ESCAPE {
            let escaped = body
                .get(i..i + width)
                .ok_or(TransformError::corrupt(kind, "escape byte without a full value"))?;
            out.extend_from_slice(escaped);
            i += width;
        } else {
            let value = byte as i8 as i32;
            match wide {
                Wide::Sixteen => out.extend_from_slice(&(value as i16).to_be_bytes()),
                Wide::ThirtyTwo => out.extend_from_slice(&value.to_be_bytes()),
            }
        }
    }
    Ok(out)
}

/// Wrap big-endian values of width `wide` in a shrink layer.
pub fn apply(data: &[u8], wide: Wide) -> Result<Vec<u8>> {
    let kind = wide.kind();
    let width = wide.bytes();
    if data.len() % width != 0 {
        return Err(TransformError::corrupt(
            kind,
            "input is not a whole number of values",
        ));
    }

    let mut out = Vec::with_capacity(1 + data.len() / width);
    out.push(kind.format_byte());
    for chunk in data.chunks_exact(width) {
        let value = match wide {
            Wide::Sixteen => i16::from_be_bytes([chunk[0], chunk[1]]) as i32,
            Wide::ThirtyTwo => i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
        };
        if (-127..=127).contains(&value) {
            out.push(value as i8 as u8);
        } else {
            out.push(ESCAPE);
            out.extend_from_slice(chunk);
        }
    }
    Ok(out)
}
