//! Transform identification
//!
//! Every ZTR chunk payload starts with a format byte. A zero byte means the
//! remainder is the chunk's own layout; any other known value names the
//! transform that must be inverted to reach the next layer.

use core::fmt;

/// A reversible transform layer, keyed by the payload's leading format byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::IntoStaticStr)]
#[derive(strum::EnumIter)]
#[derive(strum::EnumCount)]
#[derive(num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum TransformKind {
    /// Run-length encoding with a guard byte.
    RunLength = 1,
    /// zlib (deflate) compression.
    Zlib = 2,
    /// Delta coding over 8-bit values.
    Delta1 = 64,
    /// Delta coding over big-endian 16-bit values.
    Delta2 = 65,
    /// Delta coding over big-endian 32-bit values.
    Delta4 = 66,
    /// 16-bit values shrunk to single bytes with escapes.
    #[strum(to_string = "16-to-8")]
    Shrink16To8 = 70,
    /// 32-bit values shrunk to single bytes with escapes.
    #[strum(to_string = "32-to-8")]
    Shrink32To8 = 71,
    /// Successor-table prediction over bytes.
    Follow1 = 72,
}

impl TransformKind {
    /// The format byte that introduces this transform on the wire.
    #[inline]
    pub fn format_byte(self) -> u8 {
        self.into()
    }

    /// Returns the short name of the transform.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for TransformKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Result of inspecting a payload's leading byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// No further transform: the buffer holds the chunk's own layout.
    Raw,
    /// The buffer is wrapped in one layer of the given transform.
    Wrapped(TransformKind),
}

impl Classification {
    /// Returns true if no transform remains.
    #[inline]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_format_bytes() {
        assert_eq!(TransformKind::RunLength.format_byte(), 1);
        assert_eq!(TransformKind::Zlib.format_byte(), 2);
        assert_eq!(TransformKind::Delta4.format_byte(), 66);
        assert_eq!(TransformKind::Follow1.format_byte(), 72);
    }

    #[test]
    fn test_try_from_byte() {
        for kind in TransformKind::iter() {
            assert_eq!(TransformKind::try_from(kind.format_byte()).unwrap(), kind);
        }
        assert!(TransformKind::try_from(0u8).is_err());
        assert!(TransformKind::try_from(3u8).is_err());
        assert!(TransformKind::try_from(0xffu8).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TransformKind::RunLength.to_string(), "run-length");
        assert_eq!(TransformKind::Shrink16To8.to_string(), "16-to-8");
        assert_eq!(TransformKind::Zlib.to_string(), "zlib");
    }
}
