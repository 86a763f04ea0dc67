//! Chunk type identification
//!
//! Every chunk starts with a four-character ASCII type tag. [`TagBytes`]
//! carries those bytes as read, before any lookup; [`ChunkTag`] is the closed
//! set of chunk types this crate decodes.

use core::fmt;

use super::error::ChunkDecodeError;

/// Raw four-byte chunk type tag, as found on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagBytes([u8; 4]);

impl TagBytes {
    /// Wrap raw tag bytes.
    #[inline]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Debug for TagBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagBytes({self})")
    }
}

impl fmt::Display for TagBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // tags are meant to be printable ASCII; escape anything else
        for byte in self.0 {
            write!(f, "{}", byte.escape_ascii())?;
        }
        Ok(())
    }
}

impl From<[u8; 4]> for TagBytes {
    #[inline]
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<TagBytes> for [u8; 4] {
    #[inline]
    fn from(tag: TagBytes) -> Self {
        tag.0
    }
}

/// The chunk types understood by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum::EnumIter)]
#[derive(strum::EnumCount)]
#[derive(strum::VariantArray)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChunkTag {
    /// `SMP4`: four-channel trace samples
    Samples,
    /// `BASE`: basecalls
    Basecalls,
    /// `BPOS`: per-base peak positions
    Positions,
    /// `CNF4`: four-channel confidence scores
    Confidence,
    /// `TEXT`: key/value comments
    Comments,
    /// `CLIP`: usable base range
    Clip,
}

impl ChunkTag {
    /// Look up a wire tag.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkDecodeError::UnknownChunkTag`] carrying the tag bytes
    /// if no chunk type matches.
    pub fn from_bytes(bytes: [u8; 4]) -> Result<Self, ChunkDecodeError> {
        match &bytes {
            b"SMP4" => Ok(Self::Samples),
            b"BASE" => Ok(Self::Basecalls),
            b"BPOS" => Ok(Self::Positions),
            b"CNF4" => Ok(Self::Confidence),
            b"TEXT" => Ok(Self::Comments),
            b"CLIP" => Ok(Self::Clip),
            _ => Err(ChunkDecodeError::UnknownChunkTag(TagBytes::new(bytes))),
        }
    }

    /// The wire tag for this chunk type.
    pub const fn as_bytes(self) -> [u8; 4] {
        match self {
            Self::Samples => *b"SMP4",
            Self::Basecalls => *b"BASE",
            Self::Positions => *b"BPOS",
            Self::Confidence => *b"CNF4",
            Self::Comments => *b"TEXT",
            Self::Clip => *b"CLIP",
        }
    }

    /// The wire tag as a string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Samples => "SMP4",
            Self::Basecalls => "BASE",
            Self::Positions => "BPOS",
            Self::Confidence => "CNF4",
            Self::Comments => "TEXT",
            Self::Clip => "CLIP",
        }
    }
}

impl fmt::Display for ChunkTag {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl TryFrom<[u8; 4]> for ChunkTag {
    type Error = ChunkDecodeError;

    #[inline]
    fn try_from(bytes: [u8; 4]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<TagBytes> for ChunkTag {
    type Error = ChunkDecodeError;

    #[inline]
    fn try_from(tag: TagBytes) -> Result<Self, Self::Error> {
        Self::from_bytes(tag.0)
    }
}

impl From<ChunkTag> for TagBytes {
    #[inline]
    fn from(tag: ChunkTag) -> Self {
        Self(tag.as_bytes())
    }
}
