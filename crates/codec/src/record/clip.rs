/// Suggested usable range of basecall indices, inclusive and 0-based.
///
/// `(0, 0)` is what writers store when no clip is known; an absent clip on a
/// record is distinct from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipRange {
    begin: i32,
    end: i32,
}

impl ClipRange {
    /// Create a clip range.
    #[inline]
    pub const fn new(begin: i32, end: i32) -> Self {
        Self { begin, end }
    }

    /// First usable base.
    #[inline]
    pub const fn begin(&self) -> i32 {
        self.begin
    }

    /// Last usable base.
    #[inline]
    pub const fn end(&self) -> i32 {
        self.end
    }

    /// True if `0 <= begin <= end <= num_bases`.
    pub const fn fits(&self, num_bases: usize) -> bool {
        self.begin >= 0 && self.begin <= self.end && (self.end as i64) <= num_bases as i64
    }
}

impl From<(i32, i32)> for ClipRange {
    fn from((begin, end): (i32, i32)) -> Self {
        Self::new(begin, end)
    }
}

impl From<ClipRange> for (i32, i32) {
    fn from(clip: ClipRange) -> Self {
        (clip.begin, clip.end)
    }
}
