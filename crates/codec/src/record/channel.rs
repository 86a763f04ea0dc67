//! Nucleotide channels
//!
//! CNF4 and SMP4 chunks carry one lane per nucleotide. [`Channel`] names a
//! lane and encodes the called/uncalled permutation used by CNF4;
//! [`Channels`] holds the four lanes.

use core::fmt;
use core::ops::{Index, IndexMut};

use strum::VariantArray;

/// One of the four nucleotide lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::IntoStaticStr)]
#[derive(strum::EnumIter)]
#[derive(strum::EnumCount)]
#[derive(strum::VariantArray)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Adenine
    A,
    /// Cytosine
    C,
    /// Guanine
    G,
    /// Thymine, and every base that is not A, C or G
    T,
}

impl Channel {
    /// The channel a basecall is assigned to.
    ///
    /// Matching is case-insensitive; anything other than A, C or G
    /// (including `N` and IUPAC ambiguity codes) maps to [`Channel::T`].
    #[inline]
    pub const fn called(base: u8) -> Self {
        match base {
            b'A' | b'a' => Self::A,
            b'C' | b'c' => Self::C,
            b'G' | b'g' => Self::G,
            _ => Self::T,
        }
    }

    /// The three remaining channels for a basecall, in wire order.
    #[inline]
    pub const fn uncalled(base: u8) -> [Self; 3] {
        match Self::called(base) {
            Self::A => [Self::C, Self::G, Self::T],
            Self::C => [Self::A, Self::G, Self::T],
            Self::G => [Self::A, Self::C, Self::T],
            Self::T => [Self::A, Self::C, Self::G],
        }
    }

    /// Position of this channel in A, C, G, T order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter name of the channel.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for Channel {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Four parallel lanes of per-channel values, stored in A, C, G, T order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channels<T> {
    lanes: [Vec<T>; 4],
}

impl<T> Channels<T> {
    /// Create from the four lanes.
    pub const fn new(a: Vec<T>, c: Vec<T>, g: Vec<T>, t: Vec<T>) -> Self {
        Self {
            lanes: [a, c, g, t],
        }
    }

    /// Four empty lanes with room for `capacity` values each.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lanes: core::array::from_fn(|_| Vec::with_capacity(capacity)),
        }
    }

    /// The lane for `channel`.
    #[inline]
    pub fn get(&self, channel: Channel) -> &[T] {
        &self.lanes[channel.index()]
    }

    /// Mutable access to the lane for `channel`.
    #[inline]
    pub fn get_mut(&mut self, channel: Channel) -> &mut Vec<T> {
        &mut self.lanes[channel.index()]
    }

    /// The common lane length, or `None` if the lanes disagree.
    pub fn len(&self) -> Option<usize> {
        let len = self.lanes[0].len();
        self.lanes.iter().all(|lane| lane.len() == len).then_some(len)
    }

    /// True if every lane is empty.
    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(Vec::is_empty)
    }

    /// Iterate over `(channel, lane)` pairs in A, C, G, T order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &[T])> {
        Channel::VARIANTS
            .iter()
            .copied()
            .zip(self.lanes.iter().map(Vec::as_slice))
    }

    /// Consume into the four lanes in A, C, G, T order.
    pub fn into_lanes(self) -> [Vec<T>; 4] {
        self.lanes
    }
}

impl<T: Clone + Default> Channels<T> {
    /// Four lanes of `len` default values.
    pub fn filled(len: usize) -> Self {
        Self {
            lanes: core::array::from_fn(|_| vec![T::default(); len]),
        }
    }
}

impl<T> Index<Channel> for Channels<T> {
    type Output = [T];

    #[inline]
    fn index(&self, channel: Channel) -> &Self::Output {
        self.get(channel)
    }
}

impl<T> IndexMut<Channel> for Channels<T> {
    #[inline]
    fn index_mut(&mut self, channel: Channel) -> &mut Self::Output {
        &mut self.lanes[channel.index()]
    }
}
