use log::warn;

use super::error::{RecordError, Result};
use super::{Channels, ClipRange, Comments};
use crate::chunk::ChunkData;

/// One sequencing read: basecalls, peaks, clip, confidences, traces and comments.
///
/// Fields are absent until set. A record that came out of
/// [`ChromatogramBuilder::build`] satisfies:
///
/// - peak positions and confidence lanes have one entry per basecall
/// - the four confidence lanes, and the four sample lanes, share a length
/// - the clip range lies within `0..=num_bases`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChromatogramRecord {
    basecalls: Option<String>,
    peak_positions: Option<Vec<i16>>,
    clip_range: Option<ClipRange>,
    confidence: Option<Channels<u8>>,
    samples: Option<Channels<i16>>,
    comments: Option<Comments>,
}

impl ChromatogramRecord {
    /// Start an empty builder.
    pub fn builder() -> ChromatogramBuilder {
        ChromatogramBuilder::default()
    }

    /// Reopen this record for modification.
    pub fn into_builder(self) -> ChromatogramBuilder {
        ChromatogramBuilder { record: self }
    }

    /// The called bases, one ASCII character each.
    pub fn basecalls(&self) -> Option<&str> {
        self.basecalls.as_deref()
    }

    /// Trace sample index of each base's peak.
    pub fn peak_positions(&self) -> Option<&[i16]> {
        self.peak_positions.as_deref()
    }

    /// Usable base range.
    pub const fn clip_range(&self) -> Option<ClipRange> {
        self.clip_range
    }

    /// Per-base, per-channel confidence scores.
    pub const fn confidence(&self) -> Option<&Channels<u8>> {
        self.confidence.as_ref()
    }

    /// Per-channel trace amplitudes.
    pub const fn samples(&self) -> Option<&Channels<i16>> {
        self.samples.as_ref()
    }

    /// Free-text comments.
    pub const fn comments(&self) -> Option<&Comments> {
        self.comments.as_ref()
    }

    /// Number of bases, if basecalls are present.
    pub fn num_bases(&self) -> Option<usize> {
        self.basecalls.as_ref().map(String::len)
    }

    /// Number of trace samples per channel, if samples are present and consistent.
    pub fn num_samples(&self) -> Option<usize> {
        self.samples.as_ref().and_then(Channels::len)
    }

    /// Check the cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordError`] found.
    pub fn validate(&self) -> Result<()> {
        if let Some(confidence) = &self.confidence {
            if confidence.len().is_none() {
                return Err(RecordError::UnequalChannels { field: "confidence" });
            }
        }
        if let Some(samples) = &self.samples {
            if samples.len().is_none() {
                return Err(RecordError::UnequalChannels { field: "samples" });
            }
        }

        let Some(num_bases) = self.num_bases() else {
            if let Some(clip) = self.clip_range {
                if clip.begin() < 0 || clip.begin() > clip.end() {
                    return Err(RecordError::ClipOutOfRange {
                        begin: clip.begin(),
                        end: clip.end(),
                        num_bases: 0,
                    });
                }
            }
            return Ok(());
        };

        if let Some(peaks) = &self.peak_positions {
            check_len("peak positions", num_bases, peaks.len())?;
        }
        if let Some(len) = self.confidence.as_ref().and_then(Channels::len) {
            check_len("confidence", num_bases, len)?;
        }
        if let Some(clip) = self.clip_range {
            if !clip.fits(num_bases) {
                return Err(RecordError::ClipOutOfRange {
                    begin: clip.begin(),
                    end: clip.end(),
                    num_bases,
                });
            }
        }
        Ok(())
    }
}

const fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(RecordError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Accumulates record fields one chunk (or one setter) at a time.
#[derive(Clone, Debug, Default)]
pub struct ChromatogramBuilder {
    record: ChromatogramRecord,
}

impl ChromatogramBuilder {
    /// Set the basecalls.
    pub fn with_basecalls(mut self, basecalls: impl Into<String>) -> Self {
        self.record.basecalls = Some(basecalls.into());
        self
    }

    /// Set the peak positions.
    pub fn with_peak_positions(mut self, peaks: impl Into<Vec<i16>>) -> Self {
        self.record.peak_positions = Some(peaks.into());
        self
    }

    /// Set the clip range.
    pub fn with_clip_range(mut self, clip: impl Into<ClipRange>) -> Self {
        self.record.clip_range = Some(clip.into());
        self
    }

    /// Set the confidence lanes.
    pub fn with_confidence(mut self, confidence: Channels<u8>) -> Self {
        self.record.confidence = Some(confidence);
        self
    }

    /// Set the trace sample lanes.
    pub fn with_samples(mut self, samples: Channels<i16>) -> Self {
        self.record.samples = Some(samples);
        self
    }

    /// Set the comments.
    pub fn with_comments(mut self, comments: Comments) -> Self {
        self.record.comments = Some(comments);
        self
    }

    /// Basecalls seen so far; CNF4 decoding depends on them.
    pub fn basecalls(&self) -> Option<&str> {
        self.record.basecalls()
    }

    /// Merge one decoded chunk into the record.
    ///
    /// Comment chunks accumulate. Any other field seen twice keeps the later
    /// value.
    pub fn apply(&mut self, data: ChunkData) {
        let tag = data.tag();
        let replaced = match data {
            ChunkData::Basecalls(bases) => self.record.basecalls.replace(bases).is_some(),
            ChunkData::Positions(peaks) => self.record.peak_positions.replace(peaks).is_some(),
            ChunkData::Clip(clip) => self.record.clip_range.replace(clip).is_some(),
            ChunkData::Confidence(lanes) => self.record.confidence.replace(lanes).is_some(),
            ChunkData::Samples(lanes) => self.record.samples.replace(lanes).is_some(),
            ChunkData::Comments(comments) => {
                match &mut self.record.comments {
                    Some(existing) => existing.extend(comments),
                    None => self.record.comments = Some(comments),
                }
                false
            }
        };
        if replaced {
            warn!("duplicate {tag} chunk replaces the earlier one");
        }
    }

    /// Finish and validate.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] if the fields are inconsistent.
    pub fn build(self) -> Result<ChromatogramRecord> {
        self.record.validate()?;
        Ok(self.record)
    }

    /// Finish without checking invariants.
    pub fn build_unchecked(self) -> ChromatogramRecord {
        self.record
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for ChromatogramRecord {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        const BASES: &[u8] = b"ACGTNacgtn";
        const TEXT: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 _:=.";

        fn text(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<String> {
            let len = u.int_in_range(1..=16)?;
            (0..len)
                .map(|_| u.choose(TEXT).map(|&b| b as char))
                .collect()
        }

        let num_bases = u.int_in_range(0..=128usize)?;
        let basecalls: String = (0..num_bases)
            .map(|_| u.choose(BASES).map(|&b| b as char))
            .collect::<arbitrary::Result<_>>()?;

        let mut lanes = || -> arbitrary::Result<Vec<u8>> {
            (0..num_bases).map(|_| u.int_in_range(0..=127u8)).collect()
        };
        let confidence = Channels::new(lanes()?, lanes()?, lanes()?, lanes()?);

        let peaks = (0..num_bases)
            .map(|_| <i16 as arbitrary::Arbitrary>::arbitrary(u))
            .collect::<arbitrary::Result<Vec<_>>>()?;

        let num_samples = u.int_in_range(0..=256usize)?;
        let mut trace = || -> arbitrary::Result<Vec<i16>> {
            (0..num_samples).map(|_| <i16 as arbitrary::Arbitrary>::arbitrary(u)).collect()
        };
        let samples = Channels::new(trace()?, trace()?, trace()?, trace()?);

        let begin = u.int_in_range(0..=num_bases as i32)?;
        let end = u.int_in_range(begin..=num_bases as i32)?;

        let mut comments = Comments::new();
        for _ in 0..u.int_in_range(0..=4)? {
            comments.push(text(u)?, text(u)?);
        }

        Ok(ChromatogramRecord {
            basecalls: Some(basecalls),
            peak_positions: Some(peaks),
            clip_range: Some(ClipRange::new(begin, end)),
            confidence: Some(confidence),
            samples: Some(samples),
            comments: Some(comments),
        })
    }
}
