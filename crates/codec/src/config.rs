//! Decoder limits

/// Transform layers the reader will strip from one payload before giving up.
pub const DEFAULT_MAX_TRANSFORM_LAYERS: usize = 64;

/// Settings for the chunk reader.
///
/// ```
/// use ztr_codec::DecodeConfig;
///
/// let config = DecodeConfig::default().with_max_transform_layers(8);
/// assert_eq!(config.max_transform_layers(), 8);
/// assert!(config.detect_cycles());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeConfig {
    max_transform_layers: usize,
    detect_cycles: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_transform_layers: DEFAULT_MAX_TRANSFORM_LAYERS,
            detect_cycles: true,
        }
    }
}

impl DecodeConfig {
    /// Cap the number of transform layers inverted per payload.
    pub const fn with_max_transform_layers(mut self, layers: usize) -> Self {
        self.max_transform_layers = layers;
        self
    }

    /// Fail as soon as an intermediate buffer repeats.
    pub const fn with_detect_cycles(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    /// Maximum transform layers inverted per payload.
    pub const fn max_transform_layers(&self) -> usize {
        self.max_transform_layers
    }

    /// Whether repeated intermediate buffers are treated as a cycle.
    pub const fn detect_cycles(&self) -> bool {
        self.detect_cycles
    }
}
