//! Compression transforms for ZTR trace chunks.
//!
//! A ZTR chunk payload may be wrapped in any number of reversible transform
//! layers. Each layer announces itself with a leading format byte; a zero
//! byte means no transform remains.
//!
//! ## Key Components
//!
//! - [`TransformKind`]: the closed set of transforms, keyed by format byte
//! - [`TransformRegistry`]: classify a buffer and strip one layer
//! - [`StandardTransforms`]: the stateless registry covering every kind
//! - [`wrap`]: produce a layer from plain bytes
//!
//! ## Usage Examples
//!
//! ```
//! use ztr_transforms::{Classification, Layer, StandardTransforms, TransformRegistry, wrap};
//!
//! let payload = [0u8, 0, 0, 0, 0, 0, 0, 42];
//! let wrapped = wrap(&payload, Layer::RunLength { guard: None }).unwrap();
//!
//! let registry = StandardTransforms;
//! let Classification::Wrapped(kind) = registry.classify(&wrapped).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(registry.invert(kind, &wrapped).unwrap(), payload);
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod error;
pub mod kernels;
mod kind;
mod registry;

pub use error::{Result, TransformError};
pub use kind::{Classification, TransformKind};
pub use registry::{RAW_FORMAT, StandardTransforms, TransformRegistry};

pub use flate2::Compression;

use kernels::{delta, follow, rle, shrink, zlib};

/// Parameters for producing one transform layer.
#[derive(Clone, Copy, Debug)]
pub enum Layer {
    /// Run-length encoding; `None` picks the least frequent byte as guard.
    RunLength {
        /// Guard byte
        guard: Option<u8>,
    },
    /// zlib at the given compression level.
    Zlib(Compression),
    /// Delta coding.
    Delta {
        /// Value width
        width: delta::Width,
        /// Prediction level, 1 to 3
        level: u8,
    },
    /// Shrink wide big-endian values to bytes.
    Shrink(shrink::Wide),
    /// Successor-table prediction.
    Follow,
}

impl Layer {
    /// The transform this layer produces.
    pub const fn kind(&self) -> TransformKind {
        match self {
            Self::RunLength { .. } => TransformKind::RunLength,
            Self::Zlib(_) => TransformKind::Zlib,
            Self::Delta { width, .. } => match width {
                delta::Width::One => TransformKind::Delta1,
                delta::Width::Two => TransformKind::Delta2,
                delta::Width::Four => TransformKind::Delta4,
            },
            Self::Shrink(shrink::Wide::Sixteen) => TransformKind::Shrink16To8,
            Self::Shrink(shrink::Wide::ThirtyTwo) => TransformKind::Shrink32To8,
            Self::Follow => TransformKind::Follow1,
        }
    }
}

/// Wrap `data` in one transform layer.
///
/// # Errors
///
/// Fails when `data` is not a whole number of values for width-sensitive
/// layers, for an out-of-range delta level, for input longer than a 32-bit
/// length field, or on a zlib failure.
pub fn wrap(data: &[u8], layer: Layer) -> Result<Vec<u8>> {
    match layer {
        Layer::RunLength { guard } => rle::apply(data, guard),
        Layer::Zlib(level) => zlib::apply(data, level),
        Layer::Delta { width, level } => delta::apply(data, width, level),
        Layer::Shrink(wide) => shrink::apply(data, wide),
        Layer::Follow => Ok(follow::apply(data)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernels::delta::Width;
    use kernels::shrink::Wide;

    #[test]
    fn test_wrap_then_invert_every_layer() {
        let data: Vec<u8> = (0..64u16).flat_map(|v| (v * 3).to_be_bytes()).collect();
        let layers = [
            Layer::RunLength { guard: None },
            Layer::Zlib(Compression::best()),
            Layer::Delta { width: Width::One, level: 1 },
            Layer::Delta { width: Width::Two, level: 2 },
            Layer::Delta { width: Width::Four, level: 3 },
            Layer::Shrink(Wide::Sixteen),
            Layer::Shrink(Wide::ThirtyTwo),
            Layer::Follow,
        ];
        let registry = StandardTransforms;
        for layer in layers {
            let wrapped = wrap(&data, layer).unwrap();
            assert_eq!(
                registry.classify(&wrapped).unwrap(),
                Classification::Wrapped(layer.kind())
            );
            assert_eq!(registry.invert(layer.kind(), &wrapped).unwrap(), data);
        }
    }

    #[test]
    fn test_oversized_input_error() {
        let err = TransformError::too_large(TransformKind::Zlib, 1 << 33);
        assert!(matches!(err, TransformError::TooLarge { len: 0x2_0000_0000, .. }));
        assert!(err.to_string().contains("8589934592 bytes"));
    }

    #[test]
    fn test_nested_layers() {
        let data = vec![0u8; 300];
        let inner = wrap(&data, Layer::RunLength { guard: Some(1) }).unwrap();
        let outer = wrap(&inner, Layer::Zlib(Compression::default())).unwrap();

        let registry = StandardTransforms;
        let once = registry.invert(TransformKind::Zlib, &outer).unwrap();
        assert_eq!(once, inner);
        let twice = registry.invert(TransformKind::RunLength, &once).unwrap();
        assert_eq!(registry.classify(&twice).unwrap(), Classification::Raw);
        assert_eq!(twice, data);
    }
}
