//! Transform lookup
//!
//! The [`TransformRegistry`] trait is the seam between chunk framing and the
//! compression layers: it recognises a layer by the buffer's leading byte and
//! strips exactly one layer per call. [`StandardTransforms`] covers every
//! transform in [`TransformKind`].

use log::trace;

use crate::error::{Result, TransformError};
use crate::kernels::{delta, follow, rle, shrink, zlib};
use crate::{Classification, TransformKind};

/// Format byte of an untransformed payload.
pub const RAW_FORMAT: u8 = 0;

/// Resolves and inverts transform layers.
///
/// Implementations are lookup tables without mutable state, so a single
/// registry can be shared by any number of concurrent decoders.
pub trait TransformRegistry: Send + Sync {
    /// Inspect the buffer's leading byte.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Unsupported`] for an unknown format byte.
    fn classify(&self, buf: &[u8]) -> Result<Classification>;

    /// Strip one layer of `kind` from `buf`, format byte included.
    fn invert(&self, kind: TransformKind, buf: &[u8]) -> Result<Vec<u8>>;
}

/// The transforms defined by the ZTR format.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardTransforms;

impl TransformRegistry for StandardTransforms {
    fn classify(&self, buf: &[u8]) -> Result<Classification> {
        match buf.first() {
            None | Some(&RAW_FORMAT) => Ok(Classification::Raw),
            Some(&byte) => TransformKind::try_from(byte)
                .map(Classification::Wrapped)
                .map_err(|_| TransformError::Unsupported(byte)),
        }
    }

    fn invert(&self, kind: TransformKind, buf: &[u8]) -> Result<Vec<u8>> {
        if buf.first() != Some(&kind.format_byte()) {
            return Err(TransformError::corrupt(
                kind,
                "format byte does not match the transform",
            ));
        }
        trace!("inverting {kind} layer over {} bytes", buf.len());

        match kind {
            TransformKind::RunLength => rle::invert(buf),
            TransformKind::Zlib => zlib::invert(buf),
            TransformKind::Delta1 => delta::invert(buf, delta::Width::One),
            TransformKind::Delta2 => delta::invert(buf, delta::Width::Two),
            TransformKind::Delta4 => delta::invert(buf, delta::Width::Four),
            TransformKind::Shrink16To8 => shrink::invert(buf, shrink::Wide::Sixteen),
            TransformKind::Shrink32To8 => shrink::invert(buf, shrink::Wide::ThirtyTwo),
            TransformKind::Follow1 => follow::invert(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_raw() {
        let registry = StandardTransforms;
        assert_eq!(registry.classify(&[0, 1, 2]).unwrap(), Classification::Raw);
        assert_eq!(registry.classify(&[]).unwrap(), Classification::Raw);
    }

    #[test]
    fn test_classify_wrapped() {
        let registry = StandardTransforms;
        assert_eq!(
            registry.classify(&[2, 0, 0, 0, 0]).unwrap(),
            Classification::Wrapped(TransformKind::Zlib)
        );
        assert_eq!(
            registry.classify(&[71]).unwrap(),
            Classification::Wrapped(TransformKind::Shrink32To8)
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert!(matches!(
            StandardTransforms.classify(&[0x4f, 0]),
            Err(TransformError::Unsupported(0x4f))
        ));
    }

    #[test]
    fn test_invert_rejects_wrong_format_byte() {
        assert!(matches!(
            StandardTransforms.invert(TransformKind::Zlib, &[1, 0, 0, 0, 0, 0]),
            Err(TransformError::Corrupt { kind: TransformKind::Zlib, .. })
        ));
    }

    #[test]
    fn test_invert_dispatches() {
        let wrapped = rle::apply(&[0, 0, 0, 0, 5], Some(9)).unwrap();
        assert_eq!(
            StandardTransforms
                .invert(TransformKind::RunLength, &wrapped)
                .unwrap(),
            vec![0, 0, 0, 0, 5]
        );
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StandardTransforms>();
    }
}
