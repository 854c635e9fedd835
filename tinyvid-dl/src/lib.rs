//! Dataset assembly and geometry-consistent augmentation for the tiny-VID
//! single-object detection task.
//!
//! The crate builds fixed-split (image, class, box) records with positional
//! correspondence, composes per-index samples with optional label-covariant
//! augmentation, and renders debug overlays of candidate anchors against the
//! ground-truth box.

pub mod common;
pub mod dataset;
pub mod error;
pub mod overlay;
pub mod processor;

pub use dataset::*;
pub use error::{Error, Result};
