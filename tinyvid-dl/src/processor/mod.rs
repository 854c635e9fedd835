//! Per-sample augmentation processors.

mod augmentation;
mod color_jitter;
mod random_flip;

pub use augmentation::*;
pub use color_jitter::*;
pub use random_flip::*;
