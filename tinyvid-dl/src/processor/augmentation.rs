use super::{ColorJitter, ColorJitterInit, RandomFlip};
use crate::common::*;

/// Configuration of the per-sample augmentation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AugmentationInit {
    pub color_jitter: ColorJitterInit,
    pub vertical_flip_prob: R64,
    pub horizontal_flip_prob: R64,
}

impl Default for AugmentationInit {
    fn default() -> Self {
        Self {
            color_jitter: ColorJitterInit::default(),
            vertical_flip_prob: r64(0.5),
            horizontal_flip_prob: r64(0.5),
        }
    }
}

impl AugmentationInit {
    pub fn build(self) -> Augmentation {
        let Self {
            color_jitter,
            vertical_flip_prob,
            horizontal_flip_prob,
        } = self;

        Augmentation {
            color_jitter: color_jitter.build(),
            // fixed order, vertical then horizontal, so coin sequences
            // are reproducible; the flips commute on axis-aligned boxes
            flips: [
                RandomFlip::vertical(vertical_flip_prob.raw()),
                RandomFlip::horizontal(horizontal_flip_prob.raw()),
            ],
        }
    }
}

/// The photometric stage followed by the geometric flip stages.
#[derive(Debug, Clone)]
pub struct Augmentation {
    color_jitter: ColorJitter,
    flips: [RandomFlip; 2],
}

impl Augmentation {
    /// Transform an image and its box in lock-step.
    ///
    /// The photometric stage never touches the box. Each flip stage draws
    /// its own coin from `rng` and operates on the output of the previous
    /// stage.
    pub fn forward<R>(
        &self,
        image: &RgbImage,
        bbox: &TLBR<R64>,
        rng: &mut R,
    ) -> (RgbImage, TLBR<R64>)
    where
        R: Rng + ?Sized,
    {
        let mut image = self.color_jitter.forward(image, rng);
        let mut bbox = bbox.clone();

        for flip in &self.flips {
            let (next_image, next_bbox) = flip.forward(&image, &bbox, rng);
            image = next_image;
            bbox = next_bbox;
        }
        (image, bbox)
    }
}
