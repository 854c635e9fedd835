//! Label-covariant flip operators.

use crate::common::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipAxis {
    Vertical,
    Horizontal,
}

/// A flip applied to image and box in lock-step with fixed probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomFlip {
    axis: FlipAxis,
    prob: f64,
}

impl RandomFlip {
    pub fn vertical(prob: f64) -> Self {
        Self {
            axis: FlipAxis::Vertical,
            prob,
        }
    }

    pub fn horizontal(prob: f64) -> Self {
        Self {
            axis: FlipAxis::Horizontal,
            prob,
        }
    }

    /// Toss the coin and either flip image and box together or pass both
    /// through unchanged.
    pub fn forward<R>(
        &self,
        image: &RgbImage,
        bbox: &TLBR<R64>,
        rng: &mut R,
    ) -> (RgbImage, TLBR<R64>)
    where
        R: Rng + ?Sized,
    {
        if !rng.gen_bool(self.prob) {
            return (image.clone(), bbox.clone());
        }
        self.apply(image, bbox)
    }

    /// The deterministic flip, without the coin toss.
    pub fn apply(&self, image: &RgbImage, bbox: &TLBR<R64>) -> (RgbImage, TLBR<R64>) {
        let (width, height) = image.dimensions();
        match self.axis {
            FlipAxis::Vertical => (
                imageops::flip_vertical(image),
                bbox.flip_vertical(r64(height as f64)),
            ),
            FlipAxis::Horizontal => (
                imageops::flip_horizontal(image),
                bbox.flip_horizontal(r64(width as f64)),
            ),
        }
    }
}
