//! The random color perturbation algorithm.
//!
//! Label-invariant: only pixels change, boxes are never touched.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorJitterInit {
    /// Brightness factor drawn from `[1 - brightness, 1 + brightness]`.
    pub brightness: R64,
    /// Contrast factor drawn from `[1 - contrast, 1 + contrast]`.
    pub contrast: R64,
    /// Saturation factor drawn from `[1 - saturation, 1 + saturation]`.
    pub saturation: R64,
    /// Hue shift drawn from `[-hue, hue]` turns of the hue circle.
    pub hue: R64,
    /// Probability of replacing the image with channel-replicated grayscale.
    pub grayscale_prob: R64,
}

impl Default for ColorJitterInit {
    fn default() -> Self {
        Self {
            brightness: r64(0.25),
            contrast: r64(0.25),
            saturation: r64(0.25),
            hue: r64(0.25),
            grayscale_prob: r64(0.1),
        }
    }
}

impl ColorJitterInit {
    /// A configuration that passes every image through unchanged.
    pub fn disabled() -> Self {
        Self {
            brightness: r64(0.0),
            contrast: r64(0.0),
            saturation: r64(0.0),
            hue: r64(0.0),
            grayscale_prob: r64(0.0),
        }
    }

    pub fn build(self) -> ColorJitter {
        let Self {
            brightness,
            contrast,
            saturation,
            hue,
            grayscale_prob,
        } = self;

        ColorJitter {
            max_brightness: brightness.raw(),
            max_contrast: contrast.raw(),
            max_saturation: saturation.raw(),
            max_hue: hue.raw(),
            grayscale_prob: grayscale_prob.raw(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColorJitter {
    max_brightness: f64,
    max_contrast: f64,
    max_saturation: f64,
    max_hue: f64,
    grayscale_prob: f64,
}

impl ColorJitter {
    pub fn forward<R>(&self, rgb: &RgbImage, rng: &mut R) -> RgbImage
    where
        R: Rng + ?Sized,
    {
        let brightness = draw_factor(self.max_brightness, rng);
        let contrast = draw_factor(self.max_contrast, rng);
        let saturation = draw_factor(self.max_saturation, rng);
        let hue_shift = if self.max_hue > 0.0 {
            rng.gen_range(-self.max_hue..self.max_hue)
        } else {
            0.0
        };
        let grayscale = self.grayscale_prob > 0.0 && rng.gen_bool(self.grayscale_prob);

        // the contrast adjustment pivots on the mean luma of the input
        let mean_luma = rgb
            .pixels()
            .map(|pixel| luma(to_unit(pixel)))
            .sum::<f64>()
            / (rgb.width() as f64 * rgb.height() as f64);

        let mut output = rgb.clone();
        for pixel in output.pixels_mut() {
            let mut channels = to_unit(pixel);

            for value in &mut channels {
                *value *= brightness;
                *value = mean_luma + (*value - mean_luma) * contrast;
            }

            let gray = luma(channels);
            for value in &mut channels {
                *value = gray + (*value - gray) * saturation;
            }

            if hue_shift != 0.0 {
                let [h, s, v] = rgb_to_hsv(channels);
                channels = hsv_to_rgb([(h + hue_shift * 360.0).rem_euclid(360.0), s, v]);
            }

            if grayscale {
                let gray = luma(channels);
                channels = [gray, gray, gray];
            }

            *pixel = from_unit(channels);
        }
        output
    }
}

fn draw_factor<R>(max_delta: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    if max_delta > 0.0 {
        rng.gen_range((1.0 - max_delta)..(1.0 + max_delta))
    } else {
        1.0
    }
}

fn to_unit(pixel: &Rgb<u8>) -> [f64; 3] {
    [
        pixel[0] as f64 / 255.0,
        pixel[1] as f64 / 255.0,
        pixel[2] as f64 / 255.0,
    ]
}

fn from_unit(channels: [f64; 3]) -> Rgb<u8> {
    Rgb(channels.map(|value| (value.clamp(0.0, 1.0) * 255.0).round() as u8))
}

fn luma([r, g, b]: [f64; 3]) -> f64 {
    0.299 * r + 0.587 * g + 0.114 * b
}

/// RGB in unit range to HSV with hue in degrees.
fn rgb_to_hsv([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    [hue, saturation, max]
}

/// HSV with hue in degrees back to RGB in unit range.
fn hsv_to_rgb([h, s, v]: [f64; 3]) -> [f64; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;

    #[test]
    fn disabled_jitter_is_identity() {
        let jitter = ColorJitterInit::disabled().build();
        let mut rng = StdRng::seed_from_u64(777);
        let image = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 77]));
        assert_eq!(jitter.forward(&image, &mut rng), image);
    }

    #[test]
    fn forced_grayscale_replicates_channels() {
        let jitter = ColorJitterInit {
            grayscale_prob: r64(1.0),
            ..ColorJitterInit::disabled()
        }
        .build();
        let mut rng = StdRng::seed_from_u64(0);
        let image = RgbImage::from_pixel(4, 4, Rgb([200, 40, 90]));
        let output = jitter.forward(&image, &mut rng);
        for pixel in output.pixels() {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
        }
    }

    #[test]
    fn jittered_output_stays_in_range() {
        let jitter = ColorJitterInit::default().build();
        let mut rng = StdRng::seed_from_u64(42);
        let image = RgbImage::from_pixel(8, 8, Rgb([250, 5, 128]));
        // clamping is exercised by extreme channels; conversion must not wrap
        for _ in 0..16 {
            let _ = jitter.forward(&image, &mut rng);
        }
    }

    #[test]
    fn hsv_round_trip() {
        for rgb in [
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.8, 0.2, 0.1],
            [0.1, 0.9, 0.4],
            [0.3, 0.3, 0.7],
        ] {
            let back = hsv_to_rgb(rgb_to_hsv(rgb));
            for channel in 0..3 {
                assert_abs_diff_eq!(back[channel], rgb[channel], epsilon = 1e-9);
            }
        }
    }
}
