use crate::common::*;

/// Channel means of the fixed photometric normalization.
pub const NORMALIZE_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// Channel standard deviations of the fixed photometric normalization.
pub const NORMALIZE_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// The record with image path and box, but without image pixels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRecord {
    pub path: PathBuf,
    pub class: usize,
    /// Bounding box in pixel units of the source image.
    pub bbox: TLBR<R64>,
}

/// The loaded record: decoded pixels, class id and box, owned by the dataset.
#[derive(Debug, Clone)]
pub struct Record {
    pub image: RgbImage,
    pub class: usize,
    pub bbox: TLBR<R64>,
}

/// A composed sample returned by per-index retrieval.
///
/// Image and box are independent copies; mutating them never touches the
/// dataset's stored records.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub image: ChwImage,
    pub class: usize,
    pub bbox: TLBR<R64>,
}

/// A 3-channel image in CHW layout with normalized float channels.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct ChwImage {
    data: Vec<f32>,
    #[getset(get_copy = "pub")]
    height: u32,
    #[getset(get_copy = "pub")]
    width: u32,
}

impl ChwImage {
    /// Apply the fixed photometric normalization `(p / 255 - mean) / std`.
    pub fn from_rgb_normalized(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let num_pixels = (width as usize) * (height as usize);
        let mut data = vec![0.0; num_pixels * 3];

        for (x, y, pixel) in image.enumerate_pixels() {
            let offset = (y * width + x) as usize;
            for channel in 0..3 {
                let value = pixel[channel] as f32 / 255.0;
                data[channel * num_pixels + offset] =
                    (value - NORMALIZE_MEAN[channel]) / NORMALIZE_STD[channel];
            }
        }

        Self {
            data,
            height,
            width,
        }
    }

    /// Invert the fixed normalization back to an 8-bit image for display.
    pub fn to_rgb(&self) -> RgbImage {
        let num_pixels = (self.width as usize) * (self.height as usize);
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let offset = (y * self.width + x) as usize;
            let mut pixel = [0u8; 3];
            for channel in 0..3 {
                let value = self.data[channel * num_pixels + offset] * NORMALIZE_STD[channel]
                    + NORMALIZE_MEAN[channel];
                pixel[channel] = (value * 255.0).round().clamp(0.0, 255.0) as u8;
            }
            Rgb(pixel)
        })
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The value of `channel` at pixel `(x, y)`.
    pub fn get(&self, channel: usize, y: u32, x: u32) -> f32 {
        let num_pixels = (self.width as usize) * (self.height as usize);
        self.data[channel * num_pixels + (y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalization_of_known_pixel() {
        let image = RgbImage::from_pixel(2, 2, Rgb([255, 0, 128]));
        let chw = ChwImage::from_rgb_normalized(&image);

        assert_eq!(chw.height(), 2);
        assert_eq!(chw.width(), 2);
        assert_abs_diff_eq!(chw.get(0, 0, 0), (1.0 - 0.485) / 0.229, epsilon = 1e-6);
        assert_abs_diff_eq!(chw.get(1, 1, 1), (0.0 - 0.456) / 0.224, epsilon = 1e-6);
        assert_abs_diff_eq!(
            chw.get(2, 0, 1),
            (128.0 / 255.0 - 0.406) / 0.225,
            epsilon = 1e-6
        );
    }

    #[test]
    fn normalization_round_trip() {
        let image = RgbImage::from_fn(3, 3, |x, y| Rgb([(x * 40) as u8, (y * 70) as u8, 200]));
        let restored = ChwImage::from_rgb_normalized(&image).to_rgb();
        assert_eq!(restored, image);
    }
}
