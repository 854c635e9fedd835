//! Debug rendering of candidate anchors against the ground-truth box.
//!
//! Inspection tooling only; the single correctness obligation is faithful
//! conversion of normalized center/size anchors into pixel corner boxes.

use crate::common::*;

const PALETTE: [Rgb<u8>; 3] = [Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255])];
const CANVAS_TILES: u32 = 3;

/// Composite normalized anchors onto a padded canvas around `image`.
///
/// The canvas is three image sides on a side, with the source image in the
/// center tile so anchors larger than the image stay visible. Each anchor is
/// rescaled from unit size to pixel units and shifted by one image side, then
/// drawn with a palette color cycling by index. The source image must be
/// square.
pub fn anchor_canvas(anchors: &[CyCxHW<R64>], image: &RgbImage) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if height != width {
        return Err(Error::NonSquareImage { height, width });
    }
    let side = height;

    let mut canvas = RgbImage::new(side * CANVAS_TILES, side * CANVAS_TILES);
    imageops::replace(&mut canvas, image, side as i64, side as i64);

    let place = Transform::scale_offset(r64(side as f64), r64(side as f64));
    for (index, anchor) in anchors.iter().enumerate() {
        let corner = TLBR::from(&place * anchor);
        draw_rect(&mut canvas, &corner, PALETTE[index % PALETTE.len()]);
    }
    Ok(canvas)
}

/// The unpadded image with its ground-truth box drawn on top.
pub fn ground_truth_canvas(image: &RgbImage, bbox: &TLBR<R64>) -> RgbImage {
    let mut canvas = image.clone();
    draw_rect(&mut canvas, bbox, PALETTE[0]);
    canvas
}

/// Rasterize a one-pixel rectangle outline, clipped to the canvas bounds.
pub fn draw_rect(canvas: &mut RgbImage, rect: &TLBR<R64>, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let clip = |value: R64, bound: u32| -> u32 {
        value.raw().round().clamp(0.0, (bound - 1) as f64) as u32
    };

    let top = clip(rect.t(), height);
    let bottom = clip(rect.b(), height);
    let left = clip(rect.l(), width);
    let right = clip(rect.r(), width);

    for x in left..=right {
        canvas.put_pixel(x, top, color);
        canvas.put_pixel(x, bottom, color);
    }
    for y in top..=bottom {
        canvas.put_pixel(left, y, color);
        canvas.put_pixel(right, y, color);
    }
}
