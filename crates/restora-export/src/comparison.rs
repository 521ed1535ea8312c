//! Side-by-side comparison raster.
//!
//! Places the original (left) and restored (right) images next to each
//! other on a white canvas, separated by a gap. Images of different
//! heights are top-aligned.

use image::{Rgb, RgbImage, imageops};

/// Default gap between the two panels, in pixels.
pub const DEFAULT_GAP: u32 = 16;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Compose `original` and `restored` into one image.
#[must_use = "returns the comparison image"]
pub fn side_by_side(original: &RgbImage, restored: &RgbImage, gap: u32) -> RgbImage {
    let width = original
        .width()
        .saturating_add(gap)
        .saturating_add(restored.width());
    let height = original.height().max(restored.height());

    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);
    imageops::replace(&mut canvas, original, 0, 0);
    imageops::replace(
        &mut canvas,
        restored,
        i64::from(original.width()) + i64::from(gap),
        0,
    );
    canvas
}
