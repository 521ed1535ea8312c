//! Brightness, contrast, and sharpness enhancement.
//!
//! Every adjustment is a linear blend between the image and a
//! "degenerate" version of it:
//!
//! ```text
//! out = degenerate + factor * (image - degenerate)
//! ```
//!
//! clipped to `0..=255`. The degenerate image is black for brightness, a
//! uniform gray at the mean luminance for contrast, and a smoothed copy
//! for sharpness. A factor of `1.0` reproduces the input exactly, factors
//! below `1.0` move toward the degenerate image, and factors above `1.0`
//! extrapolate away from it.

use image::{Rgb, RgbImage};

use crate::binarize::luma;
use crate::types::EnhanceParams;

/// 3×3 smoothing kernel used as the sharpness reference, row-major.
const SMOOTH_KERNEL: [u32; 9] = [1, 1, 1, 1, 5, 1, 1, 1, 1];

/// Sum of [`SMOOTH_KERNEL`].
const SMOOTH_SCALE: u32 = 13;

/// Apply brightness, then contrast, then sharpness.
///
/// Each step consumes the previous step's output, so the contrast mean is
/// measured on the brightened image and sharpening works on the
/// contrast-adjusted one. Factors are applied as given; clamp them with
/// [`EnhanceParams::clamped`] first if they come from untrusted input.
#[must_use = "returns the enhanced image"]
pub fn enhance(image: &RgbImage, params: &EnhanceParams) -> RgbImage {
    if params.is_identity() {
        return image.clone();
    }

    let brightened = brightness(image, params.brightness);
    let contrasted = contrast(&brightened, params.contrast);
    let sharpened = sharpness(&contrasted, params.sharpness);
    tracing::debug!(
        brightness = params.brightness,
        contrast = params.contrast,
        sharpness = params.sharpness,
        "enhanced image"
    );
    sharpened
}

/// Scale every channel by `factor` (blend with black).
#[must_use = "returns the adjusted image"]
pub fn brightness(image: &RgbImage, factor: f32) -> RgbImage {
    if is_neutral(factor) {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let p = image.get_pixel(x, y).0;
        Rgb(p.map(|c| blend(0, c, factor)))
    })
}

/// Scale the distance of every channel from the mean luminance.
#[must_use = "returns the adjusted image"]
pub fn contrast(image: &RgbImage, factor: f32) -> RgbImage {
    if is_neutral(factor) {
        return image.clone();
    }
    let mean = mean_luminance(image);
    let (w, h) = image.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let p = image.get_pixel(x, y).0;
        Rgb(p.map(|c| blend(mean, c, factor)))
    })
}

/// Blend with a smoothed copy: below `1.0` blurs, above `1.0` sharpens.
#[must_use = "returns the adjusted image"]
pub fn sharpness(image: &RgbImage, factor: f32) -> RgbImage {
    if is_neutral(factor) {
        return image.clone();
    }
    let smoothed = smooth(image);
    let (w, h) = image.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let p = image.get_pixel(x, y).0;
        let s = smoothed.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| blend(s[c], p[c], factor)))
    })
}

/// Mean luminance over all pixels, rounded to the nearest integer.
///
/// An empty image has mean 0.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn mean_luminance(image: &RgbImage) -> u8 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0;
    }
    let total: u64 = image
        .pixels()
        .map(|p| u64::from(luma(p.0[0], p.0[1], p.0[2])))
        .sum();
    let mean = total as f64 / count as f64;
    (mean + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Apply the 3×3 smoothing kernel to interior pixels.
///
/// The outermost row and column on each side are copied unchanged, so an
/// image narrower or shorter than three pixels comes back as-is.
#[allow(clippy::cast_possible_truncation)]
fn smooth(image: &RgbImage) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut out = image.clone();
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut acc = [0u32; 3];
            for (k, weight) in SMOOTH_KERNEL.iter().enumerate() {
                let (dx, dy) = ((k % 3) as u32, (k / 3) as u32);
                let p = image.get_pixel(x + dx - 1, y + dy - 1).0;
                for c in 0..3 {
                    acc[c] += weight * u32::from(p[c]);
                }
            }
            let rounded = acc.map(|v| ((v + SMOOTH_SCALE / 2) / SMOOTH_SCALE).min(255) as u8);
            out.put_pixel(x, y, Rgb(rounded));
        }
    }
    out
}

/// `degenerate + factor * (value - degenerate)`, clipped and truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(degenerate: u8, value: u8, factor: f32) -> u8 {
    let d = f32::from(degenerate);
    let v = factor.mul_add(f32::from(value) - d, d);
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v as u8
    }
}

#[allow(clippy::float_cmp)]
fn is_neutral(factor: f32) -> bool {
    factor == EnhanceParams::NEUTRAL
}
