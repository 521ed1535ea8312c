//! Mask binarization: painted overlay in, strict two-level mask out.
//!
//! The drawing surface yields an RGBA overlay that is transparent black
//! wherever nothing was painted. Reducing it to luminance and keeping
//! every non-zero pixel gives a mask where `255` marks damage and `0`
//! marks pixels to keep.

use image::{GrayImage, Luma, RgbaImage};

use crate::types::Dimensions;

/// Value marking a painted (to-be-filled) mask pixel.
pub const PAINTED: u8 = 255;

/// Value marking an untouched mask pixel.
pub const UNPAINTED: u8 = 0;

/// A single-channel mask whose every pixel is `0` or `255`.
///
/// Only constructed through [`binarize`] or [`binarize_luma`], so the
/// two-level invariant always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask(GrayImage);

impl BinaryMask {
    /// Mask dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.0)
    }

    /// Whether the pixel at `(x, y)` is painted.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the mask (same contract as
    /// [`GrayImage::get_pixel`]).
    #[must_use]
    pub fn is_painted(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] == PAINTED
    }

    /// Number of painted pixels.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.0.as_raw().iter().filter(|&&v| v == PAINTED).count()
    }

    /// Returns `true` if no pixel is painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_raw().iter().all(|&v| v == UNPAINTED)
    }

    /// Borrow the underlying grayscale raster.
    #[must_use]
    pub const fn as_gray(&self) -> &GrayImage {
        &self.0
    }

    /// Consume the mask and return the underlying raster.
    #[must_use]
    pub fn into_gray(self) -> GrayImage {
        self.0
    }
}

/// Rounded ITU-R 601 luminance (`0.299 R + 0.587 G + 0.114 B`) in
/// 14-bit fixed point.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;
    let sum = u32::from(r) * R + u32::from(g) * G + u32::from(b) * B + (1 << (SHIFT - 1));
    (sum >> SHIFT) as u8
}

/// Reduce an RGBA overlay to luminance, ignoring alpha.
#[must_use = "returns the luminance image"]
pub fn overlay_luminance(overlay: &RgbaImage) -> GrayImage {
    let (w, h) = overlay.dimensions();
    GrayImage::from_fn(w, h, |x, y| {
        let [r, g, b, _] = overlay.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

/// Threshold a grayscale image: any value above zero becomes [`PAINTED`].
#[must_use = "returns the binary mask"]
pub fn binarize_luma(gray: &GrayImage) -> BinaryMask {
    let (w, h) = gray.dimensions();
    let raw = gray
        .as_raw()
        .iter()
        .map(|&v| if v > 0 { PAINTED } else { UNPAINTED })
        .collect();
    // Same length as the input buffer, so construction cannot fail.
    BinaryMask(GrayImage::from_raw(w, h, raw).unwrap_or_else(|| GrayImage::new(w, h)))
}

/// Convert a painted RGBA overlay into a [`BinaryMask`] of the same size.
#[must_use = "returns the binary mask"]
pub fn binarize(overlay: &RgbaImage) -> BinaryMask {
    let mask = binarize_luma(&overlay_luminance(overlay));
    tracing::debug!(
        dimensions = %mask.dimensions(),
        painted = mask.painted_count(),
        "binarized mask overlay"
    );
    mask
}
