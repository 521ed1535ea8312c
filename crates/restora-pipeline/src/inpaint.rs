//! Fast-marching inpainting (Telea, 2004).
//!
//! Masked pixels are filled in order of their distance from the mask
//! boundary, so the fill advances inward like a front. Each pixel the
//! front reaches becomes a weighted average of the already-known pixels
//! within `radius`, each extrapolated to the target along its local
//! intensity gradient. A neighbor's weight grows when it is close, when it
//! lies along the direction the front is moving, and when it sits on
//! nearly the same distance level as the target.
//!
//! Before filling, a second march runs outward from the boundary over the
//! known pixels within `radius`, giving them negative arrival times so the
//! level-set weight is meaningful on both sides of the boundary.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use image::{GrayImage, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

use crate::binarize::BinaryMask;
use crate::types::{Dimensions, InpaintConfig, InpaintMethod, PipelineError};

/// Largest neighborhood radius honored; larger values are clamped.
pub const MAX_RADIUS: u32 = 100;

/// Arrival time of pixels the front has not reached.
const FAR: f32 = 1.0e6;

/// Restore every painted pixel of `mask` from its surroundings.
///
/// Unpainted pixels are copied through bit-for-bit. A radius of `0` is
/// treated as `1`.
///
/// An empty mask returns the image unchanged, and so does a mask that
/// covers the whole image since there is nothing known to fill from.
///
/// # Errors
///
/// Returns [`PipelineError::DimensionMismatch`] if the mask and image
/// sizes differ.
pub fn inpaint(
    image: &RgbImage,
    mask: &BinaryMask,
    config: &InpaintConfig,
) -> Result<RgbImage, PipelineError> {
    let image_dims = Dimensions::of(image);
    let mask_dims = mask.dimensions();
    if image_dims != mask_dims {
        return Err(PipelineError::DimensionMismatch {
            image: image_dims,
            mask: mask_dims,
        });
    }

    let painted = mask.painted_count();
    if painted == 0 || painted == image_dims.area() {
        tracing::debug!(painted, dimensions = %image_dims, "nothing to inpaint");
        return Ok(image.clone());
    }

    let radius = config.radius.clamp(1, MAX_RADIUS);
    let restored = match config.method {
        InpaintMethod::Telea => telea(image, mask.as_gray(), radius),
    };
    tracing::debug!(
        painted,
        radius,
        method = ?config.method,
        dimensions = %image_dims,
        "inpainted masked region"
    );
    Ok(restored)
}

fn telea(image: &RgbImage, mask: &GrayImage, radius: u32) -> RgbImage {
    let reach = u8::try_from(radius).unwrap_or(u8::MAX);
    // Known pixels 4-adjacent to the mask.
    let cross = dilate(mask, Norm::L1, 1);
    // Known pixels within `radius` (chessboard) of the mask.
    let square = dilate(mask, Norm::LInf, reach);

    let mut grid = Grid::new(image.width() as usize, image.height() as usize);
    let mut band = Vec::new();
    let mut ring = Vec::new();
    for (i, ((&m, &c), &s)) in mask
        .as_raw()
        .iter()
        .zip(cross.as_raw())
        .zip(square.as_raw())
        .enumerate()
    {
        if m != 0 {
            continue;
        }
        if c != 0 {
            band.push(i);
        } else if s != 0 {
            ring.push(i);
        }
    }

    // Outward march over the ring to get distances on the known side.
    for &i in &ring {
        grid.flags[i] = Flag::Inside;
    }
    let mut frontier = Frontier::default();
    for &i in &band {
        grid.flags[i] = Flag::Band;
        grid.times[i] = 0.0;
        frontier.push(i, 0.0);
    }
    grid.march(&mut frontier, |_, _| {});
    for &i in &ring {
        if grid.flags[i] == Flag::Inside {
            // Not reachable from the boundary through the ring.
            grid.flags[i] = Flag::Known;
        } else {
            grid.times[i] = -grid.times[i];
        }
    }

    // Inward march over the mask, filling as the front arrives.
    for (i, &m) in mask.as_raw().iter().enumerate() {
        if m != 0 {
            grid.flags[i] = Flag::Inside;
            grid.times[i] = FAR;
        }
    }
    for &i in &band {
        grid.flags[i] = Flag::Band;
        grid.times[i] = 0.0;
        frontier.push(i, 0.0);
    }

    let mut out = image.clone();
    grid.march(&mut frontier, |grid, p| fill(grid, &mut out, p, radius));
    out
}

/// Compute and write the restored value of pixel `p`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn fill(grid: &Grid, out: &mut RgbImage, p: usize, radius: u32) {
    let reach = radius as isize;
    let time_grad = grid.time_gradient(p);
    let tp = grid.times[p];

    let mut total = 0.0f32;
    let mut acc = [0.0f32; 3];
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if dx * dx + dy * dy > reach * reach {
                continue;
            }
            let Some(k) = grid.offset(p, dx, dy) else {
                continue;
            };
            if grid.flags[k] == Flag::Inside {
                continue;
            }

            // Vector from the neighbor to the target.
            let (rx, ry) = (-dx as f32, -dy as f32);
            let len_sq = rx.mul_add(rx, ry * ry);
            let dst = len_sq.recip();
            let lev = (1.0 + (grid.times[k] - tp).abs()).recip();
            let mut dir = rx.mul_add(time_grad[0], ry * time_grad[1]) / len_sq.sqrt();
            if dir.abs() <= 0.01 {
                dir = 1.0e-6;
            }
            let weight = (dst * lev * dir).abs();

            let (kx, ky) = grid.coords(k);
            let value = out.get_pixel(kx as u32, ky as u32).0;
            let grads = grid.intensity_gradient(out, k);
            for c in 0..3 {
                let [gx, gy] = grads[c];
                let extrapolated = gx.mul_add(rx, gy.mul_add(ry, f32::from(value[c])));
                acc[c] = weight.mul_add(extrapolated, acc[c]);
            }
            total += weight;
        }
    }

    if total <= 0.0 {
        return;
    }
    let (px, py) = grid.coords(p);
    let filled = acc.map(|a| (a / total).round().clamp(0.0, 255.0) as u8);
    out.put_pixel(px as u32, py as u32, Rgb(filled));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    /// Original or already filled; arrival time final.
    Known,
    /// Reached by the front, waiting in the frontier.
    Band,
    /// Not reached yet.
    Inside,
}

/// Per-pixel state of the march.
struct Grid {
    width: usize,
    height: usize,
    flags: Vec<Flag>,
    times: Vec<f32>,
}

impl Grid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            flags: vec![Flag::Known; width * height],
            times: vec![FAR; width * height],
        }
    }

    const fn coords(&self, i: usize) -> (usize, usize) {
        (i % self.width, i / self.width)
    }

    /// Index of the pixel `(dx, dy)` away from `i`, if it is on the grid.
    fn offset(&self, i: usize, dx: isize, dy: isize) -> Option<usize> {
        let (x, y) = self.coords(i);
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then(|| ny * self.width + nx)
    }

    /// Index of `(dx, dy)` from `i` if that pixel has a usable value.
    fn settled(&self, i: usize, dx: isize, dy: isize) -> Option<usize> {
        self.offset(i, dx, dy)
            .filter(|&n| self.flags[n] != Flag::Inside)
    }

    /// Pop pixels in arrival order, reaching their unreached neighbors.
    fn march(&mut self, frontier: &mut Frontier, mut on_reach: impl FnMut(&Self, usize)) {
        while let Some(i) = frontier.pop() {
            self.flags[i] = Flag::Known;
            for (dx, dy) in [(0, -1), (-1, 0), (0, 1), (1, 0)] {
                let Some(n) = self.offset(i, dx, dy) else {
                    continue;
                };
                if self.flags[n] != Flag::Inside {
                    continue;
                }
                let t = self.arrival(n);
                self.times[n] = t;
                on_reach(&*self, n);
                self.flags[n] = Flag::Band;
                frontier.push(n, t);
            }
        }
    }

    /// Arrival time at `i` from the eikonal update over each quadrant.
    fn arrival(&self, i: usize) -> f32 {
        [(-1, -1), (1, -1), (-1, 1), (1, 1)]
            .into_iter()
            .map(|(sx, sy)| self.solve(self.settled(i, 0, sy), self.settled(i, sx, 0)))
            .fold(FAR, f32::min)
    }

    fn solve(&self, a: Option<usize>, b: Option<usize>) -> f32 {
        match (a.map(|i| self.times[i]), b.map(|i| self.times[i])) {
            (Some(ta), Some(tb)) => {
                let diff = ta - tb;
                if diff.abs() >= 1.0 {
                    1.0 + ta.min(tb)
                } else {
                    (ta + tb + diff.mul_add(-diff, 2.0).sqrt()) * 0.5
                }
            }
            (Some(t), None) | (None, Some(t)) => 1.0 + t,
            (None, None) => FAR,
        }
    }

    /// Gradient of arrival time at `i` over settled neighbors.
    fn time_gradient(&self, i: usize) -> [f32; 2] {
        let axis = |dx: isize, dy: isize| {
            let before = self.settled(i, -dx, -dy).map(|n| self.times[n]);
            let after = self.settled(i, dx, dy).map(|n| self.times[n]);
            central_difference(before, self.times[i], after)
        };
        [axis(1, 0), axis(0, 1)]
    }

    /// Per-channel intensity gradient at `i` over settled neighbors.
    #[allow(clippy::cast_possible_truncation)]
    fn intensity_gradient(&self, image: &RgbImage, i: usize) -> [[f32; 2]; 3] {
        let sample = |n: usize| {
            let (x, y) = self.coords(n);
            image.get_pixel(x as u32, y as u32).0.map(f32::from)
        };
        let here = sample(i);
        let axis = |dx: isize, dy: isize| {
            let before = self.settled(i, -dx, -dy).map(sample);
            let after = self.settled(i, dx, dy).map(sample);
            std::array::from_fn::<f32, 3, _>(|c| {
                central_difference(before.map(|v| v[c]), here[c], after.map(|v| v[c]))
            })
        };
        let gx = axis(1, 0);
        let gy = axis(0, 1);
        std::array::from_fn(|c| [gx[c], gy[c]])
    }
}

/// Central difference where both sides exist, one-sided otherwise.
fn central_difference(before: Option<f32>, here: f32, after: Option<f32>) -> f32 {
    match (before, after) {
        (Some(b), Some(a)) => (a - b) * 0.5,
        (None, Some(a)) => a - here,
        (Some(b), None) => here - b,
        (None, None) => 0.0,
    }
}

/// Min-heap of pixels keyed on arrival time, ties broken by insertion order.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    fn push(&mut self, index: usize, time: f32) {
        self.heap.push(Entry {
            time,
            seq: self.next_seq,
            index,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.index)
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    time: f32,
    seq: u64,
    index: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::binarize::binarize_luma;
    use image::Luma;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> BinaryMask {
        binarize_luma(&GrayImage::from_fn(w, h, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        }))
    }

    fn noisy_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x * 37 + y * 91 + x * y * 13) % 256) as u8;
            Rgb([v, v.wrapping_add(40), 255 - v])
        })
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let image = RgbImage::new(10, 10);
        let mask = rect_mask(10, 9, 2, 2, 4, 4);
        let err = inpaint(&image, &mask, &InpaintConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DimensionMismatch { image, mask }
                if image == Dimensions::new(10, 10) && mask == Dimensions::new(10, 9)
        ));
    }

    #[test]
    fn empty_mask_is_identity() {
        let image = noisy_image(20, 15);
        let mask = binarize_luma(&GrayImage::new(20, 15));
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn full_mask_leaves_image_unchanged() {
        let image = noisy_image(8, 8);
        let mask = rect_mask(8, 8, 0, 0, 8, 8);
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn uniform_gray_fills_with_gray() {
        let image = RgbImage::from_pixel(100, 100, Rgb([128, 128, 128]));
        let mask = rect_mask(100, 100, 45, 45, 55, 55);
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();

        for (x, y, p) in out.enumerate_pixels() {
            if mask.is_painted(x, y) {
                for c in p.0 {
                    assert!(c.abs_diff(128) <= 2, "({x}, {y}) = {c}");
                }
            } else {
                assert_eq!(p, image.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn damage_under_mask_is_replaced() {
        let mut image = RgbImage::from_pixel(40, 40, Rgb([90, 90, 90]));
        for x in 10..30 {
            for y in 19..21 {
                image.put_pixel(x, y, Rgb([255, 0, 0]));
            }
        }
        let mask = rect_mask(40, 40, 9, 18, 31, 22);
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
        for x in 9..31 {
            for y in 18..22 {
                let p = out.get_pixel(x, y).0;
                assert!(p.iter().all(|c| c.abs_diff(90) <= 2), "({x}, {y}) = {p:?}");
            }
        }
    }

    #[test]
    fn unmasked_pixels_pass_through_exactly() {
        let image = noisy_image(32, 24);
        // Irregular mask: two blobs and a thin diagonal.
        let mask = binarize_luma(&GrayImage::from_fn(32, 24, |x, y| {
            let blob = (x.abs_diff(8) + y.abs_diff(8)) < 4 || (x > 20 && x < 27 && y > 14);
            let line = x == y + 3;
            Luma([if blob || line { 200 } else { 0 }])
        }));
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
        for (x, y, p) in out.enumerate_pixels() {
            if !mask.is_painted(x, y) {
                assert_eq!(p, image.get_pixel(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn linear_ramp_is_continued() {
        #[allow(clippy::cast_possible_truncation)]
        let image = RgbImage::from_fn(100, 30, |x, _| {
            let v = (x * 2) as u8;
            Rgb([v, v, v])
        });
        let mask = rect_mask(100, 30, 45, 5, 53, 25);
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
        for x in 45..53 {
            for y in 5..25 {
                let got = out.get_pixel(x, y).0[0];
                #[allow(clippy::cast_possible_truncation)]
                let expected = (x * 2) as u8;
                assert!(got.abs_diff(expected) <= 4, "({x}, {y}): {got} vs {expected}");
            }
        }
    }

    #[test]
    fn mask_touching_border_is_filled() {
        let image = RgbImage::from_pixel(20, 20, Rgb([10, 200, 60]));
        let mask = rect_mask(20, 20, 0, 0, 5, 20);
        let out = inpaint(&image, &mask, &InpaintConfig::default()).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [10, 200, 60]);
        assert_eq!(out.get_pixel(4, 19).0, [10, 200, 60]);
    }

    #[test]
    fn zero_and_huge_radius_are_clamped() {
        let image = RgbImage::from_pixel(30, 30, Rgb([50, 60, 70]));
        let mask = rect_mask(30, 30, 10, 10, 20, 20);
        for radius in [0, 1, 500] {
            let config = InpaintConfig {
                radius,
                ..InpaintConfig::default()
            };
            let out = inpaint(&image, &mask, &config).unwrap();
            assert_eq!(out.get_pixel(15, 15).0, [50, 60, 70], "radius {radius}");
        }
    }

    #[test]
    fn frontier_pops_in_time_then_insertion_order() {
        let mut f = Frontier::default();
        f.push(7, 2.0);
        f.push(3, 0.5);
        f.push(9, 0.5);
        f.push(1, -1.0);
        assert_eq!(f.pop(), Some(1));
        assert_eq!(f.pop(), Some(3));
        assert_eq!(f.pop(), Some(9));
        assert_eq!(f.pop(), Some(7));
        assert_eq!(f.pop(), None);
    }
}
