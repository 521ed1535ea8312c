//! Mask overlay rasterization.
//!
//! The drawing surface records freehand strokes as point lists. This
//! module renders them, anti-aliased with round caps and joins, onto a
//! transparent RGBA canvas the size of the source image. The result is
//! the same buffer a browser canvas would hand back, ready for
//! [`binarize`](crate::binarize::binarize).

use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use crate::types::{Dimensions, Point, Stroke};

/// Render strokes onto a transparent overlay of the given size.
///
/// Strokes are painted in order, later strokes on top. Points outside the
/// canvas are clipped. A stroke with a single distinct point renders as a
/// filled dot with the stroke's diameter, matching what a click without
/// dragging leaves on a canvas.
///
/// Returns a fully transparent overlay when `strokes` is empty or either
/// dimension is zero.
#[must_use = "returns the rendered overlay"]
pub fn rasterize(strokes: &[Stroke], dimensions: Dimensions) -> RgbaImage {
    let Dimensions { width, height } = dimensions;
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        // Zero-sized canvas.
        return RgbaImage::new(width, height);
    };

    for stroke in strokes {
        paint_stroke(&mut pixmap, stroke);
    }

    let overlay = pixmap_to_rgba(&pixmap);
    tracing::debug!(
        strokes = strokes.len(),
        dimensions = %dimensions,
        "rasterized mask overlay"
    );
    overlay
}

/// Paint a single stroke into the pixmap.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn paint_stroke(pixmap: &mut Pixmap, stroke: &Stroke) {
    let points = distinct_points(&stroke.points);
    let Some(first) = points.first() else {
        return;
    };

    let [r, g, b] = stroke.color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;

    let width = stroke.width.max(1) as f32;

    if points.len() == 1 {
        if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, width / 2.0) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in &points[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let line = tiny_skia::Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &line, Transform::identity(), None);
}

/// Drop consecutive duplicate points.
fn distinct_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_none_or(|last| *last != p) {
            out.push(p);
        }
    }
    out
}

/// Convert the pixmap (premultiplied RGBA) to an `RgbaImage` (straight RGBA).
#[allow(clippy::cast_possible_truncation)]
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, src) in img.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        let a = src[3];
        if a == 0 {
            continue;
        }
        let unmultiply = |c: u8| (u16::from(c) * 255 / u16::from(a)).min(255) as u8;
        *pixel = Rgba([unmultiply(src[0]), unmultiply(src[1]), unmultiply(src[2]), a]);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BrushSettings, StrokeColor};

    fn brush(width: u32, color: [u8; 3]) -> BrushSettings {
        BrushSettings {
            stroke_width: width,
            stroke_color: StrokeColor(color),
        }
    }

    #[test]
    fn no_strokes_gives_transparent_overlay() {
        let overlay = rasterize(&[], Dimensions::new(10, 8));
        assert_eq!(overlay.dimensions(), (10, 8));
        assert!(overlay.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn zero_sized_canvas_is_empty() {
        let stroke = Stroke::begin(Point::new(0.0, 0.0), BrushSettings::default());
        let overlay = rasterize(&[stroke], Dimensions::new(0, 5));
        assert_eq!(overlay.dimensions(), (0, 5));
    }

    #[test]
    fn horizontal_stroke_covers_its_path() {
        let stroke = Stroke::with_points(
            vec![Point::new(5.0, 10.0), Point::new(25.0, 10.0)],
            brush(6, [255, 0, 0]),
        );
        let overlay = rasterize(&[stroke], Dimensions::new(30, 20));

        // On the path: opaque red.
        assert_eq!(overlay.get_pixel(15, 10).0, [255, 0, 0, 255]);
        // Well away from the path: untouched.
        assert_eq!(overlay.get_pixel(15, 1).0, [0, 0, 0, 0]);
        assert_eq!(overlay.get_pixel(29, 19).0, [0, 0, 0, 0]);
    }

    #[test]
    fn single_point_stroke_renders_dot() {
        let stroke = Stroke::begin(Point::new(10.0, 10.0), brush(8, [255, 255, 255]));
        let overlay = rasterize(&[stroke], Dimensions::new(20, 20));
        assert_eq!(overlay.get_pixel(10, 10).0, [255, 255, 255, 255]);
        assert_eq!(overlay.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn duplicate_points_collapse_to_dot() {
        let stroke = Stroke::with_points(
            vec![Point::new(4.0, 4.0), Point::new(4.0, 4.0)],
            brush(4, [0, 255, 0]),
        );
        let overlay = rasterize(&[stroke], Dimensions::new(8, 8));
        assert_eq!(overlay.get_pixel(4, 4).0, [0, 255, 0, 255]);
    }

    #[test]
    fn later_strokes_paint_on_top() {
        let a = Stroke::begin(Point::new(5.0, 5.0), brush(6, [255, 0, 0]));
        let b = Stroke::begin(Point::new(5.0, 5.0), brush(6, [0, 0, 255]));
        let overlay = rasterize(&[a, b], Dimensions::new(10, 10));
        assert_eq!(overlay.get_pixel(5, 5).0, [0, 0, 255, 255]);
    }

    #[test]
    fn strokes_outside_canvas_are_clipped() {
        let stroke = Stroke::with_points(
            vec![Point::new(-50.0, -50.0), Point::new(-40.0, -40.0)],
            brush(3, [255, 255, 255]),
        );
        let overlay = rasterize(&[stroke], Dimensions::new(10, 10));
        assert!(overlay.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn empty_stroke_is_ignored() {
        let stroke = Stroke::with_points(Vec::new(), BrushSettings::default());
        let overlay = rasterize(&[stroke], Dimensions::new(4, 4));
        assert!(overlay.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
