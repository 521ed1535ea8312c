//! Freehand mask drawing surface.
//!
//! Shows the enhanced image at its natural size with the painted strokes
//! drawn over it as SVG paths. One CSS pixel is one image pixel, so
//! pointer offsets are image coordinates without any scaling.
//!
//! Strokes are kept as point lists; the pixel mask is only produced when
//! the user asks for a restoration.

use std::fmt::Write;
use std::rc::Rc;

use dioxus::html::point_interaction::InteractionElementOffset;
use dioxus::prelude::*;
use restora_pipeline::{BrushSettings, Point, RgbImage, Stroke};

use super::image_view::ImageView;

/// Props for the [`MaskCanvas`] component.
#[derive(Props, Clone)]
pub struct MaskCanvasProps {
    /// The image being painted over (after enhancement).
    image: Rc<RgbImage>,
    /// Committed strokes, oldest first.
    strokes: Vec<Stroke>,
    /// Brush used for new strokes.
    brush: BrushSettings,
    /// Called with the full stroke list whenever it changes (commit,
    /// undo, clear).
    on_strokes_change: EventHandler<Vec<Stroke>>,
}

impl PartialEq for MaskCanvasProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.image, &other.image)
            && self.strokes == other.strokes
            && self.brush == other.brush
            && self.on_strokes_change == other.on_strokes_change
    }
}

/// Drawing surface with Undo and Clear.
///
/// Pointer down starts a stroke, pointer move extends it, and pointer up
/// or leaving the surface commits it.
#[component]
pub fn MaskCanvas(props: MaskCanvasProps) -> Element {
    let mut current = use_signal(|| Option::<Stroke>::None);
    let (w, h) = props.image.dimensions();
    let brush = props.brush.clamped();
    let on_change = props.on_strokes_change;

    let commit = {
        let strokes = props.strokes.clone();
        move |_: PointerEvent| {
            if let Some(stroke) = current.take() {
                let mut next = strokes.clone();
                next.push(stroke);
                on_change.call(next);
            }
        }
    };

    let undo = {
        let strokes = props.strokes.clone();
        move |_| {
            let mut next = strokes.clone();
            next.pop();
            on_change.call(next);
        }
    };

    let has_strokes = !props.strokes.is_empty();
    let committed: Vec<(String, String, u32)> = props.strokes.iter().map(svg_stroke).collect();
    let in_progress = current().as_ref().map(svg_stroke);

    rsx! {
        div { class: "panel",
            div { class: "toolbar",
                h3 { class: "panel-title", "Mask" }
                button {
                    class: "btn btn-secondary",
                    disabled: !has_strokes,
                    onclick: undo,
                    "Undo"
                }
                button {
                    class: "btn btn-secondary",
                    disabled: !has_strokes,
                    onclick: move |_| on_change.call(Vec::new()),
                    "Clear"
                }
            }
            p { class: "control-description",
                "Paint over the damaged areas you want restored."
            }
            div { class: "canvas-scroll",
                div {
                    class: "mask-canvas",
                    style: "width: {w}px; height: {h}px;",

                    ImageView {
                        image: Rc::clone(&props.image),
                        alt: "Image to restore",
                        class: "mask-canvas-layer",
                    }

                    svg {
                        xmlns: "http://www.w3.org/2000/svg",
                        class: "mask-canvas-layer mask-canvas-strokes",
                        view_box: "0 0 {w} {h}",
                        width: "{w}",
                        height: "{h}",

                        for (i, (d, color, width)) in committed.iter().enumerate() {
                            path {
                                key: "{i}",
                                d: "{d}",
                                fill: "none",
                                stroke: "{color}",
                                stroke_width: "{width}",
                                stroke_linecap: "round",
                                stroke_linejoin: "round",
                            }
                        }
                        if let Some((d, color, width)) = in_progress {
                            path {
                                d: "{d}",
                                fill: "none",
                                stroke: "{color}",
                                stroke_width: "{width}",
                                stroke_linecap: "round",
                                stroke_linejoin: "round",
                            }
                        }
                    }

                    div {
                        class: "mask-canvas-layer mask-canvas-input",
                        onpointerdown: move |evt: PointerEvent| {
                            let p = evt.element_coordinates();
                            current.set(Some(Stroke::begin(Point::new(p.x, p.y), brush)));
                        },
                        onpointermove: move |evt: PointerEvent| {
                            let p = evt.element_coordinates();
                            if let Some(stroke) = current.write().as_mut() {
                                stroke.extend_to(Point::new(p.x, p.y));
                            }
                        },
                        onpointerup: commit.clone(),
                        onpointerleave: commit,
                    }
                }
            }
        }
    }
}

/// Path data, color, and width of a stroke for SVG display.
fn svg_stroke(stroke: &Stroke) -> (String, String, u32) {
    (stroke_path_data(stroke), stroke.color.to_hex(), stroke.width)
}

/// Build an SVG path `d` attribute for a stroke.
///
/// A single point becomes a zero-length segment, which SVG renders as a
/// dot when the line cap is round.
#[must_use]
pub fn stroke_path_data(stroke: &Stroke) -> String {
    let mut d = String::new();
    let Some(first) = stroke.points.first() else {
        return d;
    };
    let _ = write!(d, "M{:.1},{:.1}", first.x, first.y);
    if stroke.points.len() == 1 {
        let _ = write!(d, " L{:.1},{:.1}", first.x, first.y);
    }
    for p in &stroke.points[1..] {
        let _ = write!(d, " L{:.1},{:.1}", p.x, p.y);
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stroke_has_no_path() {
        let s = Stroke::with_points(Vec::new(), BrushSettings::default());
        assert_eq!(stroke_path_data(&s), "");
    }

    #[test]
    fn single_point_is_zero_length_segment() {
        let s = Stroke::begin(Point::new(3.0, 4.26), BrushSettings::default());
        assert_eq!(stroke_path_data(&s), "M3.0,4.3 L3.0,4.3");
    }

    #[test]
    fn polyline_uses_move_then_lines() {
        let s = Stroke::with_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.5, 2.0),
                Point::new(20.0, 7.74),
            ],
            BrushSettings::default(),
        );
        assert_eq!(stroke_path_data(&s), "M0.0,0.0 L10.5,2.0 L20.0,7.7");
    }
}
