//! Brush width and color controls for the mask drawing surface.

use dioxus::prelude::*;
use restora_pipeline::{BrushSettings, StrokeColor};

use super::slider::render_slider;

/// Props for the [`BrushControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct BrushControlsProps {
    /// Current brush (read-only).
    brush: BrushSettings,
    /// Callback fired when the width or color changes.
    on_change: EventHandler<BrushSettings>,
}

/// Stroke width slider and color picker.
///
/// Warns when the chosen color is pure black, since black strokes leave
/// the mask empty.
#[component]
pub fn BrushControls(props: BrushControlsProps) -> Element {
    let brush = props.brush;
    let on_change = props.on_change;
    let (min_width, max_width) = BrushSettings::STROKE_WIDTH_RANGE;
    let color_hex = brush.stroke_color.to_hex();
    let invisible = brush.stroke_color.luminance() == 0;

    rsx! {
        div { class: "panel",
            h3 { class: "panel-title", "Brush" }
            {render_slider(
                "stroke_width",
                "Stroke Width",
                "Brush diameter in image pixels.",
                f64::from(brush.stroke_width),
                (f64::from(min_width), f64::from(max_width)),
                1.0,
                0,
                move |v: f64| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let width = v.round() as u32;
                    on_change.call(BrushSettings { stroke_width: width, ..brush }.clamped());
                },
            )}
            div { class: "control",
                div { class: "control-header",
                    label { r#for: "stroke_color", class: "control-label", "Stroke Color" }
                    span { class: "control-value", "{color_hex}" }
                }
                input {
                    r#type: "color",
                    id: "stroke_color",
                    value: "{color_hex}",
                    oninput: move |e| {
                        match StrokeColor::from_hex(&e.value()) {
                            Ok(stroke_color) => on_change.call(BrushSettings { stroke_color, ..brush }),
                            Err(err) => tracing::warn!(error = %err, "color picker parse failure"),
                        }
                    },
                }
            }
            if invisible {
                p { class: "text-warning text-sm",
                    "Black strokes do not mark anything for restoration."
                }
            }
        }
    }
}
