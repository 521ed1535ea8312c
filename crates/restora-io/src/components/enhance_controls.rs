//! Brightness, contrast, and sharpness sliders.

use dioxus::prelude::*;
use restora_pipeline::EnhanceParams;

use super::slider::render_slider;

/// Props for the [`EnhanceControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct EnhanceControlsProps {
    /// Current enhancement factors (read-only).
    params: EnhanceParams,
    /// Callback fired when any factor changes.
    on_change: EventHandler<EnhanceParams>,
}

/// Three sliders, one per enhancement factor, each starting at `1.0`.
#[component]
pub fn EnhanceControls(props: EnhanceControlsProps) -> Element {
    let params = props.params;
    let on_change = props.on_change;

    // Slider values arrive as f64; factors are f32.
    #[allow(clippy::cast_possible_truncation)]
    let update = move |edit: fn(&mut EnhanceParams, f32)| {
        move |v: f64| {
            let mut p = params;
            edit(&mut p, v as f32);
            on_change.call(p.clamped());
        }
    };

    rsx! {
        div { class: "panel",
            h3 { class: "panel-title", "Enhancement" }
            {render_slider(
                "brightness",
                "Brightness",
                "Scales every channel. 1.0 leaves the image unchanged.",
                f64::from(params.brightness),
                range(EnhanceParams::BRIGHTNESS_RANGE),
                0.01,
                2,
                update(|p, v| p.brightness = v),
            )}
            {render_slider(
                "contrast",
                "Contrast",
                "Spreads or flattens tones around the mean gray.",
                f64::from(params.contrast),
                range(EnhanceParams::CONTRAST_RANGE),
                0.01,
                2,
                update(|p, v| p.contrast = v),
            )}
            {render_slider(
                "sharpness",
                "Sharpness",
                "Below 1.0 softens, above 1.0 sharpens edges.",
                f64::from(params.sharpness),
                range(EnhanceParams::SHARPNESS_RANGE),
                0.01,
                2,
                update(|p, v| p.sharpness = v),
            )}
        }
    }
}

fn range((min, max): (f32, f32)) -> (f64, f64) {
    (f64::from(min), f64::from(max))
}
