//! Labeled range slider shared by the control panels.

use dioxus::prelude::*;

/// Render a labeled range slider with an optional description.
///
/// `on_input` receives the parsed slider value on every change.
#[allow(clippy::too_many_arguments)]
pub(crate) fn render_slider(
    id: &str,
    label: &str,
    description: &str,
    value: f64,
    (min, max): (f64, f64),
    step: f64,
    decimals: usize,
    on_input: impl Fn(f64) + 'static,
) -> Element {
    let display = format!("{value:.decimals$}");
    let id = id.to_string();
    let label = label.to_string();
    let description = description.to_string();

    rsx! {
        div { class: "control",
            div { class: "control-header",
                label { r#for: "{id}", class: "control-label", "{label}" }
                span { class: "control-value", "{display}" }
            }
            if !description.is_empty() {
                p { class: "control-description", "{description}" }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                class: "slider",
                oninput: move |e| {
                    match e.value().parse::<f64>() {
                        Ok(v) => on_input(v),
                        Err(err) => {
                            tracing::warn!(error = ?err, value = %e.value(), "slider parse failure");
                        }
                    }
                },
            }
        }
    }
}
