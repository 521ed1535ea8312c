use std::rc::Rc;

use dioxus::prelude::*;
use restora_io::{BrushControls, ComparisonView, EnhanceControls, ExportPanel, FileUpload, MaskCanvas};
use restora_pipeline::{
    BrushSettings, EnhanceParams, InpaintConfig, PipelineError, Restoration, RgbImage, Stroke,
};

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// Holds the session state in signals and gives every user action its own
/// handler: upload, parameter change, brush change, drawing, restore.
/// Anything that changes the inputs drops the displayed restoration, so
/// the result on screen always matches the controls.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut source = use_signal(|| Option::<Rc<RgbImage>>::None);
    let mut params = use_signal(EnhanceParams::default);
    let mut brush = use_signal(BrushSettings::default);
    let mut strokes = use_signal(Vec::<Stroke>::new);
    let mut restoration = use_signal(|| Option::<Rc<Restoration>>::None);
    let mut restoring = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut generation = use_signal(|| 0u64);

    // Enhancement is cheap enough to recompute on every slider tick.
    let enhanced = use_memo(move || {
        source().map(|img| Rc::new(restora_pipeline::enhance(&img, &params())))
    });

    // Drop any displayed or in-flight restoration.
    let mut invalidate = move || {
        generation += 1;
        restoration.set(None);
        restoring.set(false);
    };

    // --- Upload handler ---
    let on_upload = move |(bytes, name): (Vec<u8>, String)| {
        invalidate();
        strokes.set(Vec::new());
        match restora_pipeline::decode_upload(&bytes) {
            Ok(img) => {
                tracing::info!(file = %name, width = img.width(), height = img.height(), "image uploaded");
                source.set(Some(Rc::new(img)));
                error.set(None);
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "upload rejected");
                source.set(None);
                error.set(Some(describe(&e)));
            }
        }
    };

    // --- Parameter handlers ---
    let on_params_change = move |p: EnhanceParams| {
        invalidate();
        params.set(p.clamped());
    };

    let on_brush_change = move |b: BrushSettings| {
        invalidate();
        brush.set(b.clamped());
    };

    let on_strokes_change = move |s: Vec<Stroke>| {
        invalidate();
        error.set(None);
        strokes.set(s);
    };

    // --- Restore handler ---
    // Spawns an async task so the "Restoring..." indicator renders before
    // the inpainting work blocks the thread.
    let on_restore = move |_| {
        let Some(image) = enhanced() else {
            return;
        };
        let current = strokes();

        // Increment generation so any in-flight task from a prior
        // trigger knows it is stale and should discard its result.
        generation += 1;
        let my_generation = *generation.peek();

        restoring.set(true);
        error.set(None);

        spawn(async move {
            // Yield to the browser event loop so it can paint the
            // "Restoring..." state before we block on the pipeline.
            gloo_timers::future::TimeoutFuture::new(0).await;

            let outcome =
                restora_pipeline::restore_strokes(&image, &current, &InpaintConfig::default());

            if *generation.peek() != my_generation {
                return;
            }

            match outcome {
                Ok(r) => {
                    tracing::info!(
                        strokes = current.len(),
                        painted = r.mask.painted_count(),
                        "restoration complete"
                    );
                    restoration.set(Some(Rc::new(r)));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "restoration failed");
                    error.set(Some(describe(&e)));
                }
            }

            restoring.set(false);
        });
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/restora.css") }

        div { class: "app",
            header { class: "app-header",
                h1 { class: "app-title", "restora" }
                p { class: "text-muted",
                    "Upload a damaged photo, paint over the damage, and restore it."
                }
            }

            div { class: "app-body",
                // Sidebar: upload and parameter controls
                aside { class: "sidebar",
                    FileUpload { on_upload: on_upload }
                    if source().is_some() {
                        EnhanceControls {
                            params: params(),
                            on_change: on_params_change,
                        }
                        BrushControls {
                            brush: brush(),
                            on_change: on_brush_change,
                        }
                    }
                }

                // Main column: drawing surface, restore action, result
                main { class: "main",
                    if let Some(img) = enhanced() {
                        MaskCanvas {
                            image: img,
                            strokes: strokes(),
                            brush: brush(),
                            on_strokes_change: on_strokes_change,
                        }

                        div { class: "actions",
                            button {
                                class: "btn btn-primary",
                                disabled: restoring(),
                                onclick: on_restore,
                                "Restore Image"
                            }
                            if restoring() {
                                span { class: "text-secondary pulse", "Restoring..." }
                            }
                        }
                    } else {
                        div { class: "placeholder",
                            p { "Upload an image to get started" }
                        }
                    }

                    if let Some(ref err) = error() {
                        div { class: "error-box",
                            p { class: "text-error text-sm", "{err}" }
                        }
                    }

                    if let Some(r) = restoration() {
                        ComparisonView { restoration: Rc::clone(&r) }
                    }

                    ExportPanel { restoration: restoration() }
                }
            }
        }
    }
}

/// User-facing message for a pipeline error.
fn describe(e: &PipelineError) -> String {
    match e {
        _ if e.is_invalid_upload() => format!("Invalid upload: {e}"),
        PipelineError::DimensionMismatch { .. } => format!("Mask does not match the image: {e}"),
        _ => e.to_string(),
    }
}
