//! Export panel with the download button.

use std::rc::Rc;

use dioxus::prelude::*;
use restora_pipeline::Restoration;

use crate::download;

/// Props for the [`ExportPanel`] component.
#[derive(Props, Clone)]
pub struct ExportPanelProps {
    /// The restoration to export. `None` disables the button.
    restoration: Option<Rc<Restoration>>,
}

impl PartialEq for ExportPanelProps {
    fn eq(&self, other: &Self) -> bool {
        match (&self.restoration, &other.restoration) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Offers the restored image as a lossless PNG download.
#[component]
pub fn ExportPanel(props: ExportPanelProps) -> Element {
    let has_result = props.restoration.is_some();
    let filename = restora_export::RESTORED_FILENAME;
    let mut export_error = use_signal(|| Option::<String>::None);

    // Clear stale export errors when the restoration changes.
    let result_present = props.restoration.is_some();
    use_effect(move || {
        let _ = result_present;
        export_error.set(None);
    });

    let download_click = {
        let restoration = props.restoration.clone();
        move |_| {
            if let Some(ref r) = restoration {
                if let Err(e) = download::download_restored(&r.restored) {
                    tracing::error!(error = %e, "download failed");
                    export_error.set(Some(format!("Download failed: {e}")));
                } else {
                    export_error.set(None);
                }
            }
        }
    };

    rsx! {
        div { class: "panel",
            h3 { class: "panel-title", "Export" }

            if let Some(ref err) = export_error() {
                p { class: "text-error text-sm", "{err}" }
            }

            button {
                class: if has_result { "btn btn-primary" } else { "btn btn-disabled" },
                disabled: !has_result,
                onclick: download_click,
                "Download Restored Image"
            }
            p { class: "text-muted text-sm", "{filename}" }
        }
    }
}
