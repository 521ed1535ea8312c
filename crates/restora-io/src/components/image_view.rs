//! Raster `<img>` backed by a short-lived Blob URL.

use std::rc::Rc;

use dioxus::prelude::*;
use restora_pipeline::RgbImage;

use crate::raster;

/// Props for the [`ImageView`] component.
#[derive(Props, Clone)]
pub struct ImageViewProps {
    /// Image to display.
    image: Rc<RgbImage>,
    /// Alternate text.
    alt: String,
    /// Extra CSS classes for the `<img>`.
    #[props(default)]
    class: String,
}

impl PartialEq for ImageViewProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.image, &other.image) && self.alt == other.alt && self.class == other.class
    }
}

/// Displays an `RgbImage` at its natural size.
///
/// The image is PNG-encoded into a Blob URL on each render. The URL is
/// revoked once the browser has loaded it, and on re-render or unmount if
/// the load never finished.
#[component]
pub fn ImageView(props: ImageViewProps) -> Element {
    let mut prev_blob_url: Signal<Option<String>> = use_signal(|| None);

    {
        let prev_blob_url = prev_blob_url;
        use_drop(move || {
            if let Some(ref url) = *prev_blob_url.peek() {
                raster::revoke_blob_url(url);
            }
        });
    }

    if let Some(ref prev) = prev_blob_url.take() {
        raster::revoke_blob_url(prev);
    }

    let (w, h) = props.image.dimensions();
    let class = props.class.clone();
    let alt = props.alt.clone();
    match raster::rgb_image_to_blob_url(&props.image) {
        Ok(url) => {
            prev_blob_url.set(Some(url.clone()));
            let url_for_error = url.clone();
            rsx! {
                img {
                    src: "{url}",
                    width: "{w}",
                    height: "{h}",
                    class: "{class}",
                    alt: "{alt}",
                    draggable: "false",
                    onload: move |_| raster::revoke_blob_url(&url),
                    onerror: move |_| raster::revoke_blob_url(&url_for_error),
                }
            }
        }
        Err(e) => rsx! {
            p { class: "text-error text-sm", "Failed to render {alt}: {e}" }
        },
    }
}
