//! Side-by-side display of the image before and after restoration.

use std::rc::Rc;

use dioxus::prelude::*;
use restora_pipeline::{Restoration, RgbImage};

use super::image_view::ImageView;

/// Props for the [`ComparisonView`] component.
#[derive(Props, Clone)]
pub struct ComparisonViewProps {
    /// The latest restoration result.
    restoration: Rc<Restoration>,
}

impl PartialEq for ComparisonViewProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.restoration, &other.restoration)
    }
}

/// Original (left) and restored (right) panels with captions.
#[component]
pub fn ComparisonView(props: ComparisonViewProps) -> Element {
    let original: Rc<RgbImage> = Rc::new(props.restoration.original.clone());
    let restored: Rc<RgbImage> = Rc::new(props.restoration.restored.clone());
    let painted = props.restoration.mask.painted_count();

    rsx! {
        div { class: "panel",
            h3 { class: "panel-title", "Result" }
            if painted == 0 {
                p { class: "text-warning text-sm",
                    "The mask is empty, so the image is unchanged."
                }
            }
            div { class: "comparison",
                figure { class: "comparison-panel",
                    ImageView { image: original, alt: "Original Damaged Image" }
                    figcaption { "Original Damaged Image" }
                }
                figure { class: "comparison-panel",
                    ImageView { image: restored, alt: "Restored Image" }
                    figcaption { "Restored Image" }
                }
            }
        }
    }
}
