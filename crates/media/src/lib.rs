//! Photo-directive protocol: the inline tag a backend emits to request an
//! illustrative image, and the rewrite into a renderable link.

pub mod directive;
pub mod image_url;

pub use {
    directive::{VisualDirective, extract, render},
    image_url::ImageUrlBuilder,
};
