//! Image references resolved against the content tree's image tables.

use serde_json::Value;

use super::content::ContentConfig;
use super::entities::ImageRef;

/// Image table areas under `images.<area>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageArea {
    Hero,
    Doctors,
    Blog,
}

impl ImageArea {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageArea::Hero => "hero",
            ImageArea::Doctors => "doctors",
            ImageArea::Blog => "blog",
        }
    }
}

/// Resolve an image field to a source string. Direct strings pass through,
/// indices look up `images.<area>[n]`, anything else yields an empty string.
pub fn resolve_image(config: &ContentConfig, area: ImageArea, image: &ImageRef) -> String {
    match image {
        ImageRef::Source(source) => source.clone(),
        ImageRef::Index(index) => config
            .get(&format!("images.{}[{index}]", area.as_str()))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        ImageRef::Other(_) => String::new(),
    }
}
