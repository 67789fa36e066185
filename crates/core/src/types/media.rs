//! Media and select-field values shared by several content types.

use serde::{Deserialize, Serialize};

/// An uploaded image.
///
/// `imgix_url` is the resizable variant; it accepts imgix query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Original file URL.
    #[serde(default)]
    pub url: String,
    /// imgix-backed URL for resized renditions.
    #[serde(default)]
    pub imgix_url: String,
}

impl ImageAsset {
    /// URL of a center-cropped rendition of the given size.
    #[must_use]
    pub fn cropped(&self, width: u32, height: u32) -> String {
        if self.imgix_url.is_empty() {
            return self.url.clone();
        }
        format!(
            "{}?w={width}&h={height}&fit=crop&auto=format,compress",
            self.imgix_url
        )
    }
}

/// A select-dropdown value: a stable `key` and its display `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}
