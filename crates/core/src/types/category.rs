//! Category content type and its display ordering.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::id::CategoryId;
use crate::types::media::ImageAsset;

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub metadata: CategoryMetadata,
}

/// Category metafields as modeled in the CMS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryMetadata {
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_option")]
    pub category_image: Option<ImageAsset>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub featured_category: bool,
    #[serde(default, deserialize_with = "de::optional_i64")]
    pub sort_order: Option<i64>,
}

impl Category {
    /// The authoritative display name. Products reference their category by
    /// this label.
    #[must_use]
    pub fn canonical_name(&self) -> &str {
        self.metadata
            .category_name
            .as_deref()
            .unwrap_or(&self.title)
    }

    #[must_use]
    pub const fn sort_order(&self) -> Option<i64> {
        self.metadata.sort_order
    }

    #[must_use]
    pub const fn is_featured(&self) -> bool {
        self.metadata.featured_category
    }
}

/// Sort categories ascending by `sort_order`.
///
/// Categories without an explicit order go after every ordered one. The sort
/// is stable, so ties keep the order the store returned.
pub fn sort_by_display_order(categories: &mut [Category]) {
    categories.sort_by_key(|c| (c.sort_order().is_none(), c.sort_order()));
}
