//! Collection content type.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::id::CollectionId;
use crate::types::media::ImageAsset;
use crate::types::product::Product;

/// A curated collection. Member products are embedded, not referenced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub slug: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub metadata: CollectionMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionMetadata {
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub collection_name: Option<String>,
    /// Rich text (HTML).
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_option")]
    pub collection_image: Option<ImageAsset>,
    #[serde(default, deserialize_with = "de::expanded_objects")]
    pub products: Vec<Product>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub season_year: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub featured_collection: bool,
}

impl Collection {
    /// Display name, falling back to the object title.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.metadata
            .collection_name
            .as_deref()
            .unwrap_or(&self.title)
    }

    /// Member products in curated order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.metadata.products
    }

    #[must_use]
    pub const fn is_featured(&self) -> bool {
        self.metadata.featured_collection
    }
}
