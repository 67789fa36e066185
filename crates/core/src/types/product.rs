//! Product content type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::category_ref::{self, CategoryRef};
use crate::types::id::ProductId;
use crate::types::media::ImageAsset;
use crate::types::price::Price;

/// A product record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub metadata: ProductMetadata,
}

/// Product metafields as modeled in the CMS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub product_name: Option<String>,
    /// Rich text (HTML).
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::optional_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub product_images: Vec<ImageAsset>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub designer_brand: Option<String>,
    #[serde(default, deserialize_with = "category_ref::deserialize_optional")]
    pub category: Option<CategoryRef>,
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub sizes_available: Vec<String>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub materials: Option<String>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub care_instructions: Option<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub featured_product: bool,
}

impl Product {
    /// Display name, falling back to the object title.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.metadata
            .product_name
            .as_deref()
            .unwrap_or(&self.title)
    }

    /// Price in USD, if one is set.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.metadata.price.map(Price::usd)
    }

    /// Images in display order. Empty when the product has none.
    #[must_use]
    pub fn images(&self) -> &[ImageAsset] {
        &self.metadata.product_images
    }

    /// The first image, used for cards and social previews.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ImageAsset> {
        self.metadata.product_images.first()
    }

    /// The normalized category reference.
    #[must_use]
    pub const fn category(&self) -> Option<&CategoryRef> {
        self.metadata.category.as_ref()
    }

    /// Products without an explicit stock flag are sellable.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.metadata.in_stock.unwrap_or(true)
    }

    #[must_use]
    pub const fn is_featured(&self) -> bool {
        self.metadata.featured_product
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_product() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1",
            "slug": "silk-midi-dress",
            "title": "Silk Midi Dress",
            "metadata": {
                "product_name": "The Silk Midi",
                "description": "<p>Bias cut.</p>",
                "price": 1250,
                "product_images": [
                    {"url": "https://cdn/a.jpg", "imgix_url": "https://imgix/a.jpg"},
                    {"url": "https://cdn/b.jpg", "imgix_url": "https://imgix/b.jpg"}
                ],
                "designer_brand": "Maison Ara",
                "category": {"key": "dresses", "value": "Dresses"},
                "sizes_available": ["XS", "S", "M"],
                "in_stock": false,
                "featured_product": true
            }
        }))
        .unwrap();

        assert_eq!(product.display_name(), "The Silk Midi");
        assert_eq!(product.price().unwrap().display(), "$1,250.00");
        assert_eq!(product.images().len(), 2);
        assert_eq!(product.category().unwrap().label, "Dresses");
        assert!(!product.in_stock());
        assert!(product.is_featured());
    }

    #[test]
    fn test_missing_images_is_empty_list() {
        let product: Product = serde_json::from_value(json!({
            "id": "p2",
            "slug": "leather-tote",
            "title": "Leather Tote",
            "metadata": {"category": "Bags", "product_images": null}
        }))
        .unwrap();

        assert!(product.images().is_empty());
        assert!(product.primary_image().is_none());
        assert_eq!(product.display_name(), "Leather Tote");
        assert!(product.price().is_none());
        assert!(product.in_stock());
    }

    #[test]
    fn test_missing_metadata() {
        let product: Product =
            serde_json::from_value(json!({"id": "p3", "slug": "scarf", "title": "Scarf"}))
                .unwrap();
        assert!(product.images().is_empty());
        assert!(product.category().is_none());
        assert!(!product.is_featured());
    }
}
