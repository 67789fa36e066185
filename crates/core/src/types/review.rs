//! Review content type and per-product rating summaries.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::id::{ProductId, ReviewId};
use crate::types::media::SelectOption;
use crate::types::product::Product;

/// Highest star rating a review can carry.
pub const MAX_STARS: u8 = 5;

/// A customer review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub slug: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub metadata: ReviewMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewMetadata {
    #[serde(default, deserialize_with = "de::lenient_option")]
    pub product: Option<ProductRef>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub customer_name: Option<String>,
    /// Key is the star count as text ("1".."5"); value is its label.
    #[serde(default, deserialize_with = "de::lenient_option")]
    pub rating: Option<SelectOption>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub review_title: Option<String>,
    #[serde(default, deserialize_with = "de::non_empty_string")]
    pub review_content: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub verified_purchase: bool,
    #[serde(default, deserialize_with = "de::lenient_option")]
    pub size_purchased: Option<SelectOption>,
    /// Only approved reviews are shown.
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub approved: bool,
}

/// The reviewed product: expanded at depth 1, a bare id otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Expanded(Box<Product>),
}

impl ProductRef {
    #[must_use]
    pub fn id(&self) -> &ProductId {
        match self {
            Self::Id(id) => id,
            Self::Expanded(product) => &product.id,
        }
    }

    #[must_use]
    pub fn expanded(&self) -> Option<&Product> {
        match self {
            Self::Id(_) => None,
            Self::Expanded(product) => Some(product),
        }
    }
}

impl Review {
    /// Review headline, falling back to the object title.
    #[must_use]
    pub fn headline(&self) -> &str {
        self.metadata
            .review_title
            .as_deref()
            .unwrap_or(&self.title)
    }

    /// Star count from the rating key; 0 when absent or unparseable.
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.metadata
            .rating
            .as_ref()
            .and_then(|r| r.key.trim().parse::<u8>().ok())
            .map_or(0, |n| n.min(MAX_STARS))
    }

    #[must_use]
    pub fn product_id(&self) -> Option<&ProductId> {
        self.metadata.product.as_ref().map(ProductRef::id)
    }

    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        self.metadata.product.as_ref().and_then(ProductRef::expanded)
    }

    #[must_use]
    pub const fn is_approved(&self) -> bool {
        self.metadata.approved
    }
}

/// A product together with its visible reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithReviews {
    pub product: Product,
    pub reviews: Vec<Review>,
    /// Mean star rating over reviews that carry one.
    pub average_rating: Option<f64>,
    pub review_count: usize,
}

impl ProductWithReviews {
    #[must_use]
    pub fn new(product: Product, reviews: Vec<Review>) -> Self {
        let rated: Vec<u32> = reviews
            .iter()
            .map(Review::stars)
            .filter(|&stars| stars > 0)
            .map(u32::from)
            .collect();

        let average_rating = u32::try_from(rated.len())
            .ok()
            .filter(|&count| count > 0)
            .map(|count| f64::from(rated.iter().sum::<u32>()) / f64::from(count));

        Self {
            review_count: reviews.len(),
            product,
            reviews,
            average_rating,
        }
    }
}
