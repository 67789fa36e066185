//! Content types for the boutique.
//!
//! These mirror the CMS object types (`products`, `categories`, `collections`,
//! `reviews`) with a thin layer of accessors for display fallbacks.

pub mod category;
pub mod category_ref;
pub mod collection;
pub mod id;
pub mod media;
pub mod price;
pub mod product;
pub mod review;

pub use category::{Category, CategoryMetadata, sort_by_display_order};
pub use category_ref::{CategoryRef, slugify};
pub use collection::{Collection, CollectionMetadata};
pub use id::*;
pub use media::{ImageAsset, SelectOption};
pub use price::{CurrencyCode, Price};
pub use product::{Product, ProductMetadata};
pub use review::{MAX_STARS, ProductRef, ProductWithReviews, Review, ReviewMetadata};
