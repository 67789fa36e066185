//! Category resolution and facets.
//!
//! Products name their category by display label. A category identifier from
//! a URL is a slug, so resolution goes slug -> category -> canonical name ->
//! products carrying that label.

use std::collections::HashSet;

use luxe_core::{Category, CategoryRef, Product};
use tracing::debug;

/// Resolves category slugs against a set of categories.
#[derive(Debug, Clone, Copy)]
pub struct CategoryResolver<'a> {
    categories: &'a [Category],
}

impl<'a> CategoryResolver<'a> {
    #[must_use]
    pub const fn new(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    /// The canonical name of the category with this slug.
    #[must_use]
    pub fn canonical_name(&self, slug: &str) -> Option<&'a str> {
        self.categories
            .iter()
            .find(|category| category.slug == slug)
            .map(Category::canonical_name)
    }

    /// The products in the category identified by `slug`, in their original
    /// order. An unknown slug yields no products.
    #[must_use]
    pub fn resolve(&self, slug: &str, products: Vec<Product>) -> Vec<Product> {
        let Some(name) = self.canonical_name(slug) else {
            debug!(slug, "Unknown category slug");
            return Vec::new();
        };

        products
            .into_iter()
            .filter(|product| product.category().is_some_and(|c| c.is_named(name)))
            .collect()
    }
}

/// Distinct category references used by `products`, keyed by
/// [`CategoryRef::key`], in order of first appearance.
#[must_use]
pub fn category_facets(products: &[Product]) -> Vec<CategoryRef> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter_map(Product::category)
        .filter(|category| seen.insert(category.key.as_str()))
        .cloned()
        .collect()
}
