//! Entity accessors over a [`ContentSource`].
//!
//! One accessor per entity kind, each a single query plus light
//! post-processing (category ordering, featured flags, approval gating).
//! Absence is never an error: a missing slug is `None`, an empty match is an
//! empty list. Any other failure is a [`CatalogError`] naming what was being
//! fetched.

mod resolver;

pub use resolver::{CategoryResolver, category_facets};

use luxe_core::{
    Category, CategoryRef, Collection, Product, ProductId, ProductWithReviews, Review,
    sort_by_display_order,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::cosmic::{ContentError, ContentSource, ObjectQuery, ObjectType};

/// Approved reviews shown on the home page.
pub const HOME_REVIEW_LIMIT: usize = 6;

/// A failed fetch, naming the operation and key.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to fetch {what}")]
    Fetch {
        what: String,
        #[source]
        source: ContentError,
    },
}

impl CatalogError {
    /// What was being fetched, e.g. `category: dresses`.
    #[must_use]
    pub fn what(&self) -> &str {
        match self {
            Self::Fetch { what, .. } => what,
        }
    }
}

/// Everything the home page shows.
#[derive(Debug, Clone)]
pub struct HomeContent {
    pub featured_products: Vec<Product>,
    pub featured_collections: Vec<Collection>,
    pub reviews: Vec<Review>,
}

/// Typed read access to the boutique catalog.
#[derive(Debug, Clone)]
pub struct Catalog<S> {
    source: S,
}

impl<S: ContentSource> Catalog<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories in display order.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let mut categories = self
            .find(&ObjectQuery::objects(ObjectType::Categories), || {
                "categories".to_string()
            })
            .await?;
        sort_by_display_order(&mut categories);
        Ok(categories)
    }

    #[instrument(skip(self))]
    pub async fn category(&self, slug: &str) -> Result<Option<Category>, CatalogError> {
        self.find_one(&ObjectQuery::by_slug(ObjectType::Categories, slug), || {
            format!("category: {slug}")
        })
        .await
    }

    /// Featured categories in display order.
    #[instrument(skip(self))]
    pub async fn featured_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let query =
            ObjectQuery::objects(ObjectType::Categories).metadata_eq("featured_category", true);
        let mut categories = self
            .find(&query, || "featured categories".to_string())
            .await?;
        sort_by_display_order(&mut categories);
        Ok(categories)
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.find(&ObjectQuery::objects(ObjectType::Products), || {
            "products".to_string()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn product(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        self.find_one(&ObjectQuery::by_slug(ObjectType::Products, slug), || {
            format!("product: {slug}")
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, CatalogError> {
        let query =
            ObjectQuery::objects(ObjectType::Products).metadata_eq("featured_product", true);
        self.find(&query, || "featured products".to_string()).await
    }

    /// Products in the category with this slug, in store order.
    #[instrument(skip(self))]
    pub async fn products_by_category(&self, slug: &str) -> Result<Vec<Product>, CatalogError> {
        let (category, products) = tokio::try_join!(self.category(slug), self.products())?;
        Ok(CategoryResolver::new(category.as_slice()).resolve(slug, products))
    }

    /// Categories referenced by at least one product, for filter controls.
    #[instrument(skip(self))]
    pub async fn category_facets(&self) -> Result<Vec<CategoryRef>, CatalogError> {
        Ok(category_facets(&self.products().await?))
    }

    /// A product with its approved reviews and rating summary.
    #[instrument(skip(self))]
    pub async fn product_with_reviews(
        &self,
        slug: &str,
    ) -> Result<Option<ProductWithReviews>, CatalogError> {
        let Some(product) = self.product(slug).await? else {
            return Ok(None);
        };
        let reviews = self.product_reviews(&product.id).await?;
        Ok(Some(ProductWithReviews::new(product, reviews)))
    }

    // =========================================================================
    // Collections
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn collections(&self) -> Result<Vec<Collection>, CatalogError> {
        self.find(&ObjectQuery::objects(ObjectType::Collections), || {
            "collections".to_string()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn collection(&self, slug: &str) -> Result<Option<Collection>, CatalogError> {
        self.find_one(&ObjectQuery::by_slug(ObjectType::Collections, slug), || {
            format!("collection: {slug}")
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn featured_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        let query =
            ObjectQuery::objects(ObjectType::Collections).metadata_eq("featured_collection", true);
        self.find(&query, || "featured collections".to_string())
            .await
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Approved reviews of one product.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, CatalogError> {
        let query = ObjectQuery::objects(ObjectType::Reviews)
            .metadata_eq("product", product_id.as_str())
            .metadata_eq("approved", true);
        self.find(&query, || format!("reviews for product: {product_id}"))
            .await
    }

    /// All approved reviews.
    #[instrument(skip(self))]
    pub async fn reviews(&self) -> Result<Vec<Review>, CatalogError> {
        let query = ObjectQuery::objects(ObjectType::Reviews).metadata_eq("approved", true);
        self.find(&query, || "reviews".to_string()).await
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// Home page content, fetched concurrently.
    #[instrument(skip(self))]
    pub async fn home(&self) -> Result<HomeContent, CatalogError> {
        let (featured_products, featured_collections, mut reviews) = tokio::try_join!(
            self.featured_products(),
            self.featured_collections(),
            self.reviews(),
        )?;
        reviews.truncate(HOME_REVIEW_LIMIT);

        Ok(HomeContent {
            featured_products,
            featured_collections,
            reviews,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn find<T>(
        &self,
        query: &ObjectQuery,
        what: impl FnOnce() -> String,
    ) -> Result<Vec<T>, CatalogError>
    where
        T: DeserializeOwned + Send,
    {
        self.source
            .find(query)
            .await
            .map_err(|source| fetch_failed(what(), source))
    }

    async fn find_one<T>(
        &self,
        query: &ObjectQuery,
        what: impl FnOnce() -> String,
    ) -> Result<Option<T>, CatalogError>
    where
        T: DeserializeOwned + Send,
    {
        self.source
            .find_one(query)
            .await
            .map_err(|source| fetch_failed(what(), source))
    }
}

fn fetch_failed(what: String, source: ContentError) -> CatalogError {
    tracing::error!(what = %what, error = %source, "Content fetch failed");
    CatalogError::Fetch { what, source }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cosmic::MemoryStore;
    use serde_json::{Value, json};

    fn category(slug: &str, name: &str, sort_order: Option<i64>, featured: bool) -> Value {
        json!({
            "id": format!("cat-{slug}"),
            "slug": slug,
            "title": name,
            "metadata": {
                "category_name": name,
                "sort_order": sort_order,
                "featured_category": featured
            }
        })
    }

    fn product(slug: &str, category: Value) -> Value {
        json!({
            "id": format!("prod-{slug}"),
            "slug": slug,
            "title": slug,
            "metadata": {"category": category, "price": 100}
        })
    }

    fn review(id: &str, product_id: &str, approved: bool) -> Value {
        json!({
            "id": id,
            "slug": id,
            "title": id,
            "metadata": {
                "product": {"id": product_id, "slug": product_id, "title": product_id},
                "rating": {"key": "5", "value": "5 Stars"},
                "approved": approved
            }
        })
    }

    fn slugs<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        items.into_iter().collect()
    }

    /// Three products, two "Shoes" and one "Bags", with one "shoes" category.
    fn shoes_and_bags() -> Catalog<MemoryStore> {
        let store = MemoryStore::default()
            .with_object(ObjectType::Products, product("loafer", json!("Shoes")))
            .with_object(ObjectType::Products, product("tote", json!("Bags")))
            .with_object(
                ObjectType::Products,
                product("pump", json!({"key": "shoes", "value": "Shoes"})),
            )
            .with_object(ObjectType::Categories, category("shoes", "Shoes", Some(1), true));
        Catalog::new(store)
    }

    #[tokio::test]
    async fn test_products_by_category_end_to_end() {
        let catalog = shoes_and_bags();

        let products = catalog.products().await.unwrap();
        assert_eq!(products.len(), 3);

        let shoes = catalog.products_by_category("shoes").await.unwrap();
        assert_eq!(
            slugs(shoes.iter().map(|p| p.slug.as_str())),
            ["loafer", "pump"]
        );

        assert!(catalog.products_by_category("bags").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories_sorted_with_unordered_last() {
        let store = MemoryStore::default()
            .with_object(ObjectType::Categories, category("accessories", "Accessories", None, false))
            .with_object(ObjectType::Categories, category("outerwear", "Outerwear", Some(2), true))
            .with_object(ObjectType::Categories, category("bags", "Bags", None, true))
            .with_object(ObjectType::Categories, category("dresses", "Dresses", Some(1), false));
        let catalog = Catalog::new(store);

        let categories = catalog.categories().await.unwrap();
        assert_eq!(
            slugs(categories.iter().map(|c| c.slug.as_str())),
            ["dresses", "outerwear", "accessories", "bags"]
        );

        let featured = catalog.featured_categories().await.unwrap();
        assert_eq!(
            slugs(featured.iter().map(|c| c.slug.as_str())),
            ["outerwear", "bags"]
        );
    }

    #[tokio::test]
    async fn test_category_lookup() {
        let catalog = shoes_and_bags();

        let shoes = catalog.category("shoes").await.unwrap().unwrap();
        assert_eq!(shoes.canonical_name(), "Shoes");
        assert!(catalog.category("hats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_reviews_are_approved_only() {
        let store = MemoryStore::default()
            .with_object(ObjectType::Products, product("loafer", json!("Shoes")))
            .with_object(ObjectType::Reviews, review("r1", "prod-loafer", true))
            .with_object(ObjectType::Reviews, review("r2", "prod-loafer", false))
            .with_object(ObjectType::Reviews, review("r3", "prod-tote", true));
        let catalog = Catalog::new(store);

        let reviews = catalog
            .product_reviews(&ProductId::new("prod-loafer"))
            .await
            .unwrap();
        assert_eq!(slugs(reviews.iter().map(|r| r.slug.as_str())), ["r1"]);
        assert!(reviews.iter().all(Review::is_approved));

        let all = catalog.reviews().await.unwrap();
        assert_eq!(slugs(all.iter().map(|r| r.slug.as_str())), ["r1", "r3"]);

        let detail = catalog.product_with_reviews("loafer").await.unwrap().unwrap();
        assert_eq!(detail.review_count, 1);
        assert!(catalog.product_with_reviews("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_without_images() {
        let store = MemoryStore::default().with_object(
            ObjectType::Products,
            json!({"id": "p1", "slug": "plain-tee", "title": "Plain Tee", "metadata": {"price": 45}}),
        );
        let catalog = Catalog::new(store);

        let product = catalog.product("plain-tee").await.unwrap().unwrap();
        assert!(product.images().is_empty());
        assert_eq!(catalog.products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_home_limits_reviews() {
        let mut store = MemoryStore::default()
            .with_object(ObjectType::Products, product("loafer", json!("Shoes")));
        for n in 0..8 {
            store = store.with_object(ObjectType::Reviews, review(&format!("r{n}"), "prod-loafer", true));
        }
        let catalog = Catalog::new(store);

        let home = catalog.home().await.unwrap();
        assert_eq!(home.reviews.len(), HOME_REVIEW_LIMIT);
        assert_eq!(home.reviews[0].slug, "r0");
        assert!(home.featured_products.is_empty());
        assert!(home.featured_collections.is_empty());
    }

    #[tokio::test]
    async fn test_category_facets() {
        let facets = shoes_and_bags().category_facets().await.unwrap();
        let labels: Vec<_> = facets.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["Shoes", "Bags"]);
    }

    #[tokio::test]
    async fn test_badly_edited_metafields_do_not_fail_listings() {
        let store = MemoryStore::default()
            .with_object(ObjectType::Categories, category("shoes", "Shoes", Some(1), false))
            .with_object(
                ObjectType::Categories,
                json!({
                    "id": "cat-bags",
                    "slug": "bags",
                    "title": "Bags",
                    "metadata": {"category_name": "Bags", "sort_order": 2.5}
                }),
            )
            .with_object(
                ObjectType::Products,
                json!({
                    "id": "prod-loafer",
                    "slug": "loafer",
                    "title": "Loafer",
                    "metadata": {"category": "Shoes", "product_images": "", "sizes_available": ""}
                }),
            )
            .with_object(
                ObjectType::Products,
                json!({
                    "id": "prod-tote",
                    "slug": "tote",
                    "title": "Tote",
                    "metadata": {"category": "Bags", "price": "TBD"}
                }),
            )
            .with_object(
                ObjectType::Reviews,
                json!({
                    "id": "r1",
                    "slug": "r1",
                    "title": "Lovely",
                    "metadata": {"product": 17, "approved": true}
                }),
            );
        let catalog = Catalog::new(store);

        let categories = catalog.categories().await.unwrap();
        assert_eq!(
            slugs(categories.iter().map(|c| c.slug.as_str())),
            ["shoes", "bags"]
        );
        assert_eq!(categories[1].sort_order(), None);

        let products = catalog.products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(products[0].images().is_empty());
        assert!(products[0].metadata.sizes_available.is_empty());
        assert!(products[1].price().is_none());

        let reviews = catalog.reviews().await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert!(reviews[0].product_id().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_object_is_dropped_from_list() {
        let store = MemoryStore::default()
            .with_object(ObjectType::Categories, json!({"slug": "no-id"}))
            .with_object(ObjectType::Categories, category("shoes", "Shoes", Some(1), false));
        let catalog = Catalog::new(store);

        let categories = catalog.categories().await.unwrap();
        assert_eq!(slugs(categories.iter().map(|c| c.slug.as_str())), ["shoes"]);
    }

    #[tokio::test]
    async fn test_decode_failure_names_the_fetch() {
        let store = MemoryStore::default()
            .with_object(ObjectType::Categories, json!({"slug": "dresses"}));
        let catalog = Catalog::new(store);

        let err = catalog.category("dresses").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch category: dresses");
        assert_eq!(err.what(), "category: dresses");
    }
}
