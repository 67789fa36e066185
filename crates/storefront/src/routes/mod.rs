//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//! GET  /health/ready            - Readiness check (content API reachable)
//!
//! # Products
//! GET  /products                - Product listing (?category=<slug>)
//! GET  /products/{slug}         - Product detail with reviews
//!
//! # Categories
//! GET  /categories              - Category listing
//! GET  /categories/{slug}       - Category detail with its products
//!
//! # Collections
//! GET  /collections             - Collection listing
//! GET  /collections/{slug}      - Collection detail
//! ```

pub mod categories;
pub mod collections;
pub mod home;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{slug}", get(collections::show))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/collections", collection_routes())
}
