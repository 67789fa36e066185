//! Content inspection commands.
//!
//! Each command runs one catalog accessor and renders the result as JSON or
//! YAML, exactly as the storefront would see it after deserialization.
//!
//! # Environment Variables
//!
//! - `COSMIC_BUCKET_SLUG`, `COSMIC_READ_KEY` - Bucket credentials
//! - `COSMIC_API_ENVIRONMENT`, `COSMIC_API_URL` - Endpoint selection
//! - `LUXE_CONTENT_FIXTURES` - Read a local fixtures file instead

use std::path::PathBuf;

use clap::ValueEnum;
use luxe_core::ProductId;
use luxe_storefront::catalog::{Catalog, CatalogError};
use luxe_storefront::config::{ConfigError, ContentConfig};
use luxe_storefront::cosmic::{ContentBackend, ContentError, ContentSource};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while inspecting content.
#[derive(Debug, Error)]
pub enum ContentCommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Content backend could not be created.
    #[error(transparent)]
    Backend(#[from] ContentError),

    /// A catalog fetch failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The requested object does not exist.
    #[error("No {0} found with slug: {1}")]
    NotFound(&'static str, String),

    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML rendering failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Categories { featured: bool },
    Products { featured: bool, category: Option<String> },
    Product { slug: String, reviews: bool },
    Collections { featured: bool },
    Collection { slug: String },
    Reviews { product: Option<String> },
    Facets,
}

/// Build the content backend from `--fixtures` or the environment.
///
/// # Errors
///
/// Returns an error if configuration is missing or the backend cannot start.
pub async fn connect(fixtures: Option<PathBuf>) -> Result<Catalog<ContentBackend>, ContentCommandError> {
    let config = match fixtures {
        Some(path) => ContentConfig::Fixtures(path),
        None => {
            let _ = dotenvy::dotenv();
            ContentConfig::from_env()?
        }
    };
    let backend = ContentBackend::from_config(&config).await?;
    tracing::debug!(backend = backend.name(), "Connected to content backend");
    Ok(Catalog::new(backend))
}

/// Run `request` against `catalog` and render the result.
///
/// # Errors
///
/// Returns an error if the fetch fails, a single object is missing, or
/// rendering fails.
pub async fn run<S: ContentSource>(
    catalog: &Catalog<S>,
    request: Request,
    format: Format,
) -> Result<String, ContentCommandError> {
    match request {
        Request::Categories { featured: true } => render(&catalog.featured_categories().await?, format),
        Request::Categories { featured: false } => render(&catalog.categories().await?, format),
        Request::Products {
            category: Some(slug),
            ..
        } => render(&catalog.products_by_category(&slug).await?, format),
        Request::Products { featured: true, .. } => render(&catalog.featured_products().await?, format),
        Request::Products { featured: false, .. } => render(&catalog.products().await?, format),
        Request::Product { slug, reviews: true } => {
            let detail = catalog
                .product_with_reviews(&slug)
                .await?
                .ok_or(ContentCommandError::NotFound("product", slug))?;
            render(&detail, format)
        }
        Request::Product { slug, reviews: false } => {
            let product = catalog
                .product(&slug)
                .await?
                .ok_or(ContentCommandError::NotFound("product", slug))?;
            render(&product, format)
        }
        Request::Collections { featured: true } => render(&catalog.featured_collections().await?, format),
        Request::Collections { featured: false } => render(&catalog.collections().await?, format),
        Request::Collection { slug } => {
            let collection = catalog
                .collection(&slug)
                .await?
                .ok_or(ContentCommandError::NotFound("collection", slug))?;
            render(&collection, format)
        }
        Request::Reviews { product: Some(id) } => {
            render(&catalog.product_reviews(&ProductId::new(id)).await?, format)
        }
        Request::Reviews { product: None } => render(&catalog.reviews().await?, format),
        Request::Facets => render(&catalog.category_facets().await?, format),
    }
}

/// Render a value in the requested format.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn render<T: Serialize>(value: &T, format: Format) -> Result<String, ContentCommandError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Yaml => serde_yaml::to_string(value)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use luxe_storefront::cosmic::{MemoryStore, ObjectType};
    use serde_json::json;

    fn catalog() -> Catalog<MemoryStore> {
        let store = MemoryStore::default()
            .with_object(
                ObjectType::Categories,
                json!({"id": "c1", "slug": "bags", "title": "Bags", "metadata": {"category_name": "Bags", "sort_order": 1}}),
            )
            .with_object(
                ObjectType::Products,
                json!({"id": "p1", "slug": "leather-tote", "title": "Leather Tote", "metadata": {"category": "Bags", "price": 890}}),
            )
            .with_object(
                ObjectType::Products,
                json!({"id": "p2", "slug": "silk-dress", "title": "Silk Dress", "metadata": {"category": "Dresses"}}),
            );
        Catalog::new(store)
    }

    #[tokio::test]
    async fn test_products_by_category_json() {
        let output = run(
            &catalog(),
            Request::Products {
                featured: false,
                category: Some("bags".to_string()),
            },
            Format::Json,
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let slugs: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, ["leather-tote"]);
    }

    #[tokio::test]
    async fn test_missing_product_is_an_error() {
        let result = run(
            &catalog(),
            Request::Product {
                slug: "nope".to_string(),
                reviews: false,
            },
            Format::Json,
        )
        .await;

        assert!(matches!(
            result,
            Err(ContentCommandError::NotFound("product", ref slug)) if slug == "nope"
        ));
    }

    #[tokio::test]
    async fn test_yaml_output() {
        let output = run(&catalog(), Request::Categories { featured: false }, Format::Yaml)
            .await
            .unwrap();
        assert!(output.contains("slug: bags"));
    }

    #[tokio::test]
    async fn test_facets() {
        let output = run(&catalog(), Request::Facets, Format::Json).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["label"], "Bags");
        assert_eq!(value[1]["key"], "dresses");
    }
}
