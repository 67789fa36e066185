//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use luxe_core::{ImageAsset, MAX_STARS, Product, ProductWithReviews, Review};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CategoryResolver, category_facets};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::categories::CategoryView;
use crate::state::AppState;

/// Shown when a product has no images.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

const CARD_IMAGE_SIZE: (u32, u32) = (600, 800);
const DETAIL_IMAGE_SIZE: (u32, u32) = (1200, 1600);

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub slug: String,
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<String>,
    /// Rich text, rendered unescaped.
    pub description: String,
    pub card_image: ImageView,
    pub images: Vec<ImageView>,
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub materials: Option<String>,
    pub care_instructions: Option<String>,
    pub in_stock: bool,
}

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Review display data for templates.
#[derive(Clone)]
pub struct ReviewView {
    pub customer_name: String,
    pub headline: String,
    pub body: String,
    /// Filled and empty stars, e.g. "★★★★☆".
    pub stars: String,
    pub rating: u8,
    pub verified_purchase: bool,
    pub size_purchased: Option<String>,
    pub product_name: Option<String>,
    pub product_slug: Option<String>,
}

impl ImageView {
    fn cropped(image: &ImageAsset, (width, height): (u32, u32), alt: &str) -> Self {
        Self {
            url: image.cropped(width, height),
            alt: alt.to_string(),
        }
    }

    fn placeholder(alt: &str) -> Self {
        Self {
            url: PLACEHOLDER_IMAGE.to_string(),
            alt: alt.to_string(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let name = product.display_name();
        let card_image = product.primary_image().map_or_else(
            || ImageView::placeholder(name),
            |image| ImageView::cropped(image, CARD_IMAGE_SIZE, name),
        );
        let mut images: Vec<ImageView> = product
            .images()
            .iter()
            .map(|image| ImageView::cropped(image, DETAIL_IMAGE_SIZE, name))
            .collect();
        if images.is_empty() {
            images.push(ImageView::placeholder(name));
        }

        Self {
            slug: product.slug.clone(),
            name: name.to_string(),
            brand: product.metadata.designer_brand.clone(),
            price: product.price().map(|p| p.display()),
            description: product.metadata.description.clone().unwrap_or_default(),
            card_image,
            images,
            category: product.category().map(|c| c.label.clone()),
            sizes: product.metadata.sizes_available.clone(),
            materials: product.metadata.materials.clone(),
            care_instructions: product.metadata.care_instructions.clone(),
            in_stock: product.in_stock(),
        }
    }
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        let rating = review.stars();
        Self {
            customer_name: review
                .metadata
                .customer_name
                .clone()
                .unwrap_or_else(|| "Verified customer".to_string()),
            headline: review.headline().to_string(),
            body: review.metadata.review_content.clone().unwrap_or_default(),
            stars: star_string(rating),
            rating,
            verified_purchase: review.metadata.verified_purchase,
            size_purchased: review
                .metadata
                .size_purchased
                .as_ref()
                .map(|size| size.value.clone()),
            product_name: review.product().map(|p| p.display_name().to_string()),
            product_slug: review.product().map(|p| p.slug.clone()),
        }
    }
}

/// Render a star count as filled and empty stars.
#[must_use]
pub fn star_string(rating: u8) -> String {
    let filled = rating.min(MAX_STARS);
    "★".repeat(usize::from(filled)) + &"☆".repeat(usize::from(MAX_STARS - filled))
}

/// Product listing filter.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Category slug.
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    /// Categories that have at least one product.
    pub categories: Vec<CategoryView>,
    pub selected_category: Option<CategoryView>,
    /// Slug requested but not found.
    pub unknown_category: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub reviews: Vec<ReviewView>,
    pub average_rating: Option<String>,
    pub average_stars: Option<String>,
    pub review_count: usize,
}

/// Display product listing page, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let (products, categories) = tokio::try_join!(catalog.products(), catalog.categories())?;

    let category_slug = query.category.filter(|slug| !slug.is_empty());
    let selected = category_slug
        .as_deref()
        .and_then(|slug| categories.iter().find(|c| c.slug == slug));

    let facets = category_facets(&products);
    let filter_categories: Vec<CategoryView> = categories
        .iter()
        .filter(|category| facets.iter().any(|f| f.is_named(category.canonical_name())))
        .map(CategoryView::from)
        .collect();

    let products = match category_slug.as_deref() {
        Some(slug) => CategoryResolver::new(&categories).resolve(slug, products),
        None => products,
    };

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductView::from).collect(),
        categories: filter_categories,
        selected_category: selected.map(CategoryView::from),
        unknown_category: category_slug.filter(|_| selected.is_none()),
    })
}

/// Display product detail page with approved reviews.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let detail = state
        .catalog()
        .product_with_reviews(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let crumb = [("slug", slug.as_str())];
    add_breadcrumb("navigation", "Viewed product page", Some(crumb.as_slice()));

    Ok(product_show_template(&detail))
}

fn product_show_template(detail: &ProductWithReviews) -> ProductShowTemplate {
    let average = detail.average_rating;
    ProductShowTemplate {
        product: ProductView::from(&detail.product),
        reviews: detail.reviews.iter().map(ReviewView::from).collect(),
        average_rating: average.map(|avg| format!("{avg:.1}")),
        average_stars: average.map(|avg| star_string(rounded_stars(avg))),
        review_count: detail.review_count,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=5 first
fn rounded_stars(average: f64) -> u8 {
    average.round().clamp(0.0, f64::from(MAX_STARS)) as u8
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_star_string() {
        assert_eq!(star_string(4), "★★★★☆");
        assert_eq!(star_string(0), "☆☆☆☆☆");
        assert_eq!(star_string(9), "★★★★★");
    }

    #[test]
    fn test_product_view_placeholder_image() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1", "slug": "plain-tee", "title": "Plain Tee", "metadata": {"price": 45}
        }))
        .unwrap();

        let view = ProductView::from(&product);
        assert_eq!(view.card_image.url, PLACEHOLDER_IMAGE);
        assert_eq!(view.images.len(), 1);
        assert_eq!(view.price.as_deref(), Some("$45.00"));
        assert!(view.in_stock);
    }

    #[test]
    fn test_product_view_crops_images() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1", "slug": "silk-dress", "title": "Silk Dress",
            "metadata": {"product_images": [{"url": "https://cdn/a.jpg", "imgix_url": "https://imgix/a.jpg"}]}
        }))
        .unwrap();

        let view = ProductView::from(&product);
        assert_eq!(
            view.card_image.url,
            "https://imgix/a.jpg?w=600&h=800&fit=crop&auto=format,compress"
        );
        assert_eq!(view.card_image.alt, "Silk Dress");
    }

    #[test]
    fn test_rounded_stars() {
        assert_eq!(rounded_stars(4.5), 5);
        assert_eq!(rounded_stars(4.4), 4);
        assert_eq!(rounded_stars(1.0), 1);
    }
}
