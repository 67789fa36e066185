//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use luxe_core::Category;
use tracing::instrument;

use crate::catalog::CategoryResolver;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::products::{ImageView, ProductView};
use crate::state::AppState;

const CATEGORY_IMAGE_SIZE: (u32, u32) = (800, 1000);

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<ImageView>,
    pub featured: bool,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        let name = category.canonical_name();
        let (width, height) = CATEGORY_IMAGE_SIZE;
        Self {
            slug: category.slug.clone(),
            name: name.to_string(),
            description: category.metadata.description.clone(),
            image: category.metadata.category_image.as_ref().map(|image| ImageView {
                url: image.cropped(width, height),
                alt: name.to_string(),
            }),
            featured: category.is_featured(),
        }
    }
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<CategoryView>,
}

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: CategoryView,
    pub products: Vec<ProductView>,
}

/// Display all categories in display order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.catalog().categories().await?;

    Ok(CategoriesIndexTemplate {
        categories: categories.iter().map(CategoryView::from).collect(),
    })
}

/// Display one category and its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let (category, products) = tokio::try_join!(catalog.category(&slug), catalog.products())?;
    let category = category.ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let products = CategoryResolver::new(std::slice::from_ref(&category)).resolve(&slug, products);

    Ok(CategoryShowTemplate {
        category: CategoryView::from(&category),
        products: products.iter().map(ProductView::from).collect(),
    })
}
