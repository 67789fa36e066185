//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use luxe_core::Collection;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::products::{ImageView, ProductView};
use crate::state::AppState;

const COLLECTION_IMAGE_SIZE: (u32, u32) = (1200, 800);

/// Collection display data for templates.
#[derive(Clone)]
pub struct CollectionView {
    pub slug: String,
    pub name: String,
    /// Rich text, rendered unescaped.
    pub description: String,
    pub season: Option<String>,
    pub image: Option<ImageView>,
    pub products: Vec<ProductView>,
}

impl From<&Collection> for CollectionView {
    fn from(collection: &Collection) -> Self {
        let name = collection.display_name();
        let (width, height) = COLLECTION_IMAGE_SIZE;
        Self {
            slug: collection.slug.clone(),
            name: name.to_string(),
            description: collection.metadata.description.clone().unwrap_or_default(),
            season: collection.metadata.season_year.clone(),
            image: collection
                .metadata
                .collection_image
                .as_ref()
                .map(|image| ImageView {
                    url: image.cropped(width, height),
                    alt: name.to_string(),
                }),
            products: collection.products().iter().map(ProductView::from).collect(),
        }
    }
}

/// Collection listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub collections: Vec<CollectionView>,
}

/// Collection detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub collection: CollectionView,
}

/// Display collection listing page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let collections = state.catalog().collections().await?;

    Ok(CollectionsIndexTemplate {
        collections: collections.iter().map(CollectionView::from).collect(),
    })
}

/// Display collection detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let collection = state
        .catalog()
        .collection(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collection {slug}")))?;

    Ok(CollectionShowTemplate {
        collection: CollectionView::from(&collection),
    })
}
