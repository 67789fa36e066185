//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::routes::collections::CollectionView;
use crate::routes::products::{ProductView, ReviewView};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured_products: Vec<ProductView>,
    pub featured_collections: Vec<CollectionView>,
    pub reviews: Vec<ReviewView>,
}

/// Display home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let content = state.catalog().home().await?;

    Ok(HomeTemplate {
        featured_products: content
            .featured_products
            .iter()
            .map(ProductView::from)
            .collect(),
        featured_collections: content
            .featured_collections
            .iter()
            .map(CollectionView::from)
            .collect(),
        reviews: content.reviews.iter().map(ReviewView::from).collect(),
    })
}
