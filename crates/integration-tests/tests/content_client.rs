//! Integration tests for the Cosmic content client.
//!
//! A local stub of the objects API checks the request shape and how each
//! class of response maps to results and errors.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use luxe_core::{Category, Product, ProductId, Review};
use luxe_integration_tests::{BUCKET, READ_KEY, StubCosmic, not_found_body, objects_body};
use luxe_storefront::catalog::Catalog;
use luxe_storefront::cosmic::{ContentError, ContentSource, ObjectQuery, ObjectType};
use serde_json::json;

fn product_json(id: &str, slug: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "slug": slug,
        "title": slug,
        "metadata": {"category": {"key": category.to_lowercase(), "value": category}}
    })
}

// =============================================================================
// Request Shape
// =============================================================================

#[tokio::test]
async fn test_find_sends_query_props_depth_and_key() {
    let stub = StubCosmic::respond_with(
        StatusCode::OK,
        objects_body(vec![product_json("p1", "silk-dress", "Dresses")]),
    )
    .await;

    let query = ObjectQuery::objects(ObjectType::Products).metadata_eq("featured_product", true);
    let products: Vec<Product> = stub.client().find(&query).await.unwrap();
    assert_eq!(products.len(), 1);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.bucket, BUCKET);
    assert_eq!(
        request.query_document(),
        json!({"type": "products", "metadata.featured_product": true})
    );
    assert_eq!(request.param("props"), Some("id,slug,title,metadata"));
    assert_eq!(request.param("depth"), Some("1"));
    assert_eq!(request.param("read_key"), Some(READ_KEY));
    assert_eq!(request.param("limit"), None);
}

#[tokio::test]
async fn test_find_one_limits_to_one() {
    let stub = StubCosmic::respond_with(
        StatusCode::OK,
        objects_body(vec![json!({"id": "c1", "slug": "dresses", "title": "Dresses"})]),
    )
    .await;

    let category: Option<Category> = stub
        .client()
        .find_one(&ObjectQuery::by_slug(ObjectType::Categories, "dresses"))
        .await
        .unwrap();
    assert_eq!(category.unwrap().canonical_name(), "Dresses");

    let request = &stub.requests()[0];
    assert_eq!(
        request.query_document(),
        json!({"type": "categories", "slug": "dresses"})
    );
    assert_eq!(request.param("limit"), Some("1"));
}

#[tokio::test]
async fn test_product_reviews_query_has_both_predicates() {
    let stub = StubCosmic::respond_with(StatusCode::OK, objects_body(Vec::new())).await;
    let catalog = Catalog::new(stub.client());

    let reviews: Vec<Review> = catalog
        .product_reviews(&ProductId::new("p1"))
        .await
        .unwrap();
    assert!(reviews.is_empty());

    assert_eq!(
        stub.requests()[0].query_document(),
        json!({"type": "reviews", "metadata.product": "p1", "metadata.approved": true})
    );
}

// =============================================================================
// Response Mapping
// =============================================================================

#[tokio::test]
async fn test_not_found_is_empty_or_absent() {
    let stub = StubCosmic::respond_with(StatusCode::NOT_FOUND, not_found_body()).await;
    let client = stub.client();

    let products: Vec<Product> = client
        .find(&ObjectQuery::objects(ObjectType::Products))
        .await
        .unwrap();
    assert!(products.is_empty());

    let product: Option<Product> = client
        .find_one(&ObjectQuery::by_slug(ObjectType::Products, "missing"))
        .await
        .unwrap();
    assert!(product.is_none());

    let catalog = Catalog::new(client);
    assert!(catalog.category("missing").await.unwrap().is_none());
    assert!(catalog.categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let stub = StubCosmic::respond_with(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"status": 500, "message": "Bucket unavailable"}),
    )
    .await;

    let result: Result<Vec<Product>, _> = stub
        .client()
        .find(&ObjectQuery::objects(ObjectType::Products))
        .await;

    match result {
        Err(ContentError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Bucket unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_key_is_an_error() {
    let stub = StubCosmic::respond_with(
        StatusCode::UNAUTHORIZED,
        json!({"status": 401, "message": "Unauthorized: invalid read_key"}),
    )
    .await;

    let result: Result<Option<Category>, _> = stub
        .client()
        .find_one(&ObjectQuery::by_slug(ObjectType::Categories, "dresses"))
        .await;
    assert!(matches!(result, Err(ContentError::Status { status: 401, .. })));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let stub = StubCosmic::respond_with(StatusCode::OK, json!("not an objects response")).await;

    let result: Result<Vec<Product>, _> = stub
        .client()
        .find(&ObjectQuery::objects(ObjectType::Products))
        .await;
    assert!(matches!(result, Err(ContentError::Parse(_))));
}

#[tokio::test]
async fn test_malformed_object_is_skipped_in_list() {
    let stub = StubCosmic::respond_with(
        StatusCode::OK,
        objects_body(vec![
            json!({"slug": "missing-id", "title": "Broken"}),
            json!({
                "id": "p2",
                "slug": "tote",
                "title": "Tote",
                "metadata": {"price": "TBD", "product_images": ""}
            }),
        ]),
    )
    .await;

    let products: Vec<Product> = stub
        .client()
        .find(&ObjectQuery::objects(ObjectType::Products))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "tote");
    assert!(products[0].price().is_none());
    assert!(products[0].images().is_empty());
}

#[tokio::test]
async fn test_catalog_error_names_fetch_and_key() {
    let stub = StubCosmic::respond_with(
        StatusCode::BAD_GATEWAY,
        json!({"status": 502, "message": "upstream"}),
    )
    .await;
    let catalog = Catalog::new(stub.client());

    let err = catalog.category("dresses").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch category: dresses");

    let err = catalog.categories().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch categories");

    let err = catalog
        .product_reviews(&ProductId::new("p9"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch reviews for product: p9");
}

// =============================================================================
// End to End
// =============================================================================

#[tokio::test]
async fn test_products_by_category_over_http() {
    let stub = StubCosmic::start(|params| {
        let query: serde_json::Value = serde_json::from_str(&params["query"]).unwrap();
        let objects = match query["type"].as_str() {
            Some("categories") => vec![json!({
                "id": "c-shoes",
                "slug": "shoes",
                "title": "Shoes",
                "metadata": {"category_name": "Shoes", "sort_order": 1}
            })],
            Some("products") => vec![
                product_json("p1", "loafer", "Shoes"),
                product_json("p2", "tote", "Bags"),
                product_json("p3", "pump", "Shoes"),
            ],
            _ => Vec::new(),
        };
        (StatusCode::OK, objects_body(objects))
    })
    .await;
    let catalog = Catalog::new(stub.client());

    assert_eq!(catalog.products().await.unwrap().len(), 3);

    let shoes = catalog.products_by_category("shoes").await.unwrap();
    let slugs: Vec<_> = shoes.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["loafer", "pump"]);
}
