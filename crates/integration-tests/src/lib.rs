//! Integration tests for Luxe Fashion Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luxe-integration-tests
//! ```
//!
//! No bucket credentials are needed: storefront pages run against the bundled
//! fixtures, and content client tests run against [`StubCosmic`], a local
//! axum server speaking the Cosmic objects API.
//!
//! # Test Categories
//!
//! - `content_client` - `CosmicClient` wire format and error mapping
//! - `storefront_pages` - Routed pages rendered from fixtures

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode},
    routing::get,
};
use luxe_storefront::config::{ContentConfig, CosmicConfig, StorefrontConfig};
use luxe_storefront::cosmic::{ContentBackend, CosmicClient, MemoryStore};
use luxe_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// Bucket slug the stub server expects.
pub const BUCKET: &str = "luxe-test";

/// Read key handed to clients of the stub server.
pub const READ_KEY: &str = "stub-read-key-7Qx2";

// =============================================================================
// Storefront
// =============================================================================

/// The fixtures file shipped with the storefront.
#[must_use]
pub fn fixtures_path() -> PathBuf {
    PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../storefront/fixtures/catalog.json"
    ))
}

/// The storefront fixtures as an in-memory store.
///
/// # Panics
///
/// Panics if the bundled fixtures are not valid.
#[must_use]
pub fn fixture_store() -> MemoryStore {
    MemoryStore::from_json(include_str!("../../storefront/fixtures/catalog.json"))
        .expect("bundled fixtures should parse")
}

/// Storefront configuration for tests.
#[must_use]
pub fn test_config(content: ContentConfig) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        content,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The storefront router serving the bundled fixtures.
#[must_use]
pub fn fixture_app() -> Router {
    let config = test_config(ContentConfig::Fixtures(fixtures_path()));
    luxe_storefront::app(AppState::new(config, ContentBackend::Memory(fixture_store())))
}

/// The storefront router reading from a Cosmic endpoint.
#[must_use]
pub fn cosmic_app(config: CosmicConfig) -> Router {
    let client = CosmicClient::new(&config).expect("stub URL should be valid");
    let config = test_config(ContentConfig::Cosmic(config));
    luxe_storefront::app(AppState::new(config, ContentBackend::Cosmic(client)))
}

/// A rendered response.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// Send a GET request through the router.
///
/// # Panics
///
/// Panics if the request cannot be built or the body is not UTF-8.
pub async fn get_page(app: Router, uri: &str) -> Page {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");

    Page {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).expect("body should be UTF-8"),
    }
}

// =============================================================================
// Stub Cosmic API
// =============================================================================

type Responder = Arc<dyn Fn(&HashMap<String, String>) -> (StatusCode, Value) + Send + Sync>;

/// One request received by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub bucket: String,
    pub params: HashMap<String, String>,
}

impl RecordedRequest {
    /// The decoded `query` filter document.
    ///
    /// # Panics
    ///
    /// Panics if the request had no valid `query` parameter.
    #[must_use]
    pub fn query_document(&self) -> Value {
        let raw = self.params.get("query").expect("query parameter present");
        serde_json::from_str(raw).expect("query parameter is JSON")
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[derive(Clone)]
struct StubState {
    responder: Responder,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A local server answering `GET /v3/buckets/{bucket}/objects`.
pub struct StubCosmic {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: JoinHandle<()>,
}

impl StubCosmic {
    /// Start a stub whose responses come from `responder`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            responder: Arc::new(responder),
            requests: Arc::clone(&requests),
        };
        let router = Router::new()
            .route("/v3/buckets/{bucket}/objects", get(objects))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });

        Self {
            addr,
            requests,
            server,
        }
    }

    /// A stub that always answers with `status` and `body`.
    pub async fn respond_with(status: StatusCode, body: Value) -> Self {
        Self::start(move |_| (status, body.clone())).await
    }

    /// Client configuration pointing at this stub.
    #[must_use]
    pub fn config(&self) -> CosmicConfig {
        CosmicConfig {
            bucket_slug: BUCKET.to_string(),
            read_key: SecretString::from(READ_KEY),
            api_url: format!("http://{}/v3", self.addr),
        }
    }

    /// A client for this stub.
    ///
    /// # Panics
    ///
    /// Panics if the stub URL is rejected.
    #[must_use]
    pub fn client(&self) -> CosmicClient {
        CosmicClient::new(&self.config()).expect("stub URL should be valid")
    }

    /// Requests received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the request log lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for StubCosmic {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn objects(
    State(stub): State<StubState>,
    Path(bucket): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let (status, body) = (stub.responder)(&params);
    stub.requests
        .lock()
        .expect("request log")
        .push(RecordedRequest { bucket, params });
    (status, Json(body))
}

/// A successful objects response body.
#[must_use]
pub fn objects_body(objects: Vec<Value>) -> Value {
    let total = objects.len();
    json!({ "objects": objects, "total": total })
}

/// The error body Cosmic sends when nothing matches.
#[must_use]
pub fn not_found_body() -> Value {
    json!({ "status": 404, "message": "No objects found for your query" })
}
