//! Cosmic REST API client.
//!
//! Objects are read with `GET {api_url}/buckets/{bucket}/objects`, passing the
//! filter document as JSON in the `query` parameter. Cosmic answers a query
//! with no matches with 404, which is reported here as an empty result.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::query::{ObjectQuery, RELATIONSHIP_DEPTH, SELECTED_PROPS};
use super::{ContentError, ContentSource, decode_listed};
use crate::config::CosmicConfig;

/// Maximum characters of a response body kept in logs and errors.
const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the Cosmic objects API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CosmicClient {
    inner: Arc<CosmicClientInner>,
}

struct CosmicClientInner {
    client: reqwest::Client,
    objects_url: Url,
    read_key: SecretString,
}

impl std::fmt::Debug for CosmicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicClient")
            .field("objects_url", &self.inner.objects_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ObjectsResponse<T> {
    #[serde(default = "Vec::new")]
    objects: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CosmicClient {
    /// Create a new client for the configured bucket.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Url` if the API URL and bucket slug do not form
    /// a valid URL.
    pub fn new(config: &CosmicConfig) -> Result<Self, ContentError> {
        let objects_url = objects_url(&config.api_url, &config.bucket_slug)?;

        Ok(Self {
            inner: Arc::new(CosmicClientInner {
                client: reqwest::Client::new(),
                objects_url,
                read_key: config.read_key.clone(),
            }),
        })
    }

    /// The objects endpoint this client reads from.
    #[must_use]
    pub fn objects_url(&self) -> &Url {
        &self.inner.objects_url
    }

    /// Run a query. `Ok(None)` means Cosmic reported no matching objects.
    #[instrument(skip(self), fields(query = %query))]
    async fn fetch(
        &self,
        query: &ObjectQuery,
        limit: Option<u32>,
    ) -> Result<Option<Vec<Value>>, ContentError> {
        let mut params = query_params(query, limit)?;
        params.push(("read_key", self.inner.read_key.expose_secret().to_string()));

        let response = self
            .inner
            .client
            .get(self.inner.objects_url.clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("No objects matched");
            return Ok(None);
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let preview = preview(&response_text);
            tracing::error!(
                status = %status,
                body = %preview,
                "Cosmic API returned non-success status"
            );
            let message = serde_json::from_str::<ErrorBody>(&response_text)
                .map_or(preview, |body| body.message);
            return Err(ContentError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let response: ObjectsResponse<Value> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %preview(&response_text),
                    "Failed to parse Cosmic objects response"
                );
                return Err(ContentError::Parse(e));
            }
        };

        debug!(count = response.objects.len(), "Fetched objects");
        Ok(Some(response.objects))
    }
}

impl ContentSource for CosmicClient {
    async fn find<T>(&self, query: &ObjectQuery) -> Result<Vec<T>, ContentError>
    where
        T: DeserializeOwned + Send,
    {
        let objects = self.fetch(query, None).await?.unwrap_or_default();
        Ok(decode_listed(&objects))
    }

    async fn find_one<T>(&self, query: &ObjectQuery) -> Result<Option<T>, ContentError>
    where
        T: DeserializeOwned + Send,
    {
        self.fetch(query, Some(1))
            .await?
            .and_then(|objects| objects.into_iter().next())
            .map(|object| T::deserialize(object).map_err(ContentError::Parse))
            .transpose()
    }
}

// =============================================================================
// Request building
// =============================================================================

fn objects_url(api_url: &str, bucket_slug: &str) -> Result<Url, ContentError> {
    let base = api_url.trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/buckets/{bucket_slug}/objects"))?)
}

/// Query-string parameters for `query`, without the read key.
fn query_params(
    query: &ObjectQuery,
    limit: Option<u32>,
) -> Result<Vec<(&'static str, String)>, ContentError> {
    let mut params = vec![
        ("query", serde_json::to_string(&query.filter_document())?),
        ("props", SELECTED_PROPS.join(",")),
        ("depth", RELATIONSHIP_DEPTH.to_string()),
    ];
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
    Ok(params)
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
