//! Content access for the Cosmic headless CMS.
//!
//! # Architecture
//!
//! - [`ContentSource`] is the seam between the catalog and wherever objects live
//! - [`CosmicClient`] talks to the Cosmic REST API over `reqwest`
//! - [`MemoryStore`] serves objects from memory (fixtures, tests)
//! - The CMS is the source of truth: no local sync, no caching
//!
//! Every query selects `id`, `slug`, `title` and `metadata` and expands
//! object relationships one level deep.
//!
//! # Example
//!
//! ```rust,ignore
//! use luxe_storefront::cosmic::{ContentSource, CosmicClient, ObjectQuery, ObjectType};
//!
//! let client = CosmicClient::new(&config)?;
//! let query = ObjectQuery::objects(ObjectType::Products).metadata_eq("featured_product", true);
//! let featured: Vec<Product> = client.find(&query).await?;
//! ```

mod client;
mod memory;
mod query;

pub use client::CosmicClient;
pub use memory::MemoryStore;
pub use query::{ObjectQuery, ObjectType, RELATIONSHIP_DEPTH, SELECTED_PROPS};

use std::future::Future;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::ContentConfig;

/// Errors that can occur when reading content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status other than 404.
    #[error("Cosmic API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured API URL is unusable.
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Fixture file could not be read.
    #[error("Failed to read fixtures from {path}: {source}")]
    Fixtures {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A queryable store of content objects.
///
/// Implementations report "no match" as an empty list or `None`, never as an
/// error. Only transport, status, or decoding failures are errors. Lists
/// skip individual objects that fail to decode; `find_one` reports them.
pub trait ContentSource: Send + Sync {
    /// All objects matching `query`, in store order.
    fn find<T>(
        &self,
        query: &ObjectQuery,
    ) -> impl Future<Output = Result<Vec<T>, ContentError>> + Send
    where
        T: DeserializeOwned + Send;

    /// The first object matching `query`, if any.
    fn find_one<T>(
        &self,
        query: &ObjectQuery,
    ) -> impl Future<Output = Result<Option<T>, ContentError>> + Send
    where
        T: DeserializeOwned + Send;
}

/// The content backend selected at startup.
#[derive(Debug, Clone)]
pub enum ContentBackend {
    Cosmic(CosmicClient),
    Memory(MemoryStore),
}

impl ContentBackend {
    /// Build the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is invalid or the fixture file cannot
    /// be read or parsed.
    pub async fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        match config {
            ContentConfig::Cosmic(cosmic) => Ok(Self::Cosmic(CosmicClient::new(cosmic)?)),
            ContentConfig::Fixtures(path) => Ok(Self::Memory(MemoryStore::from_file(path).await?)),
        }
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cosmic(_) => "cosmic",
            Self::Memory(_) => "fixtures",
        }
    }
}

impl ContentSource for ContentBackend {
    async fn find<T>(&self, query: &ObjectQuery) -> Result<Vec<T>, ContentError>
    where
        T: DeserializeOwned + Send,
    {
        match self {
            Self::Cosmic(client) => client.find(query).await,
            Self::Memory(store) => store.find(query).await,
        }
    }

    async fn find_one<T>(&self, query: &ObjectQuery) -> Result<Option<T>, ContentError>
    where
        T: DeserializeOwned + Send,
    {
        match self {
            Self::Cosmic(client) => client.find_one(query).await,
            Self::Memory(store) => store.find_one(query).await,
        }
    }
}

/// Decode listed objects, logging and skipping any that do not fit `T`.
fn decode_listed<'a, T>(objects: impl IntoIterator<Item = &'a Value>) -> Vec<T>
where
    T: DeserializeOwned,
{
    objects
        .into_iter()
        .filter_map(|object| match T::deserialize(object) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    id = object.get("id").and_then(serde_json::Value::as_str).unwrap_or_default(),
                    slug = object.get("slug").and_then(serde_json::Value::as_str).unwrap_or_default(),
                    "Skipping object that failed to decode"
                );
                None
            }
        })
        .collect()
}
