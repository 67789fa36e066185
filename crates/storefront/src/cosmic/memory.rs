//! In-memory content store.
//!
//! Holds raw objects as the API would return them at depth 1, each tagged
//! with its `type`. Loaded from a JSON fixtures file for local development,
//! and built directly in tests.
//!
//! Fixture files are either a bare array of objects or `{"objects": [...]}`.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::query::{ObjectQuery, ObjectType};
use super::{ContentError, ContentSource, decode_listed};

/// Content objects held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Wrapped { objects: Vec<Value> },
    Bare(Vec<Value>),
}

impl MemoryStore {
    #[must_use]
    pub fn new(objects: Vec<Value>) -> Self {
        Self {
            objects: Arc::new(objects),
        }
    }

    /// Append an object, tagging it with `object_type`.
    #[must_use]
    pub fn with_object(self, object_type: ObjectType, mut object: Value) -> Self {
        if let Value::Object(fields) = &mut object {
            fields.insert("type".into(), Value::from(object_type.as_str()));
        }
        let mut objects = Arc::unwrap_or_clone(self.objects);
        objects.push(object);
        Self::new(objects)
    }

    /// Parse a fixtures document.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` if the text is not a fixtures document.
    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        let objects = match serde_json::from_str::<FixtureFile>(text)? {
            FixtureFile::Wrapped { objects } | FixtureFile::Bare(objects) => objects,
        };
        Ok(Self::new(objects))
    }

    /// Load a fixtures file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn from_file(path: &Path) -> Result<Self, ContentError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Fixtures {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), objects = store.len(), "Loaded content fixtures");
        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn matching<'a>(&'a self, query: &'a ObjectQuery) -> impl Iterator<Item = &'a Value> + 'a {
        self.objects.iter().filter(move |object| query.matches(object))
    }
}

impl ContentSource for MemoryStore {
    async fn find<T>(&self, query: &ObjectQuery) -> Result<Vec<T>, ContentError>
    where
        T: DeserializeOwned + Send,
    {
        Ok(decode_listed(self.matching(query)))
    }

    async fn find_one<T>(&self, query: &ObjectQuery) -> Result<Option<T>, ContentError>
    where
        T: DeserializeOwned + Send,
    {
        self.matching(query)
            .next()
            .map(|object| T::deserialize(object).map_err(ContentError::Parse))
            .transpose()
    }
}
