//! Object queries: a type, an optional slug, and metadata equality filters.

use std::fmt;

use serde_json::{Map, Value};

/// Object properties selected by every query.
pub const SELECTED_PROPS: &[&str] = &["id", "slug", "title", "metadata"];

/// How many levels of object relationships are expanded.
pub const RELATIONSHIP_DEPTH: u8 = 1;

/// Content types in the boutique bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Products,
    Categories,
    Collections,
    Reviews,
}

impl ObjectType {
    /// The type slug as stored in the bucket.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Collections => "collections",
            Self::Reviews => "reviews",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A find query against one object type.
///
/// Filters compare a metadata field for equality. A relationship field
/// matches when the related object's id equals the filter value.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectQuery {
    object_type: ObjectType,
    slug: Option<String>,
    filters: Vec<(String, Value)>,
}

impl ObjectQuery {
    /// Every object of `object_type`.
    #[must_use]
    pub const fn objects(object_type: ObjectType) -> Self {
        Self {
            object_type,
            slug: None,
            filters: Vec::new(),
        }
    }

    /// The object of `object_type` with the given slug.
    #[must_use]
    pub fn by_slug(object_type: ObjectType, slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::objects(object_type)
        }
    }

    /// Add a `metadata.<field> == value` filter.
    #[must_use]
    pub fn metadata_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters
            .push((format!("metadata.{field}"), value.into()));
        self
    }

    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        self.object_type
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// The JSON filter document sent as the `query` parameter.
    #[must_use]
    pub fn filter_document(&self) -> Value {
        let mut document = Map::new();
        document.insert("type".into(), Value::from(self.object_type.as_str()));
        if let Some(slug) = &self.slug {
            document.insert("slug".into(), Value::from(slug.as_str()));
        }
        for (path, value) in &self.filters {
            document.insert(path.clone(), value.clone());
        }
        Value::Object(document)
    }

    /// Whether a stored object (carrying its `type`) satisfies this query.
    #[must_use]
    pub fn matches(&self, object: &Value) -> bool {
        if object.get("type").and_then(Value::as_str) != Some(self.object_type.as_str()) {
            return false;
        }
        if let Some(slug) = &self.slug
            && object.get("slug").and_then(Value::as_str) != Some(slug.as_str())
        {
            return false;
        }
        self.filters
            .iter()
            .all(|(path, expected)| lookup(object, path).is_some_and(|v| field_matches(v, expected)))
    }
}

impl fmt::Display for ObjectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.object_type)?;
        if let Some(slug) = &self.slug {
            write!(f, "/{slug}")?;
        }
        for (path, value) in &self.filters {
            write!(f, "[{path}={value}]")?;
        }
        Ok(())
    }
}

fn lookup<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(object, |value, key| value.get(key))
}

/// Plain equality, or id equality against an expanded related object, or
/// any element of a multi-object relationship.
fn field_matches(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match actual {
        Value::Object(related) => related.get("id") == Some(expected),
        Value::Array(items) => items.iter().any(|item| field_matches(item, expected)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_document() {
        let query = ObjectQuery::objects(ObjectType::Reviews)
            .metadata_eq("product", "p1")
            .metadata_eq("approved", true);

        assert_eq!(
            query.filter_document(),
            json!({"type": "reviews", "metadata.product": "p1", "metadata.approved": true})
        );
    }

    #[test]
    fn test_filter_document_with_slug() {
        let query = ObjectQuery::by_slug(ObjectType::Categories, "dresses");
        assert_eq!(
            query.filter_document(),
            json!({"type": "categories", "slug": "dresses"})
        );
        assert_eq!(query.to_string(), "categories/dresses");
    }

    #[test]
    fn test_matches_type_and_slug() {
        let object = json!({"type": "products", "slug": "silk-dress", "metadata": {}});
        assert!(ObjectQuery::objects(ObjectType::Products).matches(&object));
        assert!(ObjectQuery::by_slug(ObjectType::Products, "silk-dress").matches(&object));
        assert!(!ObjectQuery::by_slug(ObjectType::Products, "wool-coat").matches(&object));
        assert!(!ObjectQuery::objects(ObjectType::Categories).matches(&object));
    }

    #[test]
    fn test_matches_metadata_flags() {
        let query = ObjectQuery::objects(ObjectType::Products).metadata_eq("featured_product", true);
        assert!(query.matches(&json!({"type": "products", "metadata": {"featured_product": true}})));
        assert!(!query.matches(&json!({"type": "products", "metadata": {"featured_product": false}})));
        assert!(!query.matches(&json!({"type": "products", "metadata": {}})));
        assert!(!query.matches(&json!({"type": "products"})));
    }

    #[test]
    fn test_matches_relationship_by_id() {
        let query = ObjectQuery::objects(ObjectType::Reviews).metadata_eq("product", "p1");
        assert!(query.matches(&json!({"type": "reviews", "metadata": {"product": "p1"}})));
        assert!(query.matches(&json!({
            "type": "reviews",
            "metadata": {"product": {"id": "p1", "slug": "silk-dress"}}
        })));
        assert!(!query.matches(&json!({
            "type": "reviews",
            "metadata": {"product": {"id": "p2", "slug": "wool-coat"}}
        })));
        assert!(query.matches(&json!({
            "type": "reviews",
            "metadata": {"product": [{"id": "p3"}, {"id": "p1"}]}
        })));
    }
}
