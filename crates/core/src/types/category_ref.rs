//! Normalized product → category reference.
//!
//! Products point at their category in whichever shape the content model had
//! when the record was written:
//!
//! - a bare string (a display value such as `"Dresses"`)
//! - a select-dropdown option `{"key": "dresses", "value": "Dresses"}`
//! - an expanded category object `{"id", "slug", "title", "metadata": {...}}`
//!
//! All of them are folded into [`CategoryRef`] when the product is
//! deserialized. Nothing downstream inspects the raw shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::de;

/// A product's category: a slug-shaped `key` and its cached display `label`.
///
/// The label is the join key against [`Category::canonical_name`].
///
/// [`Category::canonical_name`]: crate::Category::canonical_name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Stable identifier, shaped like a category slug.
    pub key: String,
    /// Display label as stored on the product.
    pub label: String,
}

impl CategoryRef {
    /// Create a reference from an explicit key and label.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Create a reference from a display label, deriving the key from it.
    #[must_use]
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            key: slugify(&label),
            label,
        }
    }

    /// Whether this reference names the category with the given canonical name.
    #[must_use]
    pub fn is_named(&self, canonical_name: &str) -> bool {
        self.label == canonical_name
    }
}

/// Shapes a category reference can take in CMS metadata.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategoryRef {
    Text(String),
    Object(RawCategoryObject),
}

#[derive(Deserialize)]
struct RawCategoryObject {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    metadata: Option<RawCategoryMetadata>,
}

#[derive(Deserialize)]
struct RawCategoryMetadata {
    #[serde(default)]
    category_name: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RawCategoryRef {
    fn normalize(self) -> Option<CategoryRef> {
        match self {
            Self::Text(text) => non_blank(Some(text)).map(CategoryRef::from_label),
            Self::Object(object) => {
                let label = non_blank(object.metadata.and_then(|m| m.category_name))
                    .or_else(|| non_blank(object.label))
                    .or_else(|| non_blank(object.value))
                    .or_else(|| non_blank(object.title));
                let key = non_blank(object.slug).or_else(|| non_blank(object.key));

                match (key, label) {
                    (Some(key), Some(label)) => Some(CategoryRef { key, label }),
                    (None, Some(label)) => Some(CategoryRef::from_label(label)),
                    (Some(key), None) => Some(CategoryRef {
                        label: key.clone(),
                        key,
                    }),
                    (None, None) => None,
                }
            }
        }
    }
}

/// Deserialize an optional category reference from any supported shape.
///
/// Blank strings, `null`, objects without a usable key or label, and values
/// of any other shape become `None`.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<CategoryRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawCategoryRef> = de::lenient_option(deserializer)?;
    Ok(raw.and_then(RawCategoryRef::normalize))
}

/// Lowercase ASCII slug: alphanumerics kept, everything else collapsed to `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional")]
        category: Option<CategoryRef>,
    }

    fn parse(value: serde_json::Value) -> Option<CategoryRef> {
        serde_json::from_value::<Holder>(json!({ "category": value }))
            .unwrap()
            .category
    }

    #[test]
    fn test_display_string() {
        assert_eq!(
            parse(json!("Dresses")),
            Some(CategoryRef::new("dresses", "Dresses"))
        );
    }

    #[test]
    fn test_select_option() {
        assert_eq!(
            parse(json!({"key": "outerwear", "value": "Outerwear"})),
            Some(CategoryRef::new("outerwear", "Outerwear"))
        );
    }

    #[test]
    fn test_expanded_object_prefers_category_name() {
        let raw = json!({
            "id": "65f1",
            "slug": "bags",
            "title": "Bags & Clutches",
            "metadata": {"category_name": "Bags"}
        });
        assert_eq!(parse(raw), Some(CategoryRef::new("bags", "Bags")));
    }

    #[test]
    fn test_expanded_object_falls_back_to_title() {
        let raw = json!({"id": "65f1", "slug": "shoes", "title": "Shoes", "metadata": {}});
        assert_eq!(parse(raw), Some(CategoryRef::new("shoes", "Shoes")));
    }

    #[test]
    fn test_blank_values_are_absent() {
        assert_eq!(parse(json!("")), None);
        assert_eq!(parse(json!(null)), None);
        assert_eq!(parse(json!({"key": "", "value": ""})), None);

        let missing: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(missing.category.is_none());
    }

    #[test]
    fn test_unrecognized_shape_is_absent() {
        assert_eq!(parse(json!(42)), None);
        assert_eq!(parse(json!(true)), None);
    }

    #[test]
    fn test_serialized_form_reads_back() {
        let original = CategoryRef::new("tops", "Tops & Blouses");
        let value = serde_json::to_value(&original).unwrap();
        assert_eq!(parse(value), Some(original));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Dresses"), "dresses");
        assert_eq!(slugify("Outerwear & Coats"), "outerwear-coats");
        assert_eq!(slugify("  Evening  Wear "), "evening-wear");
    }
}
