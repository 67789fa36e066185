//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

/// Longest meta description search engines display.
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Plain-text meta description from rich text.
///
/// Usage in templates: `{{ product.description|meta_description }}`
#[askama::filter_fn]
pub fn meta_description(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(plain_text_excerpt(&value.to_string(), META_DESCRIPTION_MAX_CHARS))
}

/// Strip HTML tags, collapse whitespace, and keep at most `max_chars`.
#[must_use]
pub fn plain_text_excerpt(html: &str, max_chars: usize) -> String {
    let text = HTML_TAG.replace_all(html, " ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}
