//! Lenient field deserializers for CMS metadata.
//!
//! The CMS writes unset fields as missing keys, `null`, or `""` depending on
//! the field type and how the record was edited. These helpers fold all of
//! those into the field's empty value. A value of the wrong shape is logged
//! and treated as unset, so one badly edited record never fails a listing.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Error};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// `null` and `""` become `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(D::Error::custom),
    }
}

/// Blank or whitespace-only strings become `None`. Numbers are kept as text.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s).filter(|s| !s.trim().is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        None | Some(Value::Null) => None,
        Some(other) => {
            warn!(value = %other, "Ignoring non-text metafield");
            None
        }
    })
}

/// `null` and `""` become `None`. A value that does not fit `T` is logged
/// and also becomes `None`.
pub fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => Ok(T::deserialize(value)
            .inspect_err(|e| warn!(error = %e, "Ignoring malformed metafield"))
            .ok()),
    }
}

/// `null`, `""` and non-list values become an empty list. Entries that do
/// not fit `T` are logged and skipped.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => Ok(values
            .into_iter()
            .filter_map(|value| {
                T::deserialize(value)
                    .inspect_err(|e| warn!(error = %e, "Skipping malformed list entry"))
                    .ok()
            })
            .collect()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(other) => {
            warn!(value = %other, "Ignoring non-list metafield");
            Ok(Vec::new())
        }
    }
}

/// Numbers or numeric strings. Blank means `None`; so does anything that
/// is not a number, after a warning.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            warn!(value = %other, "Ignoring non-numeric decimal metafield");
            return Ok(None);
        }
    };

    Ok(Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .inspect_err(|e| warn!(value = %text, error = %e, "Ignoring invalid decimal metafield"))
        .ok())
}

/// Integers, whole-valued floats, or integer strings. Blank means `None`;
/// so does anything else, after a warning.
pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole_f64)),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_f64))
        }
        Some(_) => None,
    };

    if parsed.is_none() {
        warn!("Ignoring metafield that is not a whole number");
    }
    Ok(parsed)
}

#[allow(clippy::cast_possible_truncation)] // Range-checked first
fn whole_f64(value: f64) -> Option<i64> {
    (value.fract().abs() < f64::EPSILON && value.abs() < 9.0e15).then(|| value as i64)
}

/// A list of expanded objects. Unexpanded entries (bare id strings) are
/// skipped, as are objects that do not fit `T`; `null` is an empty list.
pub fn expanded_objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values: Vec<Value> = lenient_vec(deserializer)?;
    Ok(values
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|value| {
            T::deserialize(value)
                .inspect_err(|e| warn!(error = %e, "Skipping malformed related object"))
                .ok()
        })
        .collect())
}
