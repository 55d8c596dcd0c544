//! Record Module
//!
//! Authoritative key/value documents as returned by the record store.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

// == Record ==
/// A document holding the authoritative value for a cache key.
///
/// Accepts both `{id, key, value}` and the inventory shape `{id, item, price}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Store-internal identifier
    #[serde(default)]
    pub id: String,
    /// Cache key this record backs
    #[serde(alias = "item")]
    pub key: String,
    /// Value written back to the cache
    #[serde(alias = "price", deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl Record {
    /// Creates a new Record
    pub fn new(id: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Renders any JSON scalar as the string stored in the cache.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "record value must be a scalar, got {}",
            other
        ))),
    }
}
