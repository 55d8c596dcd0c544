//! Refill Outcome Module
//!
//! Result of resolving one expiration against the record store.

use serde::Serialize;

use super::NOT_FOUND_SENTINEL;

// == Refill Outcome ==
/// What the record store said about an expired key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefillOutcome {
    /// A record exists; `value` is its authoritative value
    Found { key: String, value: String },
    /// No record exists for `key`
    NotFound { key: String },
}

impl RefillOutcome {
    /// The cache key this outcome refers to.
    pub fn key(&self) -> &str {
        match self {
            RefillOutcome::Found { key, .. } | RefillOutcome::NotFound { key } => key,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RefillOutcome::Found { .. })
    }
}

// == Materialize ==
/// Maps an outcome to the `(key, value)` pair written to the cache.
///
/// `NotFound` becomes [`NOT_FOUND_SENTINEL`].
pub fn materialize(outcome: RefillOutcome) -> (String, String) {
    match outcome {
        RefillOutcome::Found { key, value } => (key, value),
        RefillOutcome::NotFound { key } => (key, NOT_FOUND_SENTINEL.to_string()),
    }
}
