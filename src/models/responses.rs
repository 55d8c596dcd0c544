//! Response DTOs for the operational HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::refill::{RefillOutcome, RefillStats};

/// Response body for a manual refill (POST /refill/:key)
#[derive(Debug, Clone, Serialize)]
pub struct RefillResponse {
    /// The refilled key
    pub key: String,
    /// Value written to the cache (the sentinel when not found)
    pub value: String,
    /// Whether the record store held a record for the key
    pub found: bool,
}

impl RefillResponse {
    /// Creates a RefillResponse from the outcome that was written
    pub fn from_outcome(outcome: RefillOutcome) -> Self {
        let found = outcome.is_found();
        let (key, value) = crate::refill::materialize(outcome);
        Self { key, value, found }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Counters since startup
    #[serde(flatten)]
    pub stats: RefillStats,
    /// found / (found + not_found)
    pub found_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from refill statistics
    pub fn new(stats: RefillStats) -> Self {
        let found_rate = stats.found_rate();
        Self { stats, found_rate }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
