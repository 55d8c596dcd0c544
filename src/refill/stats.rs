//! Refill Statistics Module
//!
//! Counts invocation results for the operational stats endpoint.

use serde::Serialize;

use crate::error::RefillError;

// == Refill Stats ==
/// Tracks refill pipeline counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefillStats {
    /// Events handed to the worker
    pub events: u64,
    /// Refills written from an existing record
    pub found: u64,
    /// Refills written with the not-found sentinel
    pub not_found: u64,
    /// Events dropped as invalid
    pub rejected: u64,
    /// Record store failures
    pub store_failures: u64,
    /// Cache write failures
    pub sink_failures: u64,
    /// Invocations that ran past their deadline
    pub timeouts: u64,
}

impl RefillStats {
    // == Constructor ==
    /// Creates a new RefillStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Found Rate ==
    /// Share of completed refills that found a record.
    ///
    /// Returns found / (found + not_found), or 0.0 before any refill completed.
    pub fn found_rate(&self) -> f64 {
        let total = self.found + self.not_found;
        if total == 0 {
            0.0
        } else {
            self.found as f64 / total as f64
        }
    }

    pub fn record_event(&mut self) {
        self.events += 1;
    }

    pub fn record_found(&mut self) {
        self.found += 1;
    }

    pub fn record_not_found(&mut self) {
        self.not_found += 1;
    }

    // == Record Failure ==
    /// Increments the counter matching the error kind.
    pub fn record_failure(&mut self, err: &RefillError) {
        match err {
            RefillError::InvalidEvent(_) => self.rejected += 1,
            RefillError::StoreUnavailable(_) => self.store_failures += 1,
            RefillError::SinkUnavailable(_) => self.sink_failures += 1,
            RefillError::Timeout(_) => self.timeouts += 1,
        }
    }
}
