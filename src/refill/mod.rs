//! Refill Module
//!
//! Turns key expiration notifications into cache writes backed by the record store.

mod event;
mod outcome;
mod record;
mod stats;
mod worker;


// Re-export public types
pub use event::ExpirationEvent;
pub use outcome::{materialize, RefillOutcome};
pub use record::Record;
pub use stats::RefillStats;
pub use worker::RefillWorker;

// == Public Constants ==
/// Value written to the cache when the record store has no record for a key.
///
/// Downstream readers must treat this as "no data"; it is indistinguishable
/// from a record whose value is literally `false`.
pub const NOT_FOUND_SENTINEL: &str = "false";

/// Channel name used for refills requested through the HTTP surface.
pub const MANUAL_CHANNEL: &str = "manual";
