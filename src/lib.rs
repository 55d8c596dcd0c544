//! Cache Refill - Expiration-driven cache warming
//!
//! Listens for key expirations in Redis, looks up the authoritative value in a
//! document store and writes it back to the cache.

pub mod adapters;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod refill;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{RefillError, Result};
pub use refill::{ExpirationEvent, RefillOutcome, RefillWorker};
pub use tasks::{spawn_listener_task, supervise};
