//! Configuration Module
//!
//! Handles loading worker configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Keyevent channel Redis publishes expirations on for database 0.
pub const DEFAULT_EXPIRED_CHANNEL: &str = "__keyevent@0__:expired";

/// Worker configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL used for both the subscription and the writes
    pub redis_url: String,
    /// Pub/sub channel carrying expired key names
    pub expired_channel: String,
    /// Base URL of the record store HTTP API
    pub record_store_url: String,
    /// Collection holding the authoritative records
    pub record_collection: String,
    /// Deadline in milliseconds for one refill invocation
    pub operation_timeout_ms: u64,
    /// Maximum number of concurrently running invocations
    pub max_in_flight: usize,
    /// Operational HTTP server port
    pub server_port: u16,
    /// Issue `CONFIG SET notify-keyspace-events Ex` at startup
    pub configure_notifications: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `EXPIRED_CHANNEL` - Expiration channel (default: __keyevent@0__:expired)
    /// - `RECORD_STORE_URL` - Record store base URL (default: http://127.0.0.1:8081)
    /// - `RECORD_COLLECTION` - Record collection (default: Inventory)
    /// - `OPERATION_TIMEOUT_MS` - Per-invocation deadline (default: 5000)
    /// - `MAX_IN_FLIGHT` - Concurrent invocations (default: 64)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CONFIGURE_NOTIFICATIONS` - Enable expiry events on startup (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            expired_channel: env::var("EXPIRED_CHANNEL").unwrap_or(defaults.expired_channel),
            record_store_url: env::var("RECORD_STORE_URL").unwrap_or(defaults.record_store_url),
            record_collection: env::var("RECORD_COLLECTION")
                .unwrap_or(defaults.record_collection),
            operation_timeout_ms: parse_var("OPERATION_TIMEOUT_MS")
                .unwrap_or(defaults.operation_timeout_ms),
            max_in_flight: parse_var("MAX_IN_FLIGHT")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_in_flight),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            configure_notifications: parse_var("CONFIGURE_NOTIFICATIONS")
                .unwrap_or(defaults.configure_notifications),
        }
    }

    /// Per-invocation deadline as a Duration.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            expired_channel: DEFAULT_EXPIRED_CHANNEL.to_string(),
            record_store_url: "http://127.0.0.1:8081".to_string(),
            record_collection: "Inventory".to_string(),
            operation_timeout_ms: 5000,
            max_in_flight: 64,
            server_port: 3000,
            configure_notifications: false,
        }
    }
}
