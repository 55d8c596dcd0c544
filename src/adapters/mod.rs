//! Adapters Module
//!
//! Boundaries between the refill worker and the outside world.
//!
//! # Adapters
//! - `RecordStore`: point lookup of authoritative records by key
//! - `CacheSink`: unconditional cache writes
//! - `NotificationSource`: stream of expiration events

mod http_store;
mod memory;
mod redis_sink;
mod redis_source;

use async_trait::async_trait;

use crate::error::Result;
use crate::refill::{ExpirationEvent, Record};

pub use http_store::HttpRecordStore;
pub use memory::{ChannelSource, MemoryCacheSink, MemoryRecordStore};
pub use redis_sink::RedisCacheSink;
pub use redis_source::{enable_expiry_notifications, RedisNotificationSource};

// == Record Store ==
/// Read-only access to the authoritative record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record whose `key` equals `key`, in store order.
    ///
    /// An empty list means "not found". Errors are reserved for failed queries
    /// and must be [`crate::error::RefillError::StoreUnavailable`].
    async fn lookup_by_key(&self, key: &str) -> Result<Vec<Record>>;
}

// == Cache Sink ==
/// Write access to the cache.
#[async_trait]
pub trait CacheSink: Send + Sync {
    /// Sets `key` to `value`, overwriting whatever is there.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

// == Notification Source ==
/// Producer of expiration events.
#[async_trait]
pub trait NotificationSource: Send {
    /// Waits for the next event. `None` means the source is closed.
    async fn next_event(&mut self) -> Option<ExpirationEvent>;
}
