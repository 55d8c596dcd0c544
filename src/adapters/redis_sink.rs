//! Redis Cache Sink
//!
//! Writes refilled values back to Redis with a plain `SET`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use super::CacheSink;
use crate::error::{RefillError, Result};

/// Cache sink backed by a reconnecting Redis connection.
#[derive(Clone)]
pub struct RedisCacheSink {
    conn: ConnectionManager,
}

impl RedisCacheSink {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheSink for RedisCacheSink {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // ConnectionManager clones share one multiplexed connection
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| RefillError::SinkUnavailable(e.to_string()))?;

        debug!("SET {} issued", key);
        Ok(())
    }
}
