//! Refill Worker Module
//!
//! Resolves expired keys against the record store and writes the result back
//! to the cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::adapters::{CacheSink, RecordStore};
use crate::error::{RefillError, Result};
use crate::refill::{materialize, ExpirationEvent, RefillOutcome, RefillStats};

// == Refill Worker ==
/// Stateless expiration handler.
///
/// Clones share the same adapters and counters, so one worker can be handed
/// to many concurrent tasks. No invocation depends on any other; the cache
/// ends up holding whichever write landed last.
#[derive(Clone)]
pub struct RefillWorker {
    /// Authoritative record lookup
    store: Arc<dyn RecordStore>,
    /// Cache write target
    sink: Arc<dyn CacheSink>,
    /// Deadline applied when the caller does not supply one
    timeout: Duration,
    /// Invocation counters
    stats: Arc<RwLock<RefillStats>>,
}

impl RefillWorker {
    // == Constructor ==
    /// Creates a worker over the given adapters.
    ///
    /// # Arguments
    /// * `store` - Record store consulted for each expired key
    /// * `sink` - Cache receiving the refilled value
    /// * `timeout` - Default per-invocation deadline
    pub fn new(store: Arc<dyn RecordStore>, sink: Arc<dyn CacheSink>, timeout: Duration) -> Self {
        Self {
            store,
            sink,
            timeout,
            stats: Arc::new(RwLock::new(RefillStats::new())),
        }
    }

    /// Snapshot of the invocation counters.
    pub async fn stats(&self) -> RefillStats {
        self.stats.read().await.clone()
    }

    // == Handle Expiration ==
    /// Resolves `event` to an outcome without writing to the cache.
    ///
    /// The first record returned by the store wins. Empty keys fail with
    /// `InvalidEvent` before the store is queried.
    pub async fn handle_expiration(&self, event: &ExpirationEvent) -> Result<RefillOutcome> {
        self.handle_expiration_until(event, Instant::now() + self.timeout)
            .await
    }

    /// [`RefillWorker::handle_expiration`] bounded by an explicit deadline.
    pub async fn handle_expiration_until(
        &self,
        event: &ExpirationEvent,
        deadline: Instant,
    ) -> Result<RefillOutcome> {
        if let Err(err) = event.validate() {
            warn!("Rejected event: {}", err);
            return Err(err);
        }

        info!("Key '{}' has expired", event.key);

        let records = timeout_at(deadline, self.store.lookup_by_key(&event.key))
            .await
            .map_err(|_| RefillError::Timeout("record store lookup".to_string()))??;

        match records.into_iter().next() {
            Some(record) => {
                info!("Key '{}' resolved to value '{}'", event.key, record.value);
                Ok(RefillOutcome::Found {
                    key: event.key.clone(),
                    value: record.value,
                })
            }
            None => {
                info!("Key '{}' not found in record store", event.key);
                Ok(RefillOutcome::NotFound {
                    key: event.key.clone(),
                })
            }
        }
    }

    // == Process ==
    /// Runs one full invocation: resolve, materialize, write.
    ///
    /// Returns the outcome that was written. Failures are not retried here;
    /// redelivery of the event is the retry mechanism.
    pub async fn process(&self, event: ExpirationEvent) -> Result<RefillOutcome> {
        self.process_with_deadline(event, Instant::now() + self.timeout)
            .await
    }

    /// [`RefillWorker::process`] bounded by a deadline propagated by the caller.
    pub async fn process_with_deadline(
        &self,
        event: ExpirationEvent,
        deadline: Instant,
    ) -> Result<RefillOutcome> {
        let result = self.refill(&event, deadline).await;

        let mut stats = self.stats.write().await;
        stats.record_event();
        match &result {
            Ok(RefillOutcome::Found { .. }) => stats.record_found(),
            Ok(RefillOutcome::NotFound { .. }) => stats.record_not_found(),
            Err(err) => stats.record_failure(err),
        }

        result
    }

    async fn refill(&self, event: &ExpirationEvent, deadline: Instant) -> Result<RefillOutcome> {
        let outcome = self.handle_expiration_until(event, deadline).await?;
        let (key, value) = materialize(outcome.clone());

        timeout_at(deadline, self.sink.set(&key, &value))
            .await
            .map_err(|_| RefillError::Timeout("cache write".to_string()))??;

        debug!("Wrote '{}' = '{}' to cache", key, value);
        Ok(outcome)
    }
}
