//! In-Memory Adapters
//!
//! Process-local record store, cache sink and notification source. Clones
//! share state, so a test can keep a handle while the worker owns another.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use super::{CacheSink, NotificationSource, RecordStore};
use crate::error::{RefillError, Result};
use crate::refill::{ExpirationEvent, Record};

// == Memory Record Store ==
/// Record store holding records in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<Record>>>,
    queries: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
    latency: Option<Duration>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `records`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Delays every lookup by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn insert(&self, record: Record) {
        self.records.write().await.push(record);
    }

    /// Removes every record for `key`, returning how many were removed.
    pub async fn remove(&self, key: &str) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.key != key);
        before - records.len()
    }

    /// Makes subsequent lookups fail with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of lookups issued so far, including failed ones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn lookup_by_key(&self, key: &str) -> Result<Vec<Record>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RefillError::StoreUnavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }

        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.key == key).cloned().collect())
    }
}

// == Memory Cache Sink ==
/// Cache sink recording every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheSink {
    entries: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<RwLock<Vec<(String, String)>>>,
    unavailable: Arc<AtomicBool>,
    latency: Option<Duration>,
}

impl MemoryCacheSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every write by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Current cached value for `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Every `(key, value)` write in the order it landed.
    pub async fn writes(&self) -> Vec<(String, String)> {
        self.writes.read().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    /// Makes subsequent writes fail with `SinkUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheSink for MemoryCacheSink {
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RefillError::SinkUnavailable(
                "in-memory sink marked unavailable".to_string(),
            ));
        }

        // Both locks are held so the log order matches the map's final state
        let mut entries = self.entries.write().await;
        let mut writes = self.writes.write().await;
        entries.insert(key.to_string(), value.to_string());
        writes.push((key.to_string(), value.to_string()));
        Ok(())
    }
}

// == Channel Source ==
/// Notification source fed through an mpsc channel.
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<ExpirationEvent>,
}

impl ChannelSource {
    /// Creates a source and the sender that feeds it.
    ///
    /// The source closes once every sender is dropped.
    pub fn new(buffer: usize) -> (mpsc::Sender<ExpirationEvent>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self { receiver })
    }
}

#[async_trait]
impl NotificationSource for ChannelSource {
    async fn next_event(&mut self) -> Option<ExpirationEvent> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_lookup_filters_by_key() {
        let store = MemoryRecordStore::with_records(vec![
            Record::new("1", "a", "1.00"),
            Record::new("2", "b", "2.00"),
            Record::new("3", "a", "3.00"),
        ]);

        let records = store.lookup_by_key("a").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].id, "3");
        assert!(store.lookup_by_key("c").await.unwrap().is_empty());
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn test_store_insert_and_remove() {
        let store = MemoryRecordStore::new();
        store.insert(Record::new("1", "a", "1.00")).await;
        assert_eq!(store.lookup_by_key("a").await.unwrap().len(), 1);

        assert_eq!(store.remove("a").await, 1);
        assert!(store.lookup_by_key("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_unavailable() {
        let store = MemoryRecordStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.lookup_by_key("a").await,
            Err(RefillError::StoreUnavailable(_))
        ));
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_sink_overwrites() {
        let sink = MemoryCacheSink::new();
        sink.set("k", "v1").await.unwrap();
        sink.set("k", "v2").await.unwrap();

        assert_eq!(sink.get("k").await.as_deref(), Some("v2"));
        assert_eq!(sink.write_count().await, 2);
    }

    #[tokio::test]
    async fn test_sink_unavailable() {
        let sink = MemoryCacheSink::new();
        sink.set_unavailable(true);
        assert!(matches!(
            sink.set("k", "v").await,
            Err(RefillError::SinkUnavailable(_))
        ));
        assert!(sink.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_channel_source_closes_with_sender() {
        let (sender, mut source) = ChannelSource::new(4);
        sender.send(ExpirationEvent::new("ch", "k")).await.unwrap();
        drop(sender);

        assert_eq!(source.next_event().await.unwrap().key, "k");
        assert!(source.next_event().await.is_none());
    }
}
