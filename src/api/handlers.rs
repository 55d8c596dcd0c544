//! API Handlers
//!
//! HTTP request handlers for each operational endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::models::{HealthResponse, RefillResponse, StatsResponse};
use crate::refill::{ExpirationEvent, RefillWorker, MANUAL_CHANNEL};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Worker shared with the expiration listener
    pub worker: RefillWorker,
}

impl AppState {
    /// Creates a new AppState around the given worker.
    pub fn new(worker: RefillWorker) -> Self {
        Self { worker }
    }
}

/// Handler for POST /refill/:key
///
/// Runs the same pipeline an expiration would, on the `manual` channel.
pub async fn refill_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RefillResponse>> {
    let outcome = state
        .worker
        .process(ExpirationEvent::new(MANUAL_CHANNEL, key))
        .await?;

    Ok(Json(RefillResponse::from_outcome(outcome)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.worker.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::adapters::{MemoryCacheSink, MemoryRecordStore};
    use crate::error::RefillError;
    use crate::refill::Record;

    fn state_with(store: &MemoryRecordStore, sink: &MemoryCacheSink) -> AppState {
        AppState::new(RefillWorker::new(
            Arc::new(store.clone()),
            Arc::new(sink.clone()),
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn test_refill_handler_found() {
        let store = MemoryRecordStore::with_records(vec![Record::new("1", "sku-1", "19.99")]);
        let sink = MemoryCacheSink::new();
        let state = state_with(&store, &sink);

        let response = refill_handler(State(state), Path("sku-1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, "19.99");
        assert!(response.found);
        assert_eq!(sink.get("sku-1").await.as_deref(), Some("19.99"));
    }

    #[tokio::test]
    async fn test_refill_handler_store_down() {
        let store = MemoryRecordStore::new();
        store.set_unavailable(true);
        let state = state_with(&store, &MemoryCacheSink::new());

        let result = refill_handler(State(state), Path("sku-1".to_string())).await;
        assert!(matches!(result, Err(RefillError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state_with(&MemoryRecordStore::new(), &MemoryCacheSink::new());

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.events, 0);
        assert_eq!(response.found_rate, 0.0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
