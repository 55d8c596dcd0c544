//! HTTP Record Store
//!
//! Queries a document store's REST API for records by key.
//!
//! Request shape: `GET {base}/collections/{collection}/records?key={key}`,
//! answered with a JSON array of records.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::RecordStore;
use crate::error::{RefillError, Result};
use crate::refill::Record;

/// Record store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    records_url: String,
}

impl HttpRecordStore {
    /// Creates a store client for `collection` under `base_url`.
    ///
    /// `request_timeout` bounds each HTTP round trip independently of the
    /// invocation deadline.
    pub fn new(base_url: &str, collection: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RefillError::StoreUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            records_url: format!(
                "{}/collections/{}/records",
                base_url.trim_end_matches('/'),
                collection
            ),
        })
    }

    pub fn records_url(&self) -> &str {
        &self.records_url
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn lookup_by_key(&self, key: &str) -> Result<Vec<Record>> {
        let response = self
            .client
            .get(&self.records_url)
            .query(&[("key", key)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RefillError::StoreUnavailable(e.to_string()))?;

        let records: Vec<Record> = response
            .json()
            .await
            .map_err(|e| RefillError::StoreUnavailable(format!("malformed response: {}", e)))?;

        debug!("Record store returned {} record(s) for {}", records.len(), key);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    /// Serves a fixed inventory under /collections/Inventory/records.
    async fn spawn_fixture_server() -> String {
        async fn records(
            Path(collection): Path<String>,
            Query(params): Query<HashMap<String, String>>,
        ) -> std::result::Result<Json<Value>, StatusCode> {
            if collection != "Inventory" {
                return Err(StatusCode::NOT_FOUND);
            }
            match params.get("key").map(String::as_str) {
                Some("sku-1") => Ok(Json(json!([
                    {"id": "1", "item": "sku-1", "price": "19.99"},
                    {"id": "2", "item": "sku-1", "price": "24.99"}
                ]))),
                Some("numeric") => Ok(Json(json!([{"id": "3", "item": "numeric", "price": 7.5}]))),
                Some("broken") => Ok(Json(json!({"unexpected": "shape"}))),
                Some("boom") => Err(StatusCode::INTERNAL_SERVER_ERROR),
                _ => Ok(Json(json!([]))),
            }
        }

        let app = Router::new().route("/collections/:collection/records", get(records));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn store(base: &str, collection: &str) -> HttpRecordStore {
        HttpRecordStore::new(base, collection, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_records_url_trims_slash() {
        let store = store("http://db.local:8081/", "Inventory");
        assert_eq!(
            store.records_url(),
            "http://db.local:8081/collections/Inventory/records"
        );
    }

    #[tokio::test]
    async fn test_lookup_returns_records_in_store_order() {
        let base = spawn_fixture_server().await;
        let records = store(&base, "Inventory").lookup_by_key("sku-1").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, "19.99");
        assert_eq!(records[1].value, "24.99");
    }

    #[tokio::test]
    async fn test_lookup_numeric_value() {
        let base = spawn_fixture_server().await;
        let records = store(&base, "Inventory").lookup_by_key("numeric").await.unwrap();
        assert_eq!(records[0].value, "7.5");
    }

    #[tokio::test]
    async fn test_lookup_empty_is_not_an_error() {
        let base = spawn_fixture_server().await;
        let records = store(&base, "Inventory").lookup_by_key("sku-2").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_store_unavailable() {
        let base = spawn_fixture_server().await;
        let result = store(&base, "Inventory").lookup_by_key("boom").await;
        assert!(matches!(result, Err(RefillError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_lookup_unknown_collection_is_store_unavailable() {
        let base = spawn_fixture_server().await;
        let result = store(&base, "Missing").lookup_by_key("sku-1").await;
        assert!(matches!(result, Err(RefillError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_lookup_malformed_body_is_store_unavailable() {
        let base = spawn_fixture_server().await;
        let result = store(&base, "Inventory").lookup_by_key("broken").await;
        assert!(matches!(result, Err(RefillError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_lookup_connection_refused_is_store_unavailable() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = store(&format!("http://{}", addr), "Inventory")
            .lookup_by_key("sku-1")
            .await;
        assert!(matches!(result, Err(RefillError::StoreUnavailable(_))));
    }
}
