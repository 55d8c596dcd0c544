//! Error types for the refill pipeline
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Refill Error Enum ==
/// Failure of a single refill invocation.
///
/// A missing record is not an error; see [`crate::refill::RefillOutcome::NotFound`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefillError {
    /// Notification carried an empty or malformed key
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Record store query failed (transport, status or body)
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// Cache write failed
    #[error("Cache sink unavailable: {0}")]
    SinkUnavailable(String),

    /// Store or sink unavailable because the invocation deadline elapsed
    /// during the named operation
    #[error("Timed out during {0}")]
    Timeout(String),
}

impl RefillError {
    /// Whether redelivery of the same event may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RefillError::InvalidEvent(_))
    }

    /// Short label used in logs and stats.
    pub fn kind(&self) -> &'static str {
        match self {
            RefillError::InvalidEvent(_) => "invalid_event",
            RefillError::StoreUnavailable(_) => "store_unavailable",
            RefillError::SinkUnavailable(_) => "sink_unavailable",
            RefillError::Timeout(_) => "timeout",
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for RefillError {
    fn into_response(self) -> Response {
        let status = match &self {
            RefillError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            RefillError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RefillError::SinkUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RefillError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the refill pipeline.
pub type Result<T> = std::result::Result<T, RefillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(!RefillError::InvalidEvent("empty".into()).is_retryable());
        assert!(RefillError::StoreUnavailable("down".into()).is_retryable());
        assert!(RefillError::SinkUnavailable("down".into()).is_retryable());
        assert!(RefillError::Timeout("lookup".into()).is_retryable());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RefillError::InvalidEvent("x".into()), StatusCode::BAD_REQUEST),
            (
                RefillError::StoreUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RefillError::SinkUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (RefillError::Timeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
