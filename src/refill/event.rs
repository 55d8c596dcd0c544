//! Expiration Event Module
//!
//! A single key expiration notification as delivered by a notification source.

use serde::{Deserialize, Serialize};

use crate::error::{RefillError, Result};

// == Expiration Event ==
/// Notification that a cache key expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationEvent {
    /// Channel the notification arrived on
    pub channel: String,
    /// The expired cache key
    pub key: String,
}

impl ExpirationEvent {
    // == Constructor ==
    /// Creates an event. No validation happens here; see [`ExpirationEvent::validate`].
    pub fn new(channel: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            key: key.into(),
        }
    }

    // == Validate ==
    /// Rejects events that cannot be joined against the record store.
    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(RefillError::InvalidEvent(format!(
                "empty key on channel '{}'",
                self.channel
            )));
        }
        Ok(())
    }
}
