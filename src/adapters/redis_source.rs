//! Redis Notification Source
//!
//! Subscribes to a keyevent channel and turns each message into an
//! [`ExpirationEvent`].

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use tracing::{error, info, warn};

use super::NotificationSource;
use crate::refill::ExpirationEvent;

/// Notification source fed by a Redis pub/sub subscription.
pub struct RedisNotificationSource {
    messages: BoxStream<'static, redis::Msg>,
}

impl RedisNotificationSource {
    /// Opens a dedicated pub/sub connection and subscribes to `channel`.
    pub async fn subscribe(client: &redis::Client, channel: &str) -> redis::RedisResult<Self> {
        let mut pubsub = client.get_async_pubsub().await?;
        pubsub.subscribe(channel).await?;
        info!("Subscribed to {}", channel);

        Ok(Self {
            messages: pubsub.into_on_message().boxed(),
        })
    }
}

#[async_trait]
impl NotificationSource for RedisNotificationSource {
    async fn next_event(&mut self) -> Option<ExpirationEvent> {
        loop {
            let Some(msg) = self.messages.next().await else {
                error!("Redis subscription stream ended");
                return None;
            };
            let channel = msg.get_channel_name().to_string();

            match msg.get_payload::<String>() {
                Ok(key) => return Some(ExpirationEvent::new(channel, key)),
                Err(e) => warn!("Skipping undecodable message on {}: {}", channel, e),
            }
        }
    }
}

/// Turns on expired-key events (`notify-keyspace-events Ex`) on the server.
///
/// Managed Redis offerings often reject `CONFIG`; callers decide whether that is fatal.
pub async fn enable_expiry_notifications(conn: &mut ConnectionManager) -> redis::RedisResult<()> {
    let _: () = redis::cmd("CONFIG")
        .arg("SET")
        .arg("notify-keyspace-events")
        .arg("Ex")
        .query_async(conn)
        .await?;
    info!("Enabled expired-key notifications");
    Ok(())
}
