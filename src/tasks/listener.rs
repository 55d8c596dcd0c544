//! Expiration Listener Task
//!
//! Background task that pulls expiration events from a notification source
//! and runs one refill invocation per event.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::adapters::NotificationSource;
use crate::refill::RefillWorker;

/// Spawns a background task that dispatches every event from `source` to `worker`.
///
/// Each event runs on its own task; at most `max_in_flight` run at once, and
/// the listener stops pulling from the source while the limit is reached.
/// Invocation failures are logged here and dropped; redelivery by the source
/// is the only retry.
///
/// # Arguments
/// * `source` - Producer of expiration events
/// * `worker` - Refill worker shared by all invocations
/// * `max_in_flight` - Upper bound on concurrent invocations (minimum 1)
///
/// # Returns
/// A JoinHandle that completes once the source closes and every in-flight
/// invocation finished. Abort it to stop listening during shutdown.
///
/// # Example
/// ```ignore
/// let (sender, source) = ChannelSource::new(16);
/// let handle = spawn_listener_task(Box::new(source), worker, 8);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_listener_task(
    mut source: Box<dyn NotificationSource>,
    worker: RefillWorker,
    max_in_flight: usize,
) -> JoinHandle<()> {
    let max_in_flight = permit_limit(max_in_flight);
    let permits = Arc::new(Semaphore::new(max_in_flight as usize));

    tokio::spawn(async move {
        info!(
            "Starting expiration listener with up to {} concurrent refills",
            max_in_flight
        );

        while let Some(event) = source.next_event().await {
            let permit = match permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                // Only happens if the semaphore is closed, which nothing does
                Err(_) => break,
            };

            let worker = worker.clone();
            tokio::spawn(async move {
                let key = event.key.clone();
                match worker.process(event).await {
                    Ok(outcome) => debug!(
                        "Refill of '{}' complete (found: {})",
                        outcome.key(),
                        outcome.is_found()
                    ),
                    Err(err) if err.is_retryable() => {
                        error!(kind = err.kind(), key = %key, "Refill failed: {}", err)
                    }
                    // Rejected events are already logged by the worker
                    Err(_) => {}
                }
                drop(permit);
            });
        }

        // Wait for in-flight refills before reporting the listener as finished
        let _ = permits.acquire_many(max_in_flight).await;
        warn!("Notification source closed, listener stopped");
    })
}

/// Clamps a requested concurrency to what the semaphore can hand out at once.
fn permit_limit(requested: usize) -> u32 {
    let capped = requested.clamp(1, Semaphore::MAX_PERMITS.min(u32::MAX as usize));
    u32::try_from(capped).unwrap_or(u32::MAX)
}
