//! Cache Refill - Expiration-driven cache warming
//!
//! Runs the expiration listener alongside a small operational HTTP server.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_refill::adapters::{
    enable_expiry_notifications, HttpRecordStore, RedisCacheSink, RedisNotificationSource,
};
use cache_refill::api::{create_router, AppState};
use cache_refill::{spawn_listener_task, supervise, Config, RefillWorker};

/// Main entry point for the refill worker.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to Redis and, if asked, enable expiry notifications
/// 4. Build the record store client and the refill worker
/// 5. Subscribe to the expiration channel and start the listener
/// 6. Start the operational HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM, or exit with an error if
///    the expiration listener stops
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_refill=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cache refill worker");

    let config = Config::from_env();
    info!(
        "Configuration loaded: channel={}, collection={}, timeout={}ms, max_in_flight={}, port={}",
        config.expired_channel,
        config.record_collection,
        config.operation_timeout_ms,
        config.max_in_flight,
        config.server_port
    );

    let client = redis::Client::open(config.redis_url.as_str())
        .with_context(|| format!("invalid REDIS_URL '{}'", config.redis_url))?;

    let mut admin = client
        .get_connection_manager()
        .await
        .context("failed to connect to Redis")?;
    if config.configure_notifications {
        if let Err(e) = enable_expiry_notifications(&mut admin).await {
            warn!("Could not enable expiry notifications: {}", e);
        }
    }

    let sink = RedisCacheSink::new(admin);
    let store = HttpRecordStore::new(
        &config.record_store_url,
        &config.record_collection,
        config.operation_timeout(),
    )
    .context("failed to build record store client")?;
    info!("Record store at {}", store.records_url());

    let worker = RefillWorker::new(Arc::new(store), Arc::new(sink), config.operation_timeout());

    let source = RedisNotificationSource::subscribe(&client, &config.expired_channel)
        .await
        .with_context(|| format!("failed to subscribe to '{}'", config.expired_channel))?;
    let listener_handle = spawn_listener_task(Box::new(source), worker.clone(), config.max_in_flight);
    info!("Expiration listener started");

    let app = create_router(AppState::new(worker));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Exits with an error if the listener stops first, so the process gets restarted
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    supervise(server, listener_handle).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// Completing lets the server shut down gracefully; the supervisor then
/// aborts the listener.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
