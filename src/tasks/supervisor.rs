//! Process Supervisor
//!
//! Ties the HTTP server and the expiration listener together so that losing
//! the listener takes the process down instead of leaving it serving health
//! checks while nothing gets refilled.

use std::future::Future;

use anyhow::{anyhow, bail, Context};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Runs `server` until it finishes or the listener stops, whichever is first.
///
/// A server that finishes (graceful shutdown) aborts the listener and
/// returns its own result. A listener that ends on its own is an error: the
/// caller should exit non-zero so the process gets restarted.
pub async fn supervise<F>(server: F, mut listener: JoinHandle<()>) -> anyhow::Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = server => {
            listener.abort();
            info!("HTTP server stopped, expiration listener aborted");
            result.context("HTTP server error")
        }
        joined = &mut listener => {
            error!("Expiration listener stopped while the server was running");
            match joined {
                Ok(()) => bail!("notification source closed"),
                Err(e) => Err(anyhow!("expiration listener failed: {}", e)),
            }
        }
    }
}
