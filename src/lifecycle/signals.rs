//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT and SIGTERM (Tokio's async-safe signal
//!   support)
//! - Translate the first signal into a shutdown trigger
//!
//! Handler installation failures panic: without signal delivery the
//! process could never shut down cleanly, so starting up would be a lie.

use crate::lifecycle::Shutdown;

/// Wait for a termination signal, then trigger the shutdown coordinator.
/// Spawned once at startup; returns after triggering.
pub async fn listen(shutdown: Shutdown) {
    let signal = wait_for_signal().await;
    tracing::info!(%signal, "termination signal received, initiating graceful shutdown");
    shutdown.trigger();
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("failed to install Ctrl+C handler");
            "SIGINT"
        }
        _ = sigterm.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    "SIGINT"
}
