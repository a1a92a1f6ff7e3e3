//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: `/echo` method dispatch plus static fallback
//! - Wire up middleware (request ID, tracing)
//! - Serve on a bound listener until a shutdown signal arrives
//! - Bound the drain of in-flight requests with the configured grace period
//!
//! # Design Decisions
//! - The store is injected as `Arc<dyn RequestStore>`; the server never
//!   knows which backend it is talking to
//! - No per-request timeout layer: the only timeout in the system is the
//!   shutdown grace period
//! - Exceeding the grace period is an error the caller sees, not a hang

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, oneshot};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::store::RequestStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RequestStore>,
}

/// Error type for the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),

    /// In-flight requests outlived the shutdown grace period. The process
    /// terminates anyway; this is reported, never a silent hang.
    #[error("in-flight requests did not finish within {0:?}")]
    GraceExceeded(Duration),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// HTTP server for the echo service.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and store.
    pub fn new(config: AppConfig, store: Arc<dyn RequestStore>) -> Self {
        let router = Self::build_router(&config, AppState { store });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/echo` carries the recording endpoint; GET and POST are routed to
    /// their handlers and every other method gets the method router's 405.
    /// Everything else falls back to the static asset tree with standard
    /// file-server semantics (404 for missing files, inferred content
    /// types).
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route(
                "/echo",
                get(handlers::list_requests).post(handlers::record_request),
            )
            .fallback_service(ServeDir::new(&config.assets.dir))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server on the given listener until `shutdown_rx` fires,
    /// then stop accepting and give in-flight requests the configured
    /// grace period to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), ServeError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let grace = self.config.shutdown.grace_period();
        let (drain_tx, drain_rx) = oneshot::channel::<()>();

        let router = self.router;
        let mut serve_task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = drain_rx.await;
                })
                .await
        });

        tokio::select! {
            // Accept loop ended on its own: only failure gets here.
            result = &mut serve_task => {
                return result?.map_err(ServeError::Io);
            }
            // A closed channel counts as a shutdown request too.
            _ = shutdown_rx.recv() => {
                tracing::info!("shutdown signal received, draining in-flight requests");
            }
        }

        let _ = drain_tx.send(());
        match tokio::time::timeout(grace, &mut serve_task).await {
            Ok(result) => {
                result??;
                tracing::info!("HTTP server stopped");
                Ok(())
            }
            Err(_) => {
                serve_task.abort();
                tracing::error!(
                    grace_secs = grace.as_secs(),
                    "in-flight requests did not finish within the grace period"
                );
                Err(ServeError::GraceExceeded(grace))
            }
        }
    }
}
