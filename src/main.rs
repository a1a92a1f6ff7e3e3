//! Binary entrypoint.
//!
//! Startup is ordered and fail-fast: configuration, then storage, then the
//! listener; any failure aborts with a fatal log and a nonzero exit, with
//! no partial state left running. Clean graceful shutdown exits zero.

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use echohttp::config::AppConfig;
use echohttp::http::HttpServer;
use echohttp::lifecycle::{signals, Shutdown};
use echohttp::store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echohttp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "echohttp starting");

    let config = AppConfig::from_env()?;
    tracing::info!(
        bind_address = %config.server.bind_address(),
        store_backend = ?config.store.backend,
        assets_dir = %config.assets.dir.display(),
        grace_secs = config.shutdown.grace_secs,
        "configuration loaded"
    );

    // Opening the database creates the schema idempotently; failure here
    // is fatal before the listener ever binds.
    let store = store::open(&config.store)?;

    let listener = TcpListener::bind(config.server.bind_address()).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
