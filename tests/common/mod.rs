//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use echohttp::config::AppConfig;
use echohttp::http::{HttpServer, ServeError};
use echohttp::lifecycle::Shutdown;
use echohttp::store::RequestStore;

/// A running server on an ephemeral port, plus the handles to stop it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServeError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger graceful shutdown and wait for the serve loop to finish.
    pub async fn stop(self) -> Result<(), ServeError> {
        self.shutdown.trigger();
        self.handle.await.expect("server task panicked")
    }
}

/// Start the real server with the given store on 127.0.0.1:0.
pub async fn start_server(store: Arc<dyn RequestStore>) -> TestServer {
    start_server_with_config(store, AppConfig::default()).await
}

pub async fn start_server_with_config(
    store: Arc<dyn RequestStore>,
    config: AppConfig,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    let server = HttpServer::new(config, store);
    let handle = tokio::spawn(async move { server.run(listener, shutdown_rx).await });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}
