//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → /echo: handlers.rs (GET → store.list, POST → store.append,
//!       anything else → 405)
//!     → every other path: tower-http ServeDir over the ui/ bundle
//! ```

pub mod handlers;
pub mod server;

pub use server::{HttpServer, ServeError};
