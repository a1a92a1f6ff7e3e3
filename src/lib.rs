//! HTTP request-echoing and recording service.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────┐
//!                    │                 echohttp                  │
//!                    │                                           │
//!   POST /echo ──────┼─▶ http::handlers ──▶ store (append, W)   │
//!   GET  /echo ──────┼─▶ http::handlers ──▶ store (list, R)     │
//!   other paths ─────┼─▶ tower-http ServeDir over ui/           │
//!                    │                                           │
//!                    │  store: one RwLock, two backends          │
//!                    │    sqlite (durable) | memory (ephemeral)  │
//!                    │                                           │
//!                    │  lifecycle: SIGINT/SIGTERM → drain with   │
//!                    │  bounded grace period → exit              │
//!                    └──────────────────────────────────────────┘
//! ```
//!
//! Every received POST is recorded (timestamp, body, headers) and the full
//! history is served back newest-first as JSON. That is the whole job.

// Core subsystems
pub mod config;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{RecordedRequest, RequestStore};
