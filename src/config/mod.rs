//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (HTTP_PORT, ECHO_STORE)
//!     → env.rs (read & parse)
//!     → AppConfig (immutable)
//!     → shared with the HTTP server and store at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults so an empty environment just works
//! - A variable that is set but unparsable is a fatal startup error;
//!   silent fallback would hide deployment mistakes

pub mod env;
pub mod schema;

pub use env::ConfigError;
pub use schema::AppConfig;
pub use schema::ServerConfig;
pub use schema::StoreBackend;
pub use schema::StoreConfig;
