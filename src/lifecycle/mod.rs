//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger shutdown coordinator
//!
//! Shutdown (shutdown.rs):
//!     Coordinator fires → serve loop stops accepting
//!     → in-flight requests drain within the grace period → exit
//! ```
//!
//! # Design Decisions
//! - Shutdown has a bounded grace period: exceeding it is reported as an
//!   error and the process terminates anyway
//! - Operations already past routing are never interrupted; only the
//!   accept loop stops

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
