//! Request store subsystem.
//!
//! # Data Flow
//! ```text
//! POST /echo handler
//!     → RequestStore::append (write lock, single insert)
//!
//! GET /echo handler
//!     → RequestStore::list (read lock, full scan newest-first)
//! ```
//!
//! # Design Decisions
//! - One store instance per process, constructed in main and injected as
//!   `Arc<dyn RequestStore>` — no ambient singleton
//! - Readers-writer lock scoped to the store instance, nothing wider
//! - Append-only: no update or delete operation exists
//! - Empty history is `Ok(vec![])`, never a distinguished error
//! - A stored record that cannot be decoded fails the whole listing;
//!   corruption is never silently skipped

pub mod memory;
pub mod sqlite;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{StoreBackend, StoreConfig};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Request headers as recorded: canonical name → values in received order.
pub type RecordedHeaders = HashMap<String, Vec<String>>;

/// One persisted record of a received HTTP request.
///
/// Records are immutable once created. `id` is assigned at insertion and
/// exists for stable ordering; callers must not attach meaning to its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub id: i64,
    /// Wall-clock time captured when the request body was fully read.
    pub timestamp: DateTime<Utc>,
    /// Raw request body as text. No schema is imposed on its contents.
    pub data: String,
    pub headers: RecordedHeaders,
}

/// Error type for store operations.
///
/// Every variant is an underlying storage or codec failure; client input
/// never reaches the store in an invalid form. Errors propagate to the
/// handler, which maps them to 500 — no retries anywhere.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("header serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored row that cannot be decoded back into a `RecordedRequest`.
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The collection of recorded requests and their concurrency-safe access.
///
/// Two interchangeable backends implement this: [`SqliteStore`] (durable)
/// and [`MemoryStore`] (ephemeral). Both serialize access with a single
/// readers-writer lock: `append` is exclusive, `list` is shared.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Record one request with the current timestamp and the next sequence
    /// id. The record is visible to every `list` call that starts after
    /// this returns `Ok`.
    async fn append(&self, data: String, headers: RecordedHeaders) -> Result<(), StoreError>;

    /// All recorded requests, newest first. Reflects every `append` that
    /// completed before this call began.
    async fn list(&self) -> Result<Vec<RecordedRequest>, StoreError>;
}

/// Construct the backend selected by configuration.
///
/// Fallible only for the durable backend: opening the database or creating
/// the schema can fail, and that failure is fatal at startup.
pub fn open(config: &StoreConfig) -> Result<Arc<dyn RequestStore>, StoreError> {
    match config.backend {
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::open(&config.db_path)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
