//! Durable SQLite store backend.
//!
//! # Responsibilities
//! - Open the file-backed database and create the schema idempotently
//! - Insert one row per recorded request under the write lock
//! - Scan all rows newest-first under the read lock
//!
//! # Design Decisions
//! - rusqlite is synchronous, so every operation runs on `spawn_blocking`
//!   with a short-lived connection; WAL journal and a busy timeout keep
//!   concurrent readers off the writer's back
//! - The readers-writer lock is held across the blocking call, so the lock
//!   discipline is identical to the in-memory backend
//! - Rows that fail to decode abort the listing with `StoreError::Corrupt`

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use tokio::sync::RwLock;

use super::{RecordedHeaders, RecordedRequest, RequestStore, StoreError};

/// Durable request store over a single `requests` table.
pub struct SqliteStore {
    db_path: PathBuf,
    /// Serializes appends against each other and against listings. The
    /// database itself would also cope, but the contract is the lock's.
    lock: RwLock<()>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema
    /// exists. Any failure here is a startup failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = open_connection(&db_path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp DATETIME NOT NULL,
                data TEXT NOT NULL,
                headers TEXT NOT NULL
            );",
        )?;

        Ok(Self {
            db_path,
            lock: RwLock::new(()),
        })
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl RequestStore for SqliteStore {
    async fn append(&self, data: String, headers: RecordedHeaders) -> Result<(), StoreError> {
        let headers_json = serde_json::to_string(&headers)?;
        let timestamp = Utc::now();

        let _guard = self.lock.write().await;
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            insert_blocking(&db_path, timestamp, &data, &headers_json)
        })
        .await?
    }

    async fn list(&self) -> Result<Vec<RecordedRequest>, StoreError> {
        let _guard = self.lock.read().await;
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || list_blocking(&db_path)).await?
    }
}

fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_secs(5))?;

    Ok(conn)
}

fn insert_blocking(
    path: &Path,
    timestamp: DateTime<Utc>,
    data: &str,
    headers_json: &str,
) -> Result<(), StoreError> {
    let conn = open_connection(path)?;
    conn.execute(
        "INSERT INTO requests (timestamp, data, headers) VALUES (?1, ?2, ?3)",
        params![timestamp.to_rfc3339(), data, headers_json],
    )?;
    Ok(())
}

fn list_blocking(path: &Path) -> Result<Vec<RecordedRequest>, StoreError> {
    let conn = open_connection(path)?;
    let mut stmt =
        conn.prepare("SELECT id, timestamp, data, headers FROM requests ORDER BY id DESC")?;

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let timestamp: String = row.get(1)?;
        let data: String = row.get(2)?;
        let headers_json: String = row.get(3)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| StoreError::Corrupt {
                id,
                reason: format!("bad timestamp: {e}"),
            })?
            .with_timezone(&Utc);

        let headers: RecordedHeaders =
            serde_json::from_str(&headers_json).map_err(|e| StoreError::Corrupt {
                id,
                reason: format!("bad headers: {e}"),
            })?;

        records.push(RecordedRequest {
            id,
            timestamp,
            data,
            headers,
        });
    }

    Ok(records)
}
