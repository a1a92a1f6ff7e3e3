//! Ephemeral in-memory store backend.
//!
//! Holds the request log in a `Vec` behind a `tokio::sync::RwLock`. History
//! lives for the process lifetime only; nothing touches disk. Useful for
//! local runs and tests, selected with `ECHO_STORE=memory`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{RecordedHeaders, RecordedRequest, RequestStore, StoreError};

/// Sequence counter and entries share one lock so an append assigns its id
/// and becomes visible atomically.
struct MemoryLog {
    next_id: i64,
    entries: Vec<RecordedRequest>,
}

/// In-memory request store.
pub struct MemoryStore {
    log: RwLock<MemoryLog>,
}

impl MemoryStore {
    /// Create an empty store with the sequence counter at 1.
    pub fn new() -> Self {
        Self {
            log: RwLock::new(MemoryLog {
                next_id: 1,
                entries: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn append(&self, data: String, headers: RecordedHeaders) -> Result<(), StoreError> {
        let mut log = self.log.write().await;
        let id = log.next_id;
        log.next_id += 1;
        log.entries.push(RecordedRequest {
            id,
            timestamp: Utc::now(),
            data,
            headers,
        });
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RecordedRequest>, StoreError> {
        let log = self.log.read().await;
        Ok(log.entries.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> RecordedHeaders {
        let mut map = HashMap::new();
        for (name, value) in pairs {
            map.entry((*name).to_string())
                .or_insert_with(Vec::new)
                .push((*value).to_string());
        }
        map
    }

    #[tokio::test]
    async fn empty_store_lists_empty() {
        let store = MemoryStore::new();
        let records = store.list().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn append_then_list_round_trips() {
        let store = MemoryStore::new();
        store
            .append(
                "test data".into(),
                headers(&[("Content-Type", "text/plain")]),
            )
            .await
            .unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "test data");
        assert_eq!(
            records[0].headers.get("Content-Type"),
            Some(&vec!["text/plain".to_string()])
        );
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .append(format!("payload {i}"), HashMap::new())
                .await
                .unwrap();
        }

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].data, "payload 4");
        assert_eq!(records[4].data, "payload 0");
        // Sequence ids strictly decrease in list order
        for pair in records.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
    }

    #[tokio::test]
    async fn concurrent_appends_lose_nothing() {
        let store = Arc::new(MemoryStore::new());

        let mut tasks = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.append(format!("writer {i}"), HashMap::new()).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 10);

        let mut payloads: Vec<_> = records.iter().map(|r| r.data.clone()).collect();
        payloads.sort();
        payloads.dedup();
        assert_eq!(payloads.len(), 10, "duplicate or lost writes");

        let mut ids: Vec<_> = records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10, "duplicate sequence ids");
    }

    #[tokio::test]
    async fn multi_value_headers_survive() {
        let store = MemoryStore::new();
        store
            .append(
                String::new(),
                headers(&[("Accept", "text/html"), ("Accept", "application/json")]),
            )
            .await
            .unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(
            records[0].headers.get("Accept"),
            Some(&vec!["text/html".to_string(), "application/json".to_string()])
        );
    }
}
