//! Persisted archive of completed runs.
//!
//! The whole collection is the unit of persistence: every append and
//! remove rewrites the serialized list under one key. An unreadable blob
//! at load time means an empty archive, never a user-facing error.

use super::KeyValueStore;
use crate::pipeline::session::{SessionInputs, SessionResults};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

/// Store key holding the serialized record collection.
pub const HISTORY_KEY: &str = "history";

/// Unique identifier for an archived run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new() -> Self {
        Self(format!("run-{}", Uuid::new_v4()))
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of one completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub inputs: SessionInputs,
    pub results: SessionResults,
}

impl HistoryRecord {
    pub fn new(inputs: SessionInputs, results: SessionResults) -> Self {
        Self {
            id: RecordId::new(),
            title: inputs.title.clone(),
            created_at: Utc::now(),
            inputs,
            results,
        }
    }
}

/// Persisted collection of past runs, newest first.
pub struct HistoryArchive {
    records: Mutex<Vec<HistoryRecord>>,
    store: Arc<dyn KeyValueStore>,
}

impl HistoryArchive {
    /// Loads the archive from the store. A corrupt or unreadable blob is
    /// treated as an empty archive.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let records = match store.get(HISTORY_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(records) => records,
                Err(err) => {
                    warn!("discarding unreadable history: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("failed to read history: {err:#}");
                Vec::new()
            }
        };
        Self {
            records: Mutex::new(records),
            store,
        }
    }

    /// Inserts at the front and persists the whole collection. Identical
    /// inputs produce distinct records; there is no deduplication.
    pub async fn append(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(0, record);
        self.persist(&records).await
    }

    /// Removes the matching record; no-op if absent.
    pub async fn remove(&self, id: &RecordId) -> Result<()> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| &record.id != id);
        if records.len() == before {
            return Ok(());
        }
        self.persist(&records).await
    }

    /// All records, newest first.
    pub async fn list(&self) -> Vec<HistoryRecord> {
        self.records.lock().await.clone()
    }

    pub async fn get(&self, id: &RecordId) -> Option<HistoryRecord> {
        self.records
            .lock()
            .await
            .iter()
            .find(|record| &record.id == id)
            .cloned()
    }

    async fn persist(&self, records: &[HistoryRecord]) -> Result<()> {
        let blob = serde_json::to_string_pretty(records)?;
        self.store.put(HISTORY_KEY, &blob).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn record(title: &str) -> HistoryRecord {
        let mut results = SessionResults::default();
        results.insert("script", "text".to_string());
        HistoryRecord::new(SessionInputs::new(title, "brief"), results)
    }

    #[tokio::test]
    async fn test_append_is_newest_first_and_persisted() {
        let store = Arc::new(MemoryStore::new());
        let archive = HistoryArchive::load(Arc::clone(&store) as Arc<dyn KeyValueStore>).await;

        archive.append(record("first")).await.unwrap();
        archive.append(record("second")).await.unwrap();

        let records = archive.list().await;
        assert_eq!(records[0].title, "second");
        assert_eq!(records[1].title, "first");

        // A reload sees exactly what was persisted.
        let reloaded = HistoryArchive::load(store).await;
        let records = reloaded.list().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "second");
    }

    #[tokio::test]
    async fn test_remove_deletes_only_the_matching_record() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let archive = HistoryArchive::load(store).await;

        archive.append(record("keep")).await.unwrap();
        archive.append(record("drop")).await.unwrap();
        let drop_id = archive.list().await[0].id.clone();

        archive.remove(&drop_id).await.unwrap();
        let records = archive.list().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "keep");

        // Removing an absent id is a no-op.
        archive.remove(&drop_id).await.unwrap();
        assert_eq!(archive.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_treated_as_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.put(HISTORY_KEY, "not json {{{").await.unwrap();

        let archive = HistoryArchive::load(Arc::clone(&store)).await;
        assert!(archive.list().await.is_empty());

        // The archive remains usable after discarding the corrupt blob.
        archive.append(record("fresh")).await.unwrap();
        assert_eq!(archive.list().await.len(), 1);
    }

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }
}
