//! Directory-backed visualization record store.
//!
//! One TOML file per record under a base directory:
//!
//! ```text
//! base_dir/
//! ├── 6f1a1c9e-....toml
//! └── 8c2d0b11-....toml
//! ```
//!
//! Writes go through a temporary file followed by a rename so readers never
//! observe a partially written record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use prism_core::store::StoreError;
use prism_core::visualization::{
    NewVisualizationRecord, VisualizationRecord, VisualizationStore,
};

/// Visualization record store persisted as a directory of TOML files.
///
/// Record ids are uuids, so they are used directly as file names.
pub struct DirVisualizationStore {
    dir: PathBuf,
}

impl DirVisualizationStore {
    /// Creates a store rooted at the given directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::Unavailable(format!("failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.toml", id))
    }

    async fn write_record(&self, record: &VisualizationRecord) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(record).map_err(|e| {
            StoreError::Unavailable(format!("failed to serialize record {}: {}", record.id, e))
        })?;

        let path = self.record_path(&record.id);
        let tmp_path = self.dir.join(format!("{}.toml.tmp", record.id));
        fs::write(&tmp_path, content).await.map_err(|e| {
            StoreError::Unavailable(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &path).await.map_err(|e| {
            StoreError::Unavailable(format!("failed to rename into {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl VisualizationStore for DirVisualizationStore {
    async fn insert(
        &self,
        new: NewVisualizationRecord,
    ) -> Result<VisualizationRecord, StoreError> {
        let record = VisualizationRecord::create(new);
        self.write_record(&record).await?;
        tracing::debug!("[DirVisualizationStore] wrote record {}", record.id);
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VisualizationRecord>, StoreError> {
        let path = self.record_path(id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let record = toml::from_str(&content).map_err(|e| {
            StoreError::Unavailable(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(record))
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<VisualizationRecord>, StoreError> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            StoreError::Unavailable(format!("failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StoreError::Unavailable(format!("failed to list {}: {}", self.dir.display(), e))
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(
                        "[DirVisualizationStore] skipping unreadable {}: {}",
                        path.display(),
                        e
                    );
                    continue;
                }
            };
            let record: VisualizationRecord = match toml::from_str(&content) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        "[DirVisualizationStore] skipping unparseable {}: {}",
                        path.display(),
                        e
                    );
                    continue;
                }
            };

            if record.owner_id == owner_id {
                records.push(record);
            }
        }

        records.sort_by(VisualizationRecord::newer_first);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::visualization::{Geometry, VisualizationDescriptor};
    use std::time::Duration;

    fn new_record(owner_id: &str, question: &str) -> NewVisualizationRecord {
        NewVisualizationRecord {
            owner_id: owner_id.to_string(),
            question: question.to_string(),
            answer: "answer".to_string(),
            descriptor: VisualizationDescriptor {
                geometry: Geometry::Cylinder,
                position: [0.0, 0.0, 0.0],
                rotation: [45.0, 90.0, 135.0],
                scale: [1.0, 1.0, 1.0],
                color: Some("#059669".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn test_insert_then_find_round_trips_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirVisualizationStore::new(dir.path()).await.unwrap();

        let inserted = store.insert(new_record("owner", "q")).await.unwrap();
        let found = store.find_by_id(&inserted.id).await.unwrap();

        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn test_find_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirVisualizationStore::new(dir.path()).await.unwrap();

        assert!(store.find_by_id("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_is_newest_first_and_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirVisualizationStore::new(dir.path()).await.unwrap();

        store.insert(new_record("a", "first")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.insert(new_record("b", "theirs")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.insert(new_record("a", "second")).await.unwrap();

        let records = store.list_by_owner("a").await.unwrap();

        let questions: Vec<&str> = records.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_records_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let inserted = {
            let store = DirVisualizationStore::new(dir.path()).await.unwrap();
            store.insert(new_record("owner", "persisted")).await.unwrap()
        };

        let reopened = DirVisualizationStore::new(dir.path()).await.unwrap();
        let records = reopened.list_by_owner("owner").await.unwrap();

        assert_eq!(records, vec![inserted]);
    }

    #[tokio::test]
    async fn test_listing_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirVisualizationStore::new(dir.path()).await.unwrap();
        store.insert(new_record("owner", "good")).await.unwrap();
        std::fs::write(dir.path().join("corrupt.toml"), "not [ valid toml").unwrap();

        let records = store.list_by_owner("owner").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "good");
    }
}
