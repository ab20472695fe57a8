//! In-memory visualization record store.

use std::sync::Mutex;

use async_trait::async_trait;

use prism_core::store::StoreError;
use prism_core::visualization::{
    NewVisualizationRecord, VisualizationRecord, VisualizationStore,
};

/// In-memory record store for development wiring and tests.
///
/// Assigns ids and timestamps at insert time and lists owner records newest
/// first, like the real store would.
#[derive(Default)]
pub struct InMemoryVisualizationStore {
    records: Mutex<Vec<VisualizationRecord>>,
}

impl InMemoryVisualizationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisualizationStore for InMemoryVisualizationStore {
    async fn insert(
        &self,
        new: NewVisualizationRecord,
    ) -> Result<VisualizationRecord, StoreError> {
        let record = VisualizationRecord::create(new);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<VisualizationRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<VisualizationRecord>, StoreError> {
        let mut records: Vec<VisualizationRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
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
                geometry: Geometry::Torus,
                position: [0.0, 0.0, 0.0],
                rotation: [0.0, 0.0, 0.0],
                scale: [1.0, 1.0, 1.0],
                color: None,
            },
        }
    }

    #[tokio::test]
    async fn test_list_by_owner_is_newest_first() {
        let store = InMemoryVisualizationStore::new();
        for question in ["first", "second", "third"] {
            store.insert(new_record("owner", question)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let records = store.list_by_owner("owner").await.unwrap();

        let questions: Vec<&str> = records.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_list_by_owner_filters_other_owners() {
        let store = InMemoryVisualizationStore::new();
        store.insert(new_record("a", "mine")).await.unwrap();
        store.insert(new_record("b", "theirs")).await.unwrap();

        let records = store.list_by_owner("a").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "mine");
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = InMemoryVisualizationStore::new();
        let inserted = store.insert(new_record("a", "q")).await.unwrap();

        let found = store.find_by_id(&inserted.id).await.unwrap();
        assert_eq!(found, Some(inserted));

        let missing = store.find_by_id("no-such-id").await.unwrap();
        assert!(missing.is_none());
    }
}
