//! In-memory profile store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use prism_core::profile::{Profile, ProfileStore, ProfileUpdate};
use prism_core::store::StoreError;

/// `Mutex<HashMap>`-backed profile store for development wiring and tests.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, id: &str, username: &str) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(id) {
            return Err(StoreError::Conflict(id.to_string()));
        }
        let profile = Profile::new(id, username);
        profiles.insert(id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn update(&self, id: &str, update: ProfileUpdate) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        update.apply(profile);
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryProfileStore::new();

        let inserted = store.insert("id-1", "alice").await.unwrap();
        let found = store.find_by_id("id-1").await.unwrap().unwrap();

        assert_eq!(inserted, found);
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn test_insert_conflicts_on_existing_id() {
        let store = InMemoryProfileStore::new();
        store.insert("id-1", "alice").await.unwrap();

        let err = store.insert("id-1", "impostor").await.unwrap_err();

        assert_eq!(err, StoreError::Conflict("id-1".to_string()));
    }

    #[tokio::test]
    async fn test_update_missing_profile_is_not_found() {
        let store = InMemoryProfileStore::new();

        let err = store
            .update("ghost", ProfileUpdate::username("x"))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_update_changes_username() {
        let store = InMemoryProfileStore::new();
        store.insert("id-1", "before").await.unwrap();

        let updated = store
            .update("id-1", ProfileUpdate::username("after"))
            .await
            .unwrap();

        assert_eq!(updated.username, "after");
    }
}
