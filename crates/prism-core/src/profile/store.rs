//! Profile store port.
//!
//! Defines the interface for profile persistence operations.

use async_trait::async_trait;

use super::model::{Profile, ProfileUpdate};
use crate::store::StoreError;

/// An abstract keyed store for profile records.
///
/// This trait decouples the provisioning logic from the specific storage
/// mechanism (a remote table, a local file, an in-memory map).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Finds a profile by its identity id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: profile found
    /// - `Ok(None)`: no profile for this id
    /// - `Err(_)`: error occurred during retrieval
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// Inserts a new profile row for the given identity id.
    ///
    /// # Returns
    ///
    /// - `Ok(Profile)`: the inserted row
    /// - `Err(StoreError::Conflict(_))`: a profile with this id already exists
    /// - `Err(_)`: error occurred during insertion
    async fn insert(&self, id: &str, username: &str) -> Result<Profile, StoreError>;

    /// Applies a partial update to an existing profile.
    ///
    /// # Returns
    ///
    /// - `Ok(Profile)`: the updated row
    /// - `Err(StoreError::NotFound(_))`: no profile for this id
    /// - `Err(_)`: error occurred during the update
    async fn update(&self, id: &str, update: ProfileUpdate) -> Result<Profile, StoreError>;
}
