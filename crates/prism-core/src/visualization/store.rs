//! Visualization record store port.
//!
//! Defines the interface for the append-mostly record store behind the
//! request pipeline.

use async_trait::async_trait;

use super::model::{NewVisualizationRecord, VisualizationRecord};
use crate::store::StoreError;

/// An abstract keyed, append-mostly store for visualization records.
///
/// Records are inserted once, read by id, and listed by owner; this core
/// never updates or deletes them.
#[async_trait]
pub trait VisualizationStore: Send + Sync {
    /// Inserts a new record, assigning its id and creation timestamp.
    async fn insert(&self, new: NewVisualizationRecord)
    -> Result<VisualizationRecord, StoreError>;

    /// Finds a record by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(VisualizationRecord))`: record found
    /// - `Ok(None)`: no record with this id
    /// - `Err(_)`: error occurred during retrieval
    async fn find_by_id(&self, id: &str) -> Result<Option<VisualizationRecord>, StoreError>;

    /// Lists every record owned by the given identity, newest first.
    async fn list_by_owner(&self, owner_id: &str)
    -> Result<Vec<VisualizationRecord>, StoreError>;
}
