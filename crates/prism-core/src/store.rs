//! Shared error type for the keyed record stores.
//!
//! Both the profile store and the visualization record store report failures
//! through `StoreError`. The application layer normalizes these into
//! `PrismError` before they reach any caller.

use thiserror::Error;

/// Errors produced by a keyed record store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A record with the same key already exists.
    #[error("duplicate key: {0}")]
    Conflict(String),

    /// The addressed record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The store could not be reached or the operation failed mid-flight.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
