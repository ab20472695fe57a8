//! Core domain crate for Prism.
//!
//! This crate defines the domain models, the port traits for the external
//! collaborators (identity provider, profile store, answer generation service,
//! visualization record store), and the shared error taxonomy. It contains no
//! I/O of its own; concrete adapters live in `prism-infrastructure` and the
//! coordination logic lives in `prism-application`.

pub mod error;
pub mod generation;
pub mod identity;
pub mod profile;
pub mod store;
pub mod visualization;

// Re-export common error type
pub use error::PrismError;
