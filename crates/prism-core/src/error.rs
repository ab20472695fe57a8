//! Error types for the Prism application.
//!
//! Every operation exposed by the application layer fails with exactly one of
//! the variants below. Provider- and store-specific errors are normalized into
//! this taxonomy at the application boundary; no raw collaborator error type
//! crosses it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Prism application.
///
/// The display strings are the user-facing messages; variants that wrap a
/// `String` carry the underlying collaborator message for logging and
/// diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrismError {
    /// Credential mismatch during password sign-in. Deliberately does not
    /// distinguish wrong-email from wrong-password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-up attempted with an email the provider already knows.
    #[error("An account with this email already exists")]
    DuplicateAccount,

    /// Profile provisioning failed after the identity was created. The
    /// just-created session has been signed out by compensation.
    #[error("Failed to create user profile")]
    ProfileProvisioningFailed,

    /// A federated sign-in flow could not be initiated.
    #[error("Failed to sign in with provider")]
    FederatedSignInFailed,

    /// The operation requires an authenticated session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The submitted question was empty after trimming.
    #[error("Question must not be empty")]
    BlankQuestion,

    /// The answer generation service failed.
    #[error("Answer generation failed: {0}")]
    GenerationFailed(String),

    /// The visualization record could not be persisted.
    #[error("Failed to save visualization: {0}")]
    PersistenceFailed(String),

    /// The history listing could not be refreshed. This is the sole non-fatal
    /// kind; it accompanies an otherwise-successful pipeline result.
    #[error("Failed to refresh history: {0}")]
    HistoryRefreshFailed(String),

    /// Pass-through for anything not matching a known collaborator error
    /// shape.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PrismError {
    /// Creates a GenerationFailed error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed(message.into())
    }

    /// Creates a PersistenceFailed error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceFailed(message.into())
    }

    /// Creates a HistoryRefreshFailed error
    pub fn history_refresh(message: impl Into<String>) -> Self {
        Self::HistoryRefreshFailed(message.into())
    }

    /// Creates an Unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Check if this is an InvalidCredentials error
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Check if this is a NotAuthenticated error
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if this is a HistoryRefreshFailed error
    pub fn is_history_refresh_failed(&self) -> bool {
        matches!(self, Self::HistoryRefreshFailed(_))
    }

    /// Whether this error aborts the operation that produced it.
    ///
    /// Every kind is fatal except `HistoryRefreshFailed`, which is reported
    /// alongside an otherwise-successful result.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::HistoryRefreshFailed(_))
    }
}

/// Conversion from String (for error messages)
impl From<String> for PrismError {
    fn from(err: String) -> Self {
        Self::Unexpected(err)
    }
}

/// A type alias for `Result<T, PrismError>`.
pub type Result<T> = std::result::Result<T, PrismError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_user_facing_messages() {
        assert_eq!(
            PrismError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            PrismError::ProfileProvisioningFailed.to_string(),
            "Failed to create user profile"
        );
    }

    #[test]
    fn test_only_history_refresh_is_non_fatal() {
        assert!(!PrismError::history_refresh("timeout").is_fatal());
        assert!(PrismError::InvalidCredentials.is_fatal());
        assert!(PrismError::unexpected("boom").is_fatal());
    }
}
