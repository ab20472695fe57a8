//! Identity provider port.
//!
//! Defines the narrow interface to the external identity provider. The
//! provider is an opaque remote dependency; implementations live in
//! `prism-infrastructure` and in test doubles.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::event::SessionChange;
use super::model::{FederatedProvider, Identity, RedirectHandle, Session, SignUpAttributes};

/// Errors the identity provider can report.
///
/// `InvalidCredentials` and `AlreadyRegistered` are the two specific shapes
/// the application layer normalizes; `Auth` covers provider-side auth
/// failures without a more specific shape, and `Unavailable` covers
/// transport-level failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("account already registered")]
    AlreadyRegistered,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Whether this error came from the provider's auth layer, as opposed to
    /// a transport failure. Auth-shaped errors get normalized differently by
    /// some operations (e.g. federated sign-in).
    pub fn is_auth_shaped(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

/// An abstract client for the external identity provider.
///
/// # Implementation Notes
///
/// Implementations must publish every session transition they cause (and any
/// unsolicited provider-side transition, such as expiry) on the channel
/// returned by [`session_changes`](IdentityProvider::session_changes), in the
/// order the transitions occurred. Subscribers deregister by dropping the
/// receiver.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the session the provider currently considers live, if any.
    ///
    /// Used once at startup to restore a previous session.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Signs in with email and password.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: credentials accepted; a matching
    ///   `SessionChange::Established` push follows
    /// - `Err(ProviderError::InvalidCredentials)`: credential mismatch
    /// - `Err(_)`: any other provider failure
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError>;

    /// Creates a new identity.
    ///
    /// # Returns
    ///
    /// - `Ok(Identity)`: account created; a matching
    ///   `SessionChange::Established` push follows
    /// - `Err(ProviderError::AlreadyRegistered)`: the email is taken
    /// - `Err(_)`: any other provider failure
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: SignUpAttributes,
    ) -> Result<Identity, ProviderError>;

    /// Ends the current session.
    ///
    /// A `SessionChange::Cleared` push follows on success.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Initiates a redirect-based federated sign-in flow.
    ///
    /// The returned handle is opaque; completion is observed via the push
    /// channel like any other sign-in.
    async fn sign_in_with_oauth(
        &self,
        provider: FederatedProvider,
        redirect_to: &str,
    ) -> Result<RedirectHandle, ProviderError>;

    /// Returns a fresh receiver for session-change push notifications.
    fn session_changes(&self) -> mpsc::UnboundedReceiver<SessionChange>;
}
