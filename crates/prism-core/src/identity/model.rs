//! Identity and session domain models.
//!
//! These models mirror what the external identity provider exposes. The
//! provider owns them; this core references them but never mutates an
//! `Identity` once created.

use serde::{Deserialize, Serialize};

/// The provider-managed account record, independent of application data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique identity identifier (UUID format), immutable once created
    pub id: String,
    /// Email address the account was registered with
    pub email: String,
}

/// A live authenticated context for one identity.
///
/// The token and expiry are opaque to this core; they are carried for the
/// benefit of collaborators that talk to the provider directly. At most one
/// session is "current" per running process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The identity this session authenticates
    pub identity: Identity,
    /// Opaque bearer token issued by the provider
    pub access_token: String,
    /// Expiry timestamp (ISO 8601 format), if the provider reports one
    pub expires_at: Option<String>,
}

impl Session {
    /// Returns the id of the identity this session authenticates.
    pub fn identity_id(&self) -> &str {
        &self.identity.id
    }
}

/// Application-side metadata attached to a provider sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpAttributes {
    /// Requested username, provisioned into the profile store afterwards
    pub username: String,
}

/// Third-party providers available for federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FederatedProvider {
    Google,
    Github,
}

impl std::fmt::Display for FederatedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FederatedProvider::Google => write!(f, "google"),
            FederatedProvider::Github => write!(f, "github"),
        }
    }
}

/// Opaque handle for a redirect-based federated sign-in flow.
///
/// Completion of the flow is observed later through the session-change push
/// channel, not through this handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectHandle {
    /// The provider the flow was initiated against
    pub provider: FederatedProvider,
    /// The URL the caller must navigate to in order to continue the flow
    pub url: String,
}
