//! Session-change push events.

use serde::{Deserialize, Serialize};

use super::model::Session;

/// A push notification from the identity provider about the current session.
///
/// Events are delivered in provider-chosen order over an explicit channel and
/// are the only authoritative source of truth for current-session
/// transitions; the latest event always wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionChange {
    /// The provider established or replaced the current session
    /// (sign-in, sign-up, federated completion, token refresh).
    Established { session: Session },
    /// The provider ended the current session (sign-out or expiry).
    Cleared,
}

impl SessionChange {
    /// Returns the session carried by this event, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionChange::Established { session } => Some(session),
            SessionChange::Cleared => None,
        }
    }

    /// Consumes the event and returns the carried session, if any.
    pub fn into_session(self) -> Option<Session> {
        match self {
            SessionChange::Established { session } => Some(session),
            SessionChange::Cleared => None,
        }
    }
}
