//! Profile domain model.

use serde::{Deserialize, Serialize};

/// The application's user record.
///
/// Exactly one profile exists per identity; `id` is foreign to the provider's
/// identity id. Profiles are created during sign-up provisioning and never
/// deleted by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity id this profile extends (UUID format)
    pub id: String,
    /// User-chosen display name
    pub username: String,
    /// Timestamp when the profile was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the profile was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Profile {
    /// Creates a profile for the given identity id with fresh timestamps.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            username: username.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Partial update payload for a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New username, if it should change
    pub username: Option<String>,
}

impl ProfileUpdate {
    /// Returns a payload that only changes the username.
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Applies this update to a profile and refreshes its `updated_at`.
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(ref username) = self.username {
            profile.username = username.clone();
        }
        profile.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
