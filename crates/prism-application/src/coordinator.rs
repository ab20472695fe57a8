//! Session & provisioning coordinator.
//!
//! `SessionCoordinator` is the single source of truth for "who is currently
//! signed in". It owns the in-memory current-session value and the lifetime
//! of the provider's push subscription, and it guarantees that every
//! signed-up identity has exactly one profile record before sign-up is
//! reported successful.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use prism_core::error::{PrismError, Result};
use prism_core::identity::{
    FederatedProvider, Identity, IdentityProvider, ProviderError, RedirectHandle, Session,
    SignUpAttributes,
};
use prism_core::profile::{Profile, ProfileStore, ProfileUpdate};

/// Redirect target handed to the provider when initiating a federated flow.
/// The hosting surface resolves it against its own origin.
const FEDERATED_REDIRECT_TARGET: &str = "/dashboard";

/// Compensating actions for completed sign-up phases.
///
/// Sign-up is a manual saga: each phase that succeeds registers its
/// compensation here, and a later failure runs the registered compensations
/// in reverse order before the error is reported.
enum Compensation {
    /// Undo a provider-side identity/session creation.
    SignOut,
}

/// Owns the current-session state and the identity lifecycle operations.
///
/// # Responsibilities
///
/// - Restoring a session from the provider on startup
/// - Applying session-change pushes strictly in arrival order
/// - Password, sign-up, and federated sign-in flows with error normalization
/// - One-shot profile provisioning with compensation on partial failure
///
/// # Concurrency
///
/// A single listener task is the only writer of the current-session slot
/// after startup. Operation return values never touch the slot, so a sign-in
/// result that resolves after a later push cannot overwrite the state that
/// push established: the latest push always wins.
pub struct SessionCoordinator {
    /// Client for the external identity provider
    provider: Arc<dyn IdentityProvider>,
    /// Store holding the application's profile records
    profiles: Arc<dyn ProfileStore>,
    /// The current session, written by the push listener
    current: Arc<RwLock<Option<Session>>>,
    /// Push listener task, aborted on shutdown
    listener: JoinHandle<()>,
    /// Set once `shutdown` has run; operations refuse to start afterwards
    closed: AtomicBool,
}

impl SessionCoordinator {
    /// Creates a coordinator and brings it into its initial state.
    ///
    /// Subscribes to the provider's push channel exactly once, then attempts
    /// to restore an existing session. Restore failures are logged and the
    /// coordinator starts out anonymous; pushes buffered during the restore
    /// are applied afterwards and override it.
    pub async fn start(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        // Subscribe before restoring so no push arriving mid-restore is lost.
        let mut changes = provider.session_changes();
        let current = Arc::new(RwLock::new(None));

        match provider.current_session().await {
            Ok(session) => {
                if session.is_some() {
                    tracing::info!("[SessionCoordinator] restored existing session");
                }
                *current.write().await = session;
            }
            Err(e) => {
                tracing::warn!("[SessionCoordinator] session restore failed: {}", e);
            }
        }

        let slot = Arc::clone(&current);
        let listener = tokio::spawn(async move {
            // Pushes are authoritative and applied strictly in arrival order.
            while let Some(change) = changes.recv().await {
                tracing::debug!("[SessionCoordinator] session change: {:?}", change);
                *slot.write().await = change.into_session();
            }
            tracing::debug!("[SessionCoordinator] push channel closed");
        });

        Self {
            provider,
            profiles,
            current,
            listener,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the current session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Returns the identity of the current session, if any.
    pub async fn current_identity(&self) -> Option<Identity> {
        self.current.read().await.as_ref().map(|s| s.identity.clone())
    }

    /// Whether a session is currently established.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Signs in with email and password.
    ///
    /// A credential mismatch is normalized to `InvalidCredentials` without
    /// distinguishing wrong-email from wrong-password. Any other provider
    /// error passes through as `Unexpected`.
    ///
    /// The returned identity is informational; the session-change push, not
    /// this return value, establishes the authenticated state.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        self.ensure_open()?;

        match self.provider.sign_in_with_password(email, password).await {
            Ok(identity) => {
                tracing::debug!("[SessionCoordinator] sign-in accepted for {}", identity.id);
                Ok(identity)
            }
            Err(ProviderError::InvalidCredentials) => Err(PrismError::InvalidCredentials),
            Err(e) => Err(PrismError::unexpected(e.to_string())),
        }
    }

    /// Creates an identity and provisions its profile.
    ///
    /// Two phases, executed as a saga:
    ///
    /// 1. Create the identity at the provider. A duplicate registration is
    ///    normalized to `DuplicateAccount`.
    /// 2. Provision exactly one profile row via [`ensure_profile`]. If this
    ///    fails, the compensations registered so far run in reverse order
    ///    (signing the just-created session out) and the caller sees
    ///    `ProfileProvisioningFailed`, not the underlying store error.
    ///
    /// [`ensure_profile`]: SessionCoordinator::ensure_profile
    pub async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<Identity> {
        self.ensure_open()?;
        let mut completed: Vec<Compensation> = Vec::new();

        let attributes = SignUpAttributes {
            username: username.to_string(),
        };
        let identity = match self.provider.sign_up(email, password, attributes).await {
            Ok(identity) => identity,
            Err(ProviderError::AlreadyRegistered) => return Err(PrismError::DuplicateAccount),
            Err(e) => return Err(PrismError::unexpected(e.to_string())),
        };
        completed.push(Compensation::SignOut);

        if let Err(e) = self.ensure_profile(&identity.id, username).await {
            tracing::warn!(
                "[SessionCoordinator] provisioning failed for {}, compensating",
                identity.id
            );
            self.compensate(completed).await;
            return Err(e);
        }

        tracing::info!("[SessionCoordinator] signed up identity {}", identity.id);
        Ok(identity)
    }

    /// Provisions a profile for an identity, at most once.
    ///
    /// Checks for an existing row first so a retried sign-up or a duplicate
    /// provider delivery returns the row already provisioned instead of
    /// inserting a second one. The lookup is best-effort; if it fails the
    /// insert is attempted anyway. An insert failure is reported as
    /// `ProfileProvisioningFailed`.
    pub async fn ensure_profile(&self, identity_id: &str, username: &str) -> Result<Profile> {
        self.ensure_open()?;

        match self.profiles.find_by_id(identity_id).await {
            Ok(Some(existing)) => {
                tracing::debug!(
                    "[SessionCoordinator] profile already provisioned for {}",
                    identity_id
                );
                return Ok(existing);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(
                    "[SessionCoordinator] profile lookup failed for {}: {}",
                    identity_id,
                    e
                );
            }
        }

        match self.profiles.insert(identity_id, username).await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!(
                    "[SessionCoordinator] profile insert failed for {}: {}",
                    identity_id,
                    e
                );
                Err(PrismError::ProfileProvisioningFailed)
            }
        }
    }

    /// Ends the current session at the provider.
    ///
    /// The coordinator's own state transitions only on the resulting push,
    /// not on this call's return. Provider errors pass through as
    /// `Unexpected`.
    pub async fn sign_out(&self) -> Result<()> {
        self.ensure_open()?;

        self.provider
            .sign_out()
            .await
            .map_err(|e| PrismError::unexpected(e.to_string()))
    }

    /// Initiates a redirect-based federated sign-in flow.
    ///
    /// Completion is observed later via the push channel. A non-specific
    /// provider auth error is normalized to `FederatedSignInFailed`;
    /// transport errors pass through as `Unexpected`.
    pub async fn sign_in_with_provider(
        &self,
        provider: FederatedProvider,
    ) -> Result<RedirectHandle> {
        self.ensure_open()?;

        match self
            .provider
            .sign_in_with_oauth(provider, FEDERATED_REDIRECT_TARGET)
            .await
        {
            Ok(handle) => Ok(handle),
            Err(e) if e.is_auth_shaped() => Err(PrismError::FederatedSignInFailed),
            Err(e) => Err(PrismError::unexpected(e.to_string())),
        }
    }

    /// Reads a profile by identity id.
    pub async fn profile(&self, identity_id: &str) -> Result<Option<Profile>> {
        self.ensure_open()?;

        self.profiles
            .find_by_id(identity_id)
            .await
            .map_err(|e| PrismError::unexpected(e.to_string()))
    }

    /// Applies a partial update to a profile.
    pub async fn update_profile(&self, identity_id: &str, update: ProfileUpdate) -> Result<Profile> {
        self.ensure_open()?;

        self.profiles
            .update(identity_id, update)
            .await
            .map_err(|e| PrismError::unexpected(e.to_string()))
    }

    /// Tears the coordinator down: deregisters the push listener and refuses
    /// all further operations. Idempotent.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("[SessionCoordinator] shutting down");
        self.listener.abort();
    }

    /// Runs the compensations of completed saga phases, most recent first.
    ///
    /// Compensation failures are logged, not surfaced; the original failure
    /// is what the caller needs to see.
    async fn compensate(&self, completed: Vec<Compensation>) {
        for step in completed.into_iter().rev() {
            match step {
                Compensation::SignOut => {
                    if let Err(e) = self.provider.sign_out().await {
                        tracing::warn!(
                            "[SessionCoordinator] compensating sign-out failed: {}",
                            e
                        );
                    }
                }
            }
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PrismError::unexpected(
                "session coordinator has been shut down",
            ));
        }
        Ok(())
    }
}

impl Drop for SessionCoordinator {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
