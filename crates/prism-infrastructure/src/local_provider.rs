//! Local identity provider.
//!
//! An in-process stand-in for the remote identity provider, used by the REPL
//! and by development wiring. Accounts and the current session live in
//! memory; every session transition is published on the push channel in the
//! order it occurred, which is exactly the contract the coordinator relies
//! on.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use prism_core::identity::{
    FederatedProvider, Identity, IdentityProvider, ProviderError, RedirectHandle, Session,
    SessionChange, SignUpAttributes,
};

struct Account {
    identity: Identity,
    password: String,
}

/// In-memory identity provider.
///
/// Sessions are minted with fresh uuid access tokens and no expiry. Unknown
/// email and wrong password produce the same `InvalidCredentials` error so
/// callers cannot probe which accounts exist.
#[derive(Default)]
pub struct LocalIdentityProvider {
    /// Registered accounts, keyed by email
    accounts: Mutex<HashMap<String, Account>>,
    /// The session this provider currently considers live
    session: Mutex<Option<Session>>,
    /// Push subscribers; closed receivers are pruned on publish
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SessionChange>>>,
}

impl LocalIdentityProvider {
    /// Creates an empty provider with no accounts and no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a provider-side session expiry: clears the current session
    /// and publishes the transition.
    pub fn revoke_session(&self) {
        *self.session.lock().unwrap() = None;
        self.publish(SessionChange::Cleared);
    }

    fn publish(&self, change: SessionChange) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    fn establish(&self, identity: Identity) -> Session {
        let session = Session {
            identity,
            access_token: Uuid::new_v4().to_string(),
            expires_at: None,
        };
        *self.session.lock().unwrap() = Some(session.clone());
        self.publish(SessionChange::Established {
            session: session.clone(),
        });
        session
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let identity = {
            let accounts = self.accounts.lock().unwrap();
            // Unknown email and wrong password are indistinguishable.
            match accounts.get(email) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(ProviderError::InvalidCredentials),
            }
        };

        tracing::debug!("[LocalIdentityProvider] signed in {}", identity.id);
        self.establish(identity.clone());
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _attributes: SignUpAttributes,
    ) -> Result<Identity, ProviderError> {
        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(ProviderError::AlreadyRegistered);
            }
            let identity = Identity {
                id: Uuid::new_v4().to_string(),
                email: email.to_string(),
            };
            accounts.insert(
                email.to_string(),
                Account {
                    identity: identity.clone(),
                    password: password.to_string(),
                },
            );
            identity
        };

        tracing::debug!("[LocalIdentityProvider] registered {}", identity.id);
        self.establish(identity.clone());
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        *self.session.lock().unwrap() = None;
        self.publish(SessionChange::Cleared);
        Ok(())
    }

    async fn sign_in_with_oauth(
        &self,
        provider: FederatedProvider,
        _redirect_to: &str,
    ) -> Result<RedirectHandle, ProviderError> {
        // There is no federated backend to redirect to locally.
        Err(ProviderError::Auth(format!(
            "federated sign-in via {} is not available locally",
            provider
        )))
    }

    fn session_changes(&self) -> mpsc::UnboundedReceiver<SessionChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> SignUpAttributes {
        SignUpAttributes {
            username: "tester".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_establishes_and_publishes_session() {
        let provider = LocalIdentityProvider::new();
        let mut changes = provider.session_changes();

        let identity = provider
            .sign_up("a@example.com", "pw", attributes())
            .await
            .unwrap();

        let change = changes.try_recv().unwrap();
        assert_eq!(
            change.session().map(|s| s.identity.id.clone()),
            Some(identity.id.clone())
        );
        let session = provider.current_session().await.unwrap().unwrap();
        assert_eq!(session.identity.id, identity.id);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_is_rejected() {
        let provider = LocalIdentityProvider::new();
        provider
            .sign_up("a@example.com", "pw", attributes())
            .await
            .unwrap();

        let err = provider
            .sign_up("a@example.com", "other", attributes())
            .await
            .unwrap_err();

        assert_eq!(err, ProviderError::AlreadyRegistered);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
        let provider = LocalIdentityProvider::new();
        provider
            .sign_up("a@example.com", "pw", attributes())
            .await
            .unwrap();

        let wrong_password = provider
            .sign_in_with_password("a@example.com", "nope")
            .await
            .unwrap_err();
        let unknown_email = provider
            .sign_in_with_password("ghost@example.com", "pw")
            .await
            .unwrap_err();

        assert_eq!(wrong_password, ProviderError::InvalidCredentials);
        assert_eq!(unknown_email, ProviderError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_sign_out_publishes_cleared() {
        let provider = LocalIdentityProvider::new();
        provider
            .sign_up("a@example.com", "pw", attributes())
            .await
            .unwrap();
        let mut changes = provider.session_changes();

        provider.sign_out().await.unwrap();

        assert_eq!(changes.try_recv().unwrap(), SessionChange::Cleared);
        assert!(provider.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_session_simulates_expiry() {
        let provider = LocalIdentityProvider::new();
        provider
            .sign_up("a@example.com", "pw", attributes())
            .await
            .unwrap();
        let mut changes = provider.session_changes();

        provider.revoke_session();

        assert_eq!(changes.try_recv().unwrap(), SessionChange::Cleared);
    }

    #[tokio::test]
    async fn test_oauth_is_not_available_locally() {
        let provider = LocalIdentityProvider::new();

        let err = provider
            .sign_in_with_oauth(FederatedProvider::Google, "/dashboard")
            .await
            .unwrap_err();

        assert!(err.is_auth_shaped());
    }
}
