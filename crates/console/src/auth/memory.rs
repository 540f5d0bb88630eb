//! In-memory identity provider.
//!
//! Mirrors the contract of the hosted credential backend closely enough
//! for tests and demos: account registry, a watch channel for the current
//! identity, and isolated secondary contexts that share the registry but
//! never touch the primary session. Open contexts are counted so tests
//! can assert the provisioning workflow leaks nothing.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use uuid::Uuid;

use liftmosque_core::{Email, UserId};

use super::{AuthContext, AuthError, Identity, IdentityProvider};

struct Account {
    id: UserId,
    password: SecretString,
}

struct ProviderInner {
    // Keyed by lowercased email.
    accounts: Mutex<HashMap<String, Account>>,
    current: watch::Sender<Option<Identity>>,
    open_contexts: AtomicUsize,
}

impl ProviderInner {
    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// In-memory [`IdentityProvider`].
///
/// Cloning is cheap and shares the same account registry and session state.
#[derive(Clone)]
pub struct MemoryIdentityProvider {
    inner: Arc<ProviderInner>,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityProvider {
    /// Create a provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(ProviderInner {
                accounts: Mutex::new(HashMap::new()),
                current,
                open_contexts: AtomicUsize::new(0),
            }),
        }
    }

    /// Seed an account directly (fixture helper); returns its id.
    pub fn register(&self, email: &Email, password: &str) -> UserId {
        let id = UserId::new(Uuid::new_v4().to_string());
        self.inner.lock_accounts().insert(
            email.as_str().to_ascii_lowercase(),
            Account {
                id: id.clone(),
                password: SecretString::from(password.to_owned()),
            },
        );
        id
    }

    /// Whether a credential exists for this email.
    #[must_use]
    pub fn has_account(&self, email: &Email) -> bool {
        self.inner
            .lock_accounts()
            .contains_key(&email.as_str().to_ascii_lowercase())
    }

    /// Number of isolated contexts currently open. Zero outside a running
    /// provisioning call, on every outcome.
    #[must_use]
    pub fn open_context_count(&self) -> usize {
        self.inner.open_contexts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    type Context = MemoryAuthContext;

    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        let identity = {
            let accounts = self.inner.lock_accounts();
            let account = accounts
                .get(&email.as_str().to_ascii_lowercase())
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password.expose_secret() != password.expose_secret() {
                return Err(AuthError::InvalidCredentials);
            }
            Identity {
                id: account.id.clone(),
                email: email.clone(),
            }
        };
        self.inner.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) {
        self.inner.current.send_replace(None);
    }

    fn current_identity(&self) -> Option<Identity> {
        self.inner.current.borrow().clone()
    }

    fn identity_changes(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.current.subscribe()
    }

    async fn open_isolated(&self) -> Result<Self::Context, AuthError> {
        self.inner.open_contexts.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryAuthContext {
            provider: self.clone(),
            closed: false,
        })
    }
}

/// Isolated secondary context over a [`MemoryIdentityProvider`].
///
/// Shares the account registry; has no session state of its own to leak,
/// but tracks closure so the release discipline is still observable.
pub struct MemoryAuthContext {
    provider: MemoryIdentityProvider,
    closed: bool,
}

#[async_trait]
impl AuthContext for MemoryAuthContext {
    async fn create_credential(
        &mut self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError> {
        if password.expose_secret().is_empty() {
            return Err(AuthError::WeakPassword);
        }

        let key = email.as_str().to_ascii_lowercase();
        let mut accounts = self.provider.inner.lock_accounts();
        if accounts.contains_key(&key) {
            return Err(AuthError::EmailInUse);
        }

        let id = UserId::new(Uuid::new_v4().to_string());
        accounts.insert(
            key,
            Account {
                id: id.clone(),
                password: password.clone(),
            },
        );
        Ok(Identity {
            id,
            email: email.clone(),
        })
    }

    async fn close(mut self) {
        self.closed = true;
        self.provider
            .inner
            .open_contexts
            .fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for MemoryAuthContext {
    fn drop(&mut self) {
        if !self.closed {
            tracing::error!("isolated auth context dropped without close");
            self.provider
                .inner
                .open_contexts
                .fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let provider = MemoryIdentityProvider::new();
        let id = provider.register(&email("root@liftmosque.app"), "hunter2!");

        let identity = provider
            .sign_in(
                &email("root@liftmosque.app"),
                &SecretString::from("hunter2!"),
            )
            .await
            .unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(provider.current_identity(), Some(identity));

        provider.sign_out().await;
        assert_eq!(provider.current_identity(), None);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let provider = MemoryIdentityProvider::new();
        provider.register(&email("root@liftmosque.app"), "hunter2!");

        let err = provider
            .sign_in(&email("root@liftmosque.app"), &SecretString::from("nope"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(provider.current_identity(), None);
    }

    #[tokio::test]
    async fn test_isolated_context_does_not_touch_primary_session() {
        let provider = MemoryIdentityProvider::new();
        provider.register(&email("root@liftmosque.app"), "hunter2!");
        let operator = provider
            .sign_in(
                &email("root@liftmosque.app"),
                &SecretString::from("hunter2!"),
            )
            .await
            .unwrap();

        let mut ctx = provider.open_isolated().await.unwrap();
        assert_eq!(provider.open_context_count(), 1);
        ctx.create_credential(
            &email("new.admin@liftmosque.app"),
            &SecretString::from("s3cret!"),
        )
        .await
        .unwrap();
        ctx.close().await;

        assert_eq!(provider.open_context_count(), 0);
        assert_eq!(provider.current_identity(), Some(operator));
        assert!(provider.has_account(&email("new.admin@liftmosque.app")));
    }

    #[tokio::test]
    async fn test_create_credential_email_in_use() {
        let provider = MemoryIdentityProvider::new();
        provider.register(&email("taken@liftmosque.app"), "pw");

        let mut ctx = provider.open_isolated().await.unwrap();
        let err = ctx
            .create_credential(&email("taken@liftmosque.app"), &SecretString::from("pw2"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailInUse);
        ctx.close().await;
        assert_eq!(provider.open_context_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_context_still_releases() {
        let provider = MemoryIdentityProvider::new();
        let ctx = provider.open_isolated().await.unwrap();
        assert_eq!(provider.open_context_count(), 1);
        drop(ctx);
        assert_eq!(provider.open_context_count(), 0);
    }
}
