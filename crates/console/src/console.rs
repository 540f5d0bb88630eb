//! The console facade.
//!
//! [`Console`] owns the session state machine, the live views for the
//! signed-in scope, and the backends behind them. The presentation layer
//! holds one clone and calls nothing else. Cloning shares all state.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use liftmosque_core::{Email, MosqueId, ReportId, TripId, UserId};

use crate::auth::{AuthError, Identity, IdentityProvider};
use crate::commands;
use crate::config::{ConsoleConfig, MissingProfilePolicy};
use crate::error::{ConsoleError, ValidationError};
use crate::live::{DashboardCounts, LiveViews};
use crate::models::{Mosque, MosqueDraft, Profile, Report, Trip, UserAccount, decode};
use crate::provision;
use crate::scope::ScopePredicate;
use crate::session::{SessionState, SessionStore};
use crate::store::{Collection, DocumentStore};

struct ConsoleInner<S, P> {
    store: S,
    provider: P,
    config: ConsoleConfig,
    session: SessionStore,
    views: Mutex<Option<LiveViews>>,
    mirror: Mutex<Option<JoinHandle<()>>>,
}

impl<S, P> ConsoleInner<S, P> {
    fn lock_views(&self) -> std::sync::MutexGuard<'_, Option<LiveViews>> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop views and publish the signed-out state. Safe to call from any
    /// state; does not talk to the provider.
    fn teardown(&self) {
        if let Some(views) = self.lock_views().take() {
            views.stop_all();
        }
        self.session.set(SessionState::SignedOut);
    }
}

impl<S, P> Drop for ConsoleInner<S, P> {
    fn drop(&mut self) {
        if let Some(mirror) = self.mirror.lock().unwrap_or_else(PoisonError::into_inner).take() {
            mirror.abort();
        }
    }
}

/// Role-scoped realtime console core.
///
/// Generic over the document store and the identity provider so tests run
/// entirely in memory and production plugs in the hosted backends.
pub struct Console<S, P> {
    inner: Arc<ConsoleInner<S, P>>,
}

impl<S, P> Clone for Console<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, P> Console<S, P>
where
    S: DocumentStore,
    P: IdentityProvider,
{
    /// Build a console over `store` and `provider`.
    ///
    /// Spawns a task mirroring the provider's identity channel, so a
    /// credential revoked outside this process tears the session down
    /// exactly like a local sign-out.
    #[must_use]
    pub fn new(store: S, provider: P, config: ConsoleConfig) -> Self {
        let identity_rx = provider.identity_changes();
        let inner = Arc::new(ConsoleInner {
            store,
            provider,
            config,
            session: SessionStore::new(),
            views: Mutex::new(None),
            mirror: Mutex::new(None),
        });

        let mirror = tokio::spawn(mirror_identity(Arc::downgrade(&inner), identity_rx));
        *inner.mirror.lock().unwrap_or_else(PoisonError::into_inner) = Some(mirror);

        Self { inner }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Sign in and open the live views for the resolved scope.
    ///
    /// Observers on [`Console::session_changes`] see `Initializing` while
    /// the profile is fetched, then `SignedIn`. On any failure after the
    /// credential check the credential is released again and the session
    /// ends `SignedOut`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparseable email, an auth error
    /// verbatim from the provider (including `AccessDenied` when no
    /// profile exists under the deny policy), or a remote error if the
    /// profile fetch fails.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<(), ConsoleError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        let identity = self.inner.provider.sign_in(&email, password).await?;
        self.inner.session.set(SessionState::Initializing {
            identity: identity.clone(),
        });

        let profile = match self.load_profile(&identity).await {
            Ok(profile) => profile,
            Err(err) => {
                self.inner.provider.sign_out().await;
                self.inner.teardown();
                return Err(err);
            }
        };

        let scope = ScopePredicate::resolve(&profile);
        {
            let mut views = self.inner.lock_views();
            if let Some(old) = views.take() {
                old.stop_all();
            }
            *views = Some(LiveViews::open(&self.inner.store, &scope));
        }
        tracing::info!(admin_id = %identity.id, scoped = scope.is_scoped(), "signed in");
        self.inner.session.set(SessionState::SignedIn {
            identity,
            profile,
            scope,
        });
        Ok(())
    }

    /// Sign out: views stop before the credential is released, so no
    /// snapshot from the old scope can arrive afterwards. Always succeeds.
    pub async fn sign_out(&self) {
        self.inner.teardown();
        self.inner.provider.sign_out().await;
        tracing::info!("signed out");
    }

    /// The current session state.
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.inner.session.state()
    }

    /// Watch channel over the session state.
    #[must_use]
    pub fn session_changes(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    async fn load_profile(&self, identity: &Identity) -> Result<Profile, ConsoleError> {
        let doc = self
            .inner
            .store
            .get(Collection::Users, identity.id.as_str())
            .await?;
        let profile = doc.and_then(|doc| decode(Collection::Users, &doc));
        if let Some(profile) = profile {
            return Ok(profile);
        }
        match self.inner.config.missing_profile_policy {
            MissingProfilePolicy::GrantGlobalAdmin => {
                tracing::warn!(
                    admin_id = %identity.id,
                    "no profile document, granting global access"
                );
                Ok(Profile::global_admin_fallback(identity.id.clone()))
            }
            MissingProfilePolicy::Deny => Err(ConsoleError::Auth(AuthError::AccessDenied(
                "no admin profile for this account".to_owned(),
            ))),
        }
    }

    // =========================================================================
    // Live views
    // =========================================================================

    /// Current scoped mosque list; empty when signed out.
    #[must_use]
    pub fn mosques(&self) -> Vec<Mosque> {
        self.inner
            .lock_views()
            .as_ref()
            .map(|v| v.mosques.current())
            .unwrap_or_default()
    }

    /// Current scoped trip list; empty when signed out.
    #[must_use]
    pub fn trips(&self) -> Vec<Trip> {
        self.inner
            .lock_views()
            .as_ref()
            .map(|v| v.trips.current())
            .unwrap_or_default()
    }

    /// Current scoped user list; empty when signed out.
    #[must_use]
    pub fn users(&self) -> Vec<UserAccount> {
        self.inner
            .lock_views()
            .as_ref()
            .map(|v| v.users.current())
            .unwrap_or_default()
    }

    /// Current scoped report list; empty when signed out.
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        self.inner
            .lock_views()
            .as_ref()
            .map(|v| v.reports.current())
            .unwrap_or_default()
    }

    /// Display name for a user id, from the unscoped directory.
    #[must_use]
    pub fn user_name(&self, id: &UserId) -> Option<String> {
        self.inner
            .lock_views()
            .as_ref()
            .and_then(|v| v.directory.current().get(id).cloned())
    }

    /// Dashboard counters; zeros when signed out.
    #[must_use]
    pub fn counts(&self) -> DashboardCounts {
        self.inner
            .lock_views()
            .as_ref()
            .map(LiveViews::counts)
            .unwrap_or_default()
    }

    /// Watch channel over the scoped mosque list, or `None` when signed
    /// out. Receivers keep delivering until sign-out stops the view.
    #[must_use]
    pub fn mosque_changes(&self) -> Option<watch::Receiver<Vec<Mosque>>> {
        self.inner.lock_views().as_ref().map(|v| v.mosques.watch())
    }

    /// Watch channel over the scoped trip list, or `None` when signed out.
    #[must_use]
    pub fn trip_changes(&self) -> Option<watch::Receiver<Vec<Trip>>> {
        self.inner.lock_views().as_ref().map(|v| v.trips.watch())
    }

    /// Watch channel over the scoped user list, or `None` when signed out.
    #[must_use]
    pub fn user_changes(&self) -> Option<watch::Receiver<Vec<UserAccount>>> {
        self.inner.lock_views().as_ref().map(|v| v.users.watch())
    }

    /// Watch channel over the scoped report list, or `None` when signed
    /// out.
    #[must_use]
    pub fn report_changes(&self) -> Option<watch::Receiver<Vec<Report>>> {
        self.inner.lock_views().as_ref().map(|v| v.reports.watch())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// See [`commands::create_mosque`].
    ///
    /// # Errors
    ///
    /// Validation or remote errors, as documented there.
    pub async fn create_mosque(&self, draft: &MosqueDraft) -> Result<MosqueId, ConsoleError> {
        commands::create_mosque(&self.inner.store, draft).await
    }

    /// See [`commands::update_mosque`].
    ///
    /// # Errors
    ///
    /// Validation, not-found, or remote errors, as documented there.
    pub async fn update_mosque(
        &self,
        id: &MosqueId,
        draft: &MosqueDraft,
    ) -> Result<(), ConsoleError> {
        commands::update_mosque(&self.inner.store, id, draft).await
    }

    /// See [`commands::delete_mosque`].
    ///
    /// # Errors
    ///
    /// Remote errors, as documented there.
    pub async fn delete_mosque(&self, id: &MosqueId) -> Result<(), ConsoleError> {
        commands::delete_mosque(&self.inner.store, id).await
    }

    /// See [`commands::delete_trip`].
    ///
    /// # Errors
    ///
    /// Remote errors, as documented there.
    pub async fn delete_trip(&self, id: &TripId) -> Result<(), ConsoleError> {
        commands::delete_trip(&self.inner.store, id).await
    }

    /// See [`commands::delete_user`].
    ///
    /// # Errors
    ///
    /// Remote errors, as documented there.
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ConsoleError> {
        commands::delete_user(&self.inner.store, id).await
    }

    /// See [`commands::respond_to_report`].
    ///
    /// # Errors
    ///
    /// Validation, not-found, state-conflict, or remote errors, as
    /// documented there.
    pub async fn respond_to_report(
        &self,
        id: &ReportId,
        message: &str,
    ) -> Result<(), ConsoleError> {
        commands::respond_to_report(&self.inner.store, id, message).await
    }

    /// See [`provision::create_admin`].
    ///
    /// # Errors
    ///
    /// Validation, auth, or remote errors, as documented there.
    pub async fn create_admin(
        &self,
        email: &str,
        password: &SecretString,
        mosque_id: &MosqueId,
    ) -> Result<UserId, ConsoleError> {
        provision::create_admin(&self.inner.store, &self.inner.provider, email, password, mosque_id)
            .await
    }
}

/// Mirror the provider's identity channel: when the credential disappears
/// without a local sign-out (revoked elsewhere), tear the session down.
async fn mirror_identity<S, P>(
    inner: Weak<ConsoleInner<S, P>>,
    mut identity_rx: watch::Receiver<Option<Identity>>,
) where
    S: DocumentStore,
    P: IdentityProvider,
{
    while identity_rx.changed().await.is_ok() {
        let revoked = identity_rx.borrow_and_update().is_none();
        let Some(inner) = inner.upgrade() else {
            return;
        };
        if revoked && inner.session.state().identity().is_some() {
            tracing::warn!("credential revoked externally, signing out");
            inner.teardown();
        }
    }
}
