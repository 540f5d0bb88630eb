//! Session state machine.
//!
//! One watch channel carries the whole session: consumers render whatever
//! state they observe and re-render on change. Transitions are driven by
//! the console facade; this module only guarantees that observers always
//! see a coherent state, never a half-built one.

use tokio::sync::watch;

use crate::auth::Identity;
use crate::models::Profile;
use crate::scope::ScopePredicate;

/// Where the session currently stands.
///
/// `Initializing` covers the window between a successful credential check
/// and the profile fetch; the UI shows a spinner, not the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    SignedOut,
    Initializing {
        identity: Identity,
    },
    SignedIn {
        identity: Identity,
        profile: Profile,
        scope: ScopePredicate,
    },
}

impl SessionState {
    /// The authenticated identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedOut => None,
            Self::Initializing { identity } | Self::SignedIn { identity, .. } => Some(identity),
        }
    }

    /// The resolved scope, present only once fully signed in.
    #[must_use]
    pub fn scope(&self) -> Option<&ScopePredicate> {
        match self {
            Self::SignedIn { scope, .. } => Some(scope),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }
}

/// Single owner of the session channel.
pub(crate) struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::SignedOut);
        Self { tx }
    }

    pub(crate) fn set(&self, state: SessionState) {
        self.tx.send_replace(state);
    }

    pub(crate) fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}
