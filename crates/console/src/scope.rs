//! Role-based visibility scope.

use liftmosque_core::{AdminRole, MosqueId};

use crate::models::Profile;

/// What the signed-in operator is allowed to see.
///
/// Resolved once per sign-in (and whenever views are reopened) from the
/// operator's profile; every live view and command checks against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePredicate {
    /// Global admins see everything.
    Unrestricted,
    /// Mosque admins see only records tied to their mosque.
    Mosque(MosqueId),
}

impl ScopePredicate {
    /// Derive the scope from a profile. A mosque admin without a mosque
    /// assignment degrades to unrestricted rather than locking the
    /// operator out of everything.
    #[must_use]
    pub fn resolve(profile: &Profile) -> Self {
        match (&profile.role, &profile.mosque_id) {
            (AdminRole::MosqueAdmin, Some(mosque_id)) => Self::Mosque(mosque_id.clone()),
            _ => Self::Unrestricted,
        }
    }

    /// Whether a trip, user, or report with this `mosqueId` is visible.
    /// Records without one are hidden from a scoped admin.
    #[must_use]
    pub fn allows_record(&self, mosque_id: Option<&MosqueId>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Mosque(own) => mosque_id == Some(own),
        }
    }

    /// Whether a mosque itself is visible, matched on the mosque's own id.
    #[must_use]
    pub fn allows_mosque(&self, mosque_id: &MosqueId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Mosque(own) => mosque_id == own,
        }
    }

    /// Whether this scope is restricted to a single mosque.
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        matches!(self, Self::Mosque(_))
    }
}
