//! User account and admin profile views.
//!
//! Both deserialize from the same `users` documents. `UserAccount` is the
//! listing view shown on the dashboard; `Profile` is the view the session
//! store reads for the signed-in operator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use liftmosque_core::{AdminRole, MosqueId, UserId};

/// A registered app user, as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mosque_id: Option<MosqueId>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Display name for lists and report attribution. Falls back to the
    /// email, then to the raw id, when names are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            return full.to_owned();
        }
        if let Some(email) = self.email.as_deref()
            && !email.is_empty()
        {
            return email.to_owned();
        }
        self.id.as_str().to_owned()
    }
}

/// The signed-in operator's profile record.
///
/// A missing `role` field means the record predates role scoping and is
/// treated as a global admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default)]
    pub mosque_id: Option<MosqueId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Synthetic profile for an identity with no document in the users
    /// collection, used under the grant-global-admin policy.
    #[must_use]
    pub fn global_admin_fallback(id: UserId) -> Self {
        Self {
            id,
            role: AdminRole::GlobalAdmin,
            mosque_id: None,
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::decode;
    use crate::store::{Collection, Document};

    fn doc(id: &str, value: serde_json::Value) -> Document {
        let serde_json::Value::Object(fields) = value else {
            unreachable!()
        };
        Document {
            id: id.to_owned(),
            fields,
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut account: UserAccount = decode(
            Collection::Users,
            &doc(
                "u1",
                json!({"firstName": "Amina", "lastName": "B.", "createdAt": "2026-01-01T00:00:00Z"}),
            ),
        )
        .unwrap();
        assert_eq!(account.display_name(), "Amina B.");

        account.first_name.clear();
        account.last_name.clear();
        account.email = Some("amina@liftmosque.app".to_owned());
        assert_eq!(account.display_name(), "amina@liftmosque.app");

        account.email = None;
        assert_eq!(account.display_name(), "u1");
    }

    #[test]
    fn test_profile_role_defaults_to_global_admin() {
        let profile: Profile = decode(
            Collection::Users,
            &doc("u1", json!({"firstName": "Amina"})),
        )
        .unwrap();
        assert_eq!(profile.role, AdminRole::GlobalAdmin);
        assert!(profile.mosque_id.is_none());
    }

    #[test]
    fn test_profile_mosque_admin_round_trip() {
        let profile: Profile = decode(
            Collection::Users,
            &doc(
                "u2",
                json!({"role": "mosque_admin", "mosqueId": "m1", "createdAt": "2026-01-01T00:00:00Z"}),
            ),
        )
        .unwrap();
        assert_eq!(profile.role, AdminRole::MosqueAdmin);
        assert_eq!(profile.mosque_id.as_ref().map(MosqueId::as_str), Some("m1"));
    }
}
