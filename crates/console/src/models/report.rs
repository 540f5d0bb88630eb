//! User report entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use liftmosque_core::{MosqueId, ReportId, ReportStatus, UserId};

/// A user-versus-user report awaiting moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub reporter_id: UserId,
    pub reported_user_id: UserId,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub admin_comment: Option<String>,
    #[serde(default)]
    pub mosque_id: Option<MosqueId>,
    #[serde(default)]
    pub is_read: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Whether this report still accepts a response.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::decode;
    use crate::store::{Collection, Document};

    #[test]
    fn test_decode_defaults_status_to_pending() {
        let serde_json::Value::Object(fields) = json!({
            "reporterId": "u1",
            "reportedUserId": "u2",
            "createdAt": "2026-04-01T10:00:00Z",
        }) else {
            unreachable!()
        };
        let report: Report = decode(
            Collection::Reports,
            &Document {
                id: "r1".to_owned(),
                fields,
            },
        )
        .unwrap();
        assert!(report.is_pending());
        assert!(report.admin_comment.is_none());
        assert!(report.responded_at.is_none());
    }
}
