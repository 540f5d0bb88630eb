//! Role and status enums for console entities.

use serde::{Deserialize, Serialize};

/// Role of an administrator profile.
///
/// Determines the data-visibility scope of a signed-in operator:
/// a `GlobalAdmin` sees every record, a `MosqueAdmin` is restricted to
/// records carrying its own mosque id.
///
/// Profiles stored without a role field deserialize to `GlobalAdmin`;
/// whether a *missing profile document* grants that role is a separate,
/// configurable policy in the console crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Unrestricted visibility across all data.
    #[default]
    GlobalAdmin,
    /// Scoped to exactly one mosque's data.
    MosqueAdmin,
}

/// Lifecycle status of a user report.
///
/// The only legal transition is `Pending` -> `Alerted`, exactly once.
/// There is no reverse transition and no further state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Awaiting an administrator response.
    #[default]
    Pending,
    /// An administrator has sent a warning to the reported user.
    Alerted,
}

impl ReportStatus {
    /// Whether this report can still receive an administrator response.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}
