//! Trip entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use liftmosque_core::{MosqueId, TripId, UserId};

/// A ride offer to a mosque.
///
/// `departure_time` is kept as the string the driver typed; the console
/// displays it, never computes with it. `mosque_id` can be absent on old
/// records, which hides the trip from mosque-scoped admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub mosque_id: Option<MosqueId>,
    #[serde(default)]
    pub mosque_name: Option<String>,
    #[serde(default)]
    pub departure_point: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub seats_available: u32,
    #[serde(default)]
    pub interested_users: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Passengers who marked interest.
    #[must_use]
    pub fn interested_count(&self) -> usize {
        self.interested_users.len()
    }
}
