//! Shared domain types.

pub mod email;
pub mod geo;
pub mod id;
pub mod role;

pub use email::{Email, EmailError};
pub use geo::{Coordinates, CoordinateError};
pub use id::{MosqueId, ReportId, TripId, UserId};
pub use role::{AdminRole, ReportStatus};
