//! Unified error handling for the console core.

use thiserror::Error;

use liftmosque_core::{CoordinateError, EmailError};

use crate::auth::AuthError;
use crate::store::StoreError;

/// Input rejected before any remote call was made.
///
/// A validation failure guarantees nothing was written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required text field is empty or missing.
    #[error("{field} is required")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The email address is malformed.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// Latitude/longitude input could not be validated.
    #[error("invalid coordinates: {0}")]
    Coordinates(#[from] CoordinateError),

    /// The selected mosque id does not name an existing mosque.
    #[error("unknown mosque: {0}")]
    UnknownMosque(String),
}

/// Application-level error type for the console core.
///
/// The `Display` text is written for operators; [`ConsoleError::user_message`]
/// additionally hides backend detail for remote failures.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Malformed or missing required input; nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The identity provider rejected the operation.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The remote document store failed; no local state changed.
    #[error("remote operation failed: {0}")]
    Remote(#[from] StoreError),

    /// The operation conflicts with the record's current state
    /// (e.g. alerting an already-alerted report).
    #[error("conflicting state: {0}")]
    StateConflict(String),

    /// The referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ConsoleError {
    /// A message suitable for direct display to the operator.
    ///
    /// Remote failures are collapsed to a generic retry hint so backend
    /// internals never reach the screen; everything else is shown verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote(_) => {
                "The operation could not be completed. Please try again.".to_owned()
            }
            other => other.to_string(),
        }
    }
}
