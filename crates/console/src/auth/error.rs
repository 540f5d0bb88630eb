//! Identity provider errors.

use thiserror::Error;

/// Errors surfaced by the identity provider.
///
/// These pass through to the operator verbatim; the operator's own session
/// is never affected by an `AuthError` raised during provisioning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The email/password pair was rejected.
    #[error("invalid credentials or access denied")]
    InvalidCredentials,

    /// A credential with this email already exists.
    #[error("email is already in use")]
    EmailInUse,

    /// The provider rejected the password as too weak.
    #[error("password rejected by the identity provider")]
    WeakPassword,

    /// The identity authenticated but is not allowed into the console
    /// (e.g. no profile document under a deny policy).
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Any other provider-side failure, passed through verbatim.
    #[error("identity provider error: {0}")]
    Provider(String),
}
