//! Identity provider seam.
//!
//! Credential management lives in an external identity backend. The console
//! consumes it through [`IdentityProvider`]; provisioning additionally uses
//! [`AuthContext`], an isolated secondary session against the same backend
//! so that registering a new credential never disturbs the operator's own
//! sign-in state.

mod error;
pub mod memory;

pub use error::AuthError;
pub use memory::MemoryIdentityProvider;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::watch;

use liftmosque_core::{Email, UserId};

/// An authenticated principal.
///
/// Created at sign-in, destroyed at sign-out; owned exclusively by the
/// session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Credential id; doubles as the profile document id.
    pub id: UserId,
    /// The credential's email address.
    pub email: Email,
}

/// The credential backend the console authenticates against.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// The isolated secondary context type for provisioning.
    type Context: AuthContext;

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a bad email/password
    /// pair, or another provider error verbatim.
    async fn sign_in(&self, email: &Email, password: &SecretString)
    -> Result<Identity, AuthError>;

    /// Clear the current credential. Always succeeds from the caller's
    /// point of view.
    async fn sign_out(&self);

    /// The currently signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Watch channel mirroring the provider's own authentication state,
    /// including revocations originating outside this process.
    fn identity_changes(&self) -> watch::Receiver<Option<Identity>>;

    /// Open an isolated secondary context against the same backend.
    ///
    /// The context shares the provider's account database but has fully
    /// independent session state: nothing done inside it touches the
    /// identity returned by [`IdentityProvider::current_identity`]. The
    /// caller owns it exclusively and must `close` it on every exit path.
    ///
    /// # Errors
    ///
    /// Returns a provider error if the context cannot be established.
    async fn open_isolated(&self) -> Result<Self::Context, AuthError>;
}

/// An isolated secondary authentication context.
#[async_trait]
pub trait AuthContext: Send + 'static {
    /// Register a new credential, returning its newly assigned identity.
    /// Does not affect any other session, including the one that opened
    /// this context.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailInUse` if the email is already registered,
    /// `AuthError::WeakPassword` if the provider rejects the password, or
    /// another provider error verbatim.
    async fn create_credential(
        &mut self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Identity, AuthError>;

    /// Release the context and everything it holds. Must be called on
    /// every exit path; a context dropped without `close` is a bug and is
    /// logged as such by implementations.
    async fn close(self);
}
