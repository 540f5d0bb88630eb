//! Mosque-admin provisioning.
//!
//! Creating an admin needs a second credential against the identity
//! backend, but registering one through the primary session would replace
//! the operator's own sign-in. The workflow therefore runs inside an
//! isolated [`AuthContext`] that is closed on every exit path.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use liftmosque_core::{Email, MosqueId, UserId};

use crate::auth::{AuthContext, AuthError, IdentityProvider};
use crate::error::{ConsoleError, ValidationError};
use crate::store::{Collection, DocumentStore, Fields};

/// Create a mosque-admin account: a fresh credential plus its profile
/// document keyed by the credential id. Returns the new admin's id.
///
/// The operator's own session is untouched on every outcome.
///
/// # Errors
///
/// Returns a validation error (bad email, empty password, unknown mosque)
/// before any backend call; an auth error verbatim if the provider rejects
/// the credential; a remote error if the profile write fails. No profile
/// is written unless the credential was created.
pub async fn create_admin<S, P>(
    store: &S,
    provider: &P,
    email: &str,
    password: &SecretString,
    mosque_id: &MosqueId,
) -> Result<UserId, ConsoleError>
where
    S: DocumentStore,
    P: IdentityProvider,
{
    let email = Email::parse(email).map_err(ValidationError::from)?;
    if password.expose_secret().is_empty() {
        return Err(ValidationError::EmptyField { field: "password" }.into());
    }
    if store
        .get(Collection::Mosques, mosque_id.as_str())
        .await?
        .is_none()
    {
        return Err(ValidationError::UnknownMosque(mosque_id.as_str().to_owned()).into());
    }

    let mut context = provider.open_isolated().await.map_err(auth_err)?;

    let identity = match context.create_credential(&email, password).await {
        Ok(identity) => identity,
        Err(err) => {
            context.close().await;
            return Err(auth_err(err));
        }
    };

    let write = store
        .create_with_id(
            Collection::Users,
            identity.id.as_str(),
            admin_profile_fields(mosque_id),
        )
        .await;
    context.close().await;
    write?;

    tracing::info!(admin_id = %identity.id, mosque_id = %mosque_id, "mosque admin provisioned");
    Ok(identity.id)
}

fn admin_profile_fields(mosque_id: &MosqueId) -> Fields {
    let mut fields = Fields::new();
    fields.insert("role".to_owned(), json!("mosque_admin"));
    fields.insert(
        "mosqueId".to_owned(),
        Value::String(mosque_id.as_str().to_owned()),
    );
    fields.insert("firstName".to_owned(), json!("Mosque"));
    fields.insert("lastName".to_owned(), json!("Admin"));
    fields.insert("createdAt".to_owned(), json!(Utc::now()));
    fields
}

fn auth_err(err: AuthError) -> ConsoleError {
    ConsoleError::Auth(err)
}
