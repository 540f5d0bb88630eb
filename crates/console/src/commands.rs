//! Validated mutation commands.
//!
//! Every command validates fully before touching the store; a validation
//! failure writes nothing. Remote failures are surfaced once and never
//! retried. No command refetches after a write: open live views pick the
//! change up through their snapshot channels.

use chrono::Utc;
use serde_json::{Value, json};

use liftmosque_core::{MosqueId, ReportId, TripId, UserId};

use crate::error::{ConsoleError, ValidationError};
use crate::models::{MosqueDraft, Report, decode};
use crate::store::{Collection, DocumentStore, Fields};

/// Create a mosque from form input; returns the new id.
///
/// # Errors
///
/// Returns a validation error (blank name/address, unparseable or
/// out-of-range coordinates) before any remote call, or a remote error if
/// the write fails.
pub async fn create_mosque<S: DocumentStore>(
    store: &S,
    draft: &MosqueDraft,
) -> Result<MosqueId, ConsoleError> {
    let record = draft.validate()?;
    let id = store.create(Collection::Mosques, record.into_fields()).await?;
    tracing::info!(mosque_id = %id, "mosque created");
    Ok(MosqueId::new(id))
}

/// Overwrite a mosque's fields from form input.
///
/// # Errors
///
/// Returns a validation error before any remote call, `NotFound` if the
/// mosque does not exist, or a remote error if the write fails.
pub async fn update_mosque<S: DocumentStore>(
    store: &S,
    id: &MosqueId,
    draft: &MosqueDraft,
) -> Result<(), ConsoleError> {
    let record = draft.validate()?;
    store
        .update(Collection::Mosques, id.as_str(), record.into_fields())
        .await
        .map_err(remote_not_found(Collection::Mosques, id.as_str()))?;
    tracing::info!(mosque_id = %id, "mosque updated");
    Ok(())
}

/// Delete a mosque. Irreversible; trips and profiles referencing it keep
/// their now dangling `mosqueId`.
///
/// # Errors
///
/// Returns a remote error if the write fails.
pub async fn delete_mosque<S: DocumentStore>(
    store: &S,
    id: &MosqueId,
) -> Result<(), ConsoleError> {
    store.delete(Collection::Mosques, id.as_str()).await?;
    tracing::info!(mosque_id = %id, "mosque deleted");
    Ok(())
}

/// Delete a trip. Irreversible.
///
/// # Errors
///
/// Returns a remote error if the write fails.
pub async fn delete_trip<S: DocumentStore>(store: &S, id: &TripId) -> Result<(), ConsoleError> {
    store.delete(Collection::Trips, id.as_str()).await?;
    tracing::info!(trip_id = %id, "trip deleted");
    Ok(())
}

/// Delete a user document. Irreversible; the user's credential, trips and
/// reports are untouched.
///
/// # Errors
///
/// Returns a remote error if the write fails.
pub async fn delete_user<S: DocumentStore>(store: &S, id: &UserId) -> Result<(), ConsoleError> {
    store.delete(Collection::Users, id.as_str()).await?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(())
}

/// Respond to a pending report: record the admin's message and advance the
/// status to alerted.
///
/// # Errors
///
/// Returns a validation error for a blank message, `NotFound` for a
/// missing report, `StateConflict` if the report was already alerted (the
/// existing response is left untouched), or a remote error if the write
/// fails.
pub async fn respond_to_report<S: DocumentStore>(
    store: &S,
    id: &ReportId,
    message: &str,
) -> Result<(), ConsoleError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ValidationError::EmptyField { field: "message" }.into());
    }

    let doc = store
        .get(Collection::Reports, id.as_str())
        .await?
        .ok_or_else(|| ConsoleError::NotFound(format!("report {id}")))?;
    let report: Report = decode(Collection::Reports, &doc).ok_or_else(|| {
        ConsoleError::Remote(crate::store::StoreError::DataCorruption(format!(
            "report {id} has an unexpected shape"
        )))
    })?;

    // Guard before the write: a second response must not overwrite the
    // first one.
    if !report.is_pending() {
        return Err(ConsoleError::StateConflict(format!(
            "report {id} was already responded to"
        )));
    }

    let mut fields = Fields::new();
    fields.insert("status".to_owned(), json!("alerted"));
    fields.insert("adminComment".to_owned(), Value::String(message.to_owned()));
    fields.insert("respondedAt".to_owned(), json!(Utc::now()));
    fields.insert("isRead".to_owned(), Value::Bool(false));
    store.update(Collection::Reports, id.as_str(), fields).await?;
    tracing::info!(report_id = %id, "report responded");
    Ok(())
}

fn remote_not_found(
    collection: Collection,
    id: &str,
) -> impl FnOnce(crate::store::StoreError) -> ConsoleError + '_ {
    move |err| match err {
        crate::store::StoreError::NotFound { .. } => {
            ConsoleError::NotFound(format!("{collection}/{id}"))
        }
        other => ConsoleError::Remote(other),
    }
}
