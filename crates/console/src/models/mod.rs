//! Domain types over remote documents.
//!
//! Entities deserialize straight from document field maps (camelCase wire
//! names, `id` injected from the document id). Live views must never die on
//! one malformed document, so decoding is lenient at the list level: a
//! document that fails to decode is skipped with a warning.

pub mod mosque;
pub mod report;
pub mod trip;
pub mod user;

pub use mosque::{Mosque, MosqueDraft};
pub use report::Report;
pub use trip::Trip;
pub use user::{Profile, UserAccount};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::{Collection, Document};

/// Decode a document into an entity, injecting the document id.
///
/// Returns `None` (with a warning) when the document does not have the
/// entity's shape.
pub(crate) fn decode<T: DeserializeOwned>(collection: Collection, doc: &Document) -> Option<T> {
    let mut fields = doc.fields.clone();
    fields.insert("id".to_owned(), Value::String(doc.id.clone()));
    match serde_json::from_value(Value::Object(fields)) {
        Ok(entity) => Some(entity),
        Err(err) => {
            tracing::warn!(%collection, id = %doc.id, %err, "skipping malformed document");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::Fields;

    fn doc(id: &str, value: Value) -> Document {
        let fields = match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        Document {
            id: id.to_owned(),
            fields,
        }
    }

    #[test]
    fn test_decode_injects_id() {
        let mosque: Mosque = decode(
            Collection::Mosques,
            &doc(
                "m1",
                json!({"name": "Al-Noor", "address": "12 Rue de la Paix", "lat": 48.8566, "lng": 2.3522}),
            ),
        )
        .unwrap();
        assert_eq!(mosque.id.as_str(), "m1");
        assert_eq!(mosque.name, "Al-Noor");
    }

    #[test]
    fn test_decode_malformed_returns_none() {
        // lat is a string here, not a number
        let mosque: Option<Mosque> = decode(
            Collection::Mosques,
            &doc("m1", json!({"name": "Al-Noor", "address": "x", "lat": "oops", "lng": 2.0})),
        );
        assert!(mosque.is_none());
    }
}
