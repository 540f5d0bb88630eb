//! Mosque entity and its creation form.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use liftmosque_core::{Coordinates, MosqueId};

use crate::error::ValidationError;
use crate::store::Fields;

/// A mosque as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mosque {
    pub id: MosqueId,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl Mosque {
    /// Position as a validated coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored position is out of range.
    pub fn position(&self) -> Result<Coordinates, liftmosque_core::CoordinateError> {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Raw mosque creation input, exactly as typed into the form. Coordinates
/// arrive as strings and are validated by [`MosqueDraft::validate`].
#[derive(Debug, Clone, Default)]
pub struct MosqueDraft {
    pub name: String,
    pub address: String,
    pub lat: String,
    pub lng: String,
}

impl MosqueDraft {
    /// Validate the draft into a writable record.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` for a blank name or address,
    /// and a coordinate error when lat/lng do not parse or are out of
    /// range. Nothing is written on failure.
    pub fn validate(&self) -> Result<MosqueRecord, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ValidationError::EmptyField { field: "address" });
        }
        let position = Coordinates::parse(&self.lat, &self.lng)?;
        Ok(MosqueRecord {
            name: name.to_owned(),
            address: address.to_owned(),
            position,
        })
    }
}

/// A validated mosque ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct MosqueRecord {
    pub name: String,
    pub address: String,
    pub position: Coordinates,
}

impl MosqueRecord {
    pub(crate) fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_owned(), Value::String(self.name));
        fields.insert("address".to_owned(), Value::String(self.address));
        fields.insert("lat".to_owned(), json!(self.position.lat()));
        fields.insert("lng".to_owned(), json!(self.position.lng()));
        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_parses() {
        let draft = MosqueDraft {
            name: "  Al-Noor ".to_owned(),
            address: "12 Rue de la Paix".to_owned(),
            lat: "48.8566".to_owned(),
            lng: "2.3522".to_owned(),
        };
        let record = draft.validate().unwrap();
        assert_eq!(record.name, "Al-Noor");
        assert!((record.position.lat() - 48.8566).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let draft = MosqueDraft {
            name: "   ".to_owned(),
            address: "somewhere".to_owned(),
            lat: "0".to_owned(),
            lng: "0".to_owned(),
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::EmptyField { field: "name" })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_coordinates() {
        let draft = MosqueDraft {
            name: "Al-Noor".to_owned(),
            address: "somewhere".to_owned(),
            lat: "not-a-number".to_owned(),
            lng: "2.0".to_owned(),
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::Coordinates(_))
        ));
    }
}
