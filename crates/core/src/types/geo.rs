//! Geographic coordinates with validation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CoordinateError {
    /// The input string could not be parsed as a number.
    #[error("{field} is not a valid number: {value:?}")]
    NotANumber {
        /// Which coordinate failed ("latitude" or "longitude").
        field: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The value parsed but is NaN or infinite.
    #[error("{field} must be finite")]
    NotFinite {
        /// Which coordinate failed ("latitude" or "longitude").
        field: &'static str,
    },
    /// The value is outside the legal range for its axis.
    #[error("{field} {value} is out of range ({min} to {max})")]
    OutOfRange {
        /// Which coordinate failed ("latitude" or "longitude").
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Minimum legal value.
        min: f64,
        /// Maximum legal value.
        max: f64,
    },
}

/// A validated latitude/longitude pair.
///
/// Every mosque carries one of these; construction guarantees both values
/// are finite and within range, so downstream code never re-checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Build coordinates from already-numeric values.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::NotFinite` for NaN or infinite input and
    /// `CoordinateError::OutOfRange` for values outside ±90 / ±180.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() {
            return Err(CoordinateError::NotFinite { field: "latitude" });
        }
        if !lng.is_finite() {
            return Err(CoordinateError::NotFinite { field: "longitude" });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::OutOfRange {
                field: "latitude",
                value: lat,
                min: -90.0,
                max: 90.0,
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::OutOfRange {
                field: "longitude",
                value: lng,
                min: -180.0,
                max: 180.0,
            });
        }
        Ok(Self { lat, lng })
    }

    /// Parse coordinates from form-style string input.
    ///
    /// Whitespace is trimmed; anything `str::parse::<f64>` rejects is an
    /// error (no partial `parseFloat`-style prefixes).
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::NotANumber` for unparseable input, plus
    /// everything [`Coordinates::new`] rejects.
    pub fn parse(lat: &str, lng: &str) -> Result<Self, CoordinateError> {
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoordinateError::NotANumber {
                field: "latitude",
                value: lat.to_owned(),
            })?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| CoordinateError::NotANumber {
                field: "longitude",
                value: lng.to_owned(),
            })?;
        Self::new(lat, lng)
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let c = Coordinates::parse("48.8566", "2.3522").unwrap();
        assert!((c.lat() - 48.8566).abs() < 1e-9);
        assert!((c.lng() - 2.3522).abs() < 1e-9);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let c = Coordinates::parse(" 21.4225 ", " 39.8262").unwrap();
        assert!((c.lat() - 21.4225).abs() < 1e-9);
    }

    #[test]
    fn test_parse_not_a_number() {
        let err = Coordinates::parse("not-a-number", "2.0").unwrap_err();
        assert!(matches!(
            err,
            CoordinateError::NotANumber {
                field: "latitude",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_rejects_partial_numbers() {
        // parseFloat("48.8abc") would yield 48.8; we refuse it outright.
        assert!(Coordinates::parse("48.8abc", "2.0").is_err());
    }

    #[test]
    fn test_new_rejects_nan_and_infinity() {
        assert!(matches!(
            Coordinates::new(f64::NAN, 0.0),
            Err(CoordinateError::NotFinite { field: "latitude" })
        ));
        assert!(matches!(
            Coordinates::new(0.0, f64::INFINITY),
            Err(CoordinateError::NotFinite { field: "longitude" })
        ));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn test_display() {
        let c = Coordinates::new(48.8566, 2.3522).unwrap();
        assert_eq!(format!("{c}"), "(48.8566, 2.3522)");
    }
}
