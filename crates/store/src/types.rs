//! Raw row types as returned by the backing store.
//!
//! These mirror the store's tables one-to-one. Scalar columns are decoded into
//! [`Scalar`] so numeric and textual columns are both accepted; nested
//! collections tolerate a missing or `null` value and decode it as empty.
//! Any other shape mismatch is a decode error.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Table holding patient demographics.
pub const PATIENT_TABLE: &str = "patient";

/// Table holding patient postal addresses, keyed by `patient_id`.
pub const ADDRESS_TABLE: &str = "patient_address";

/// Table holding patient contact points, keyed by `patient_id`.
pub const TELECOM_TABLE: &str = "telecom";

/// Table holding blood glucose readings, keyed by `patient_id`.
pub const GLUCOSE_TABLE: &str = "diabetes_sugar";

/// A single scalar column value.
///
/// Serializes back to the same JSON type it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A boolean column.
    Bool(bool),
    /// An integral number.
    Integer(i64),
    /// A non-integral (or out of `i64` range) number.
    Float(f64),
    /// A text column.
    Text(String),
}

impl Scalar {
    /// Returns true for the empty string.
    ///
    /// Numbers and booleans are never empty, including `0` and `false`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Text(text) if text.is_empty())
    }

    /// Returns the text content if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{}", value),
            Scalar::Integer(value) => write!(f, "{}", value),
            Scalar::Float(value) => write_float(f, *value),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

/// Writes a float the way JavaScript's `Number#toString` does: shortest
/// round-trip digits, positional for decimal exponents in `-7 < e < 21`,
/// otherwise exponential with a signed exponent (`1e-7`, `1.5e+21`).
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value == 0.0 {
        return f.write_str("0");
    }

    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{}", value);
    };
    match exponent.parse::<i32>() {
        Ok(exp) if exp >= 21 => write!(f, "{}e+{}", mantissa, exp),
        Ok(exp) if exp <= -7 => write!(f, "{}e{}", mantissa, exp),
        _ => write!(f, "{}", value),
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

/// A `patient` row with its embedded addresses and contact points.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPatient {
    /// Primary key.
    pub id: Option<Scalar>,
    /// Given name.
    pub first_name: Option<Scalar>,
    /// Family name.
    pub last_name: Option<Scalar>,
    /// Date of birth, as stored.
    pub birthday: Option<Scalar>,
    /// Embedded `patient_address` rows.
    #[serde(default, rename = "patient_address", deserialize_with = "null_as_empty")]
    pub addresses: Vec<RawAddress>,
    /// Embedded `telecom` rows.
    #[serde(default, rename = "telecom", deserialize_with = "null_as_empty")]
    pub telecoms: Vec<RawTelecom>,
}

/// A `patient_address` row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAddress {
    /// Address use (home, work, ...).
    #[serde(rename = "use")]
    pub use_: Option<Scalar>,
    /// Street line.
    pub line: Option<Scalar>,
    /// City.
    pub city: Option<Scalar>,
    /// Postal code; may be stored as a number.
    pub postal_code: Option<Scalar>,
    /// Country.
    pub country: Option<Scalar>,
}

/// A `telecom` row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTelecom {
    /// Contact system (phone, email, ...).
    pub system: Option<Scalar>,
    /// The number or address.
    pub value: Option<Scalar>,
    /// Contact use (home, mobile, ...).
    #[serde(rename = "use")]
    pub use_: Option<Scalar>,
}

/// A `diabetes_sugar` row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawGlucoseReading {
    /// Primary key.
    pub id: Option<Scalar>,
    /// Owning patient. Not checked for existence.
    pub patient_id: Option<Scalar>,
    /// When the reading was recorded.
    pub created_at: Option<Scalar>,
    /// The measured level.
    pub sugar_level: Option<Scalar>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_patient_with_nested_rows() {
        let row = json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "birthday": "1815-12-10",
            "created_at": "2023-01-01T00:00:00Z",
            "patient_address": [
                {"id": 1, "patient_id": 7, "use": "home", "line": "12 St James's Sq",
                 "city": "London", "postal_code": 10115, "country": "UK"}
            ],
            "telecom": [
                {"system": "phone", "value": "555-0100", "use": "mobile"}
            ]
        });

        let patient: RawPatient = serde_json::from_value(row).unwrap();
        assert_eq!(patient.id, Some(Scalar::Integer(7)));
        assert_eq!(patient.addresses.len(), 1);
        assert_eq!(patient.addresses[0].postal_code, Some(Scalar::Integer(10115)));
        assert_eq!(patient.addresses[0].use_, Some(Scalar::from("home")));
        assert_eq!(patient.telecoms[0].value, Some(Scalar::from("555-0100")));
    }

    #[test]
    fn test_missing_and_null_collections_decode_as_empty() {
        let patient: RawPatient =
            serde_json::from_value(json!({"id": 1, "patient_address": null})).unwrap();
        assert!(patient.addresses.is_empty());
        assert!(patient.telecoms.is_empty());
        assert_eq!(patient.first_name, None);
    }

    #[test]
    fn test_rejects_malformed_collection() {
        let result: Result<RawPatient, _> =
            serde_json::from_value(json!({"id": 1, "telecom": "555-0100"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_nested_object_in_scalar_column() {
        let result: Result<RawGlucoseReading, _> =
            serde_json::from_value(json!({"id": 1, "sugar_level": {"mg_dl": 5}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar_display_and_emptiness() {
        assert_eq!(Scalar::Integer(42).to_string(), "42");
        assert_eq!(Scalar::Float(5.5).to_string(), "5.5");
        assert_eq!(Scalar::Float(110.0).to_string(), "110");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
        assert!(Scalar::from("").is_empty());
        assert!(!Scalar::Integer(0).is_empty());
        assert_eq!(Scalar::from("x").as_str(), Some("x"));
        assert_eq!(Scalar::Integer(1).as_str(), None);
    }

    #[test]
    fn test_scalar_roundtrips_json_type() {
        assert_eq!(serde_json::to_value(Scalar::Integer(3)).unwrap(), json!(3));
        assert_eq!(serde_json::to_value(Scalar::from("3")).unwrap(), json!("3"));
    }

    #[test]
    fn test_float_display_switches_to_exponent_at_number_limits() {
        assert_eq!(Scalar::Float(1e-7).to_string(), "1e-7");
        assert_eq!(Scalar::Float(-2.5e-8).to_string(), "-2.5e-8");
        assert_eq!(Scalar::Float(0.000001).to_string(), "0.000001");
        assert_eq!(Scalar::Float(1e20).to_string(), "100000000000000000000");
        assert_eq!(Scalar::Float(1e21).to_string(), "1e+21");
        assert_eq!(Scalar::Float(1.5e300).to_string(), "1.5e+300");
        assert_eq!(Scalar::Float(-0.0).to_string(), "0");
    }
}
