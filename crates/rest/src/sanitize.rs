//! Leaf-value normalization.
//!
//! Every scalar that reaches a mapped resource goes through [`sanitize`]; it
//! is the only place missing data is handled.

use fhirbridge_store::Scalar;

/// Placeholder emitted for missing, null, or empty values.
pub const UNKNOWN: &str = "Unknown";

/// Normalizes a raw column value for output.
///
/// - missing, `null`, or `""` becomes [`UNKNOWN`];
/// - with `identifier` set, any other value becomes its string form;
/// - otherwise the value is returned unchanged.
///
/// ```rust
/// use fhirbridge_rest::sanitize::sanitize;
/// use fhirbridge_store::Scalar;
///
/// assert_eq!(sanitize(None, false), Scalar::from("Unknown"));
/// assert_eq!(sanitize(Some(&Scalar::Integer(42)), true), Scalar::from("42"));
/// assert_eq!(sanitize(Some(&Scalar::Integer(42)), false), Scalar::Integer(42));
/// ```
pub fn sanitize(value: Option<&Scalar>, identifier: bool) -> Scalar {
    match value {
        None => Scalar::from(UNKNOWN),
        Some(value) if value.is_empty() => Scalar::from(UNKNOWN),
        Some(value) if identifier => Scalar::Text(value.to_string()),
        Some(value) => value.clone(),
    }
}

/// Sanitizes an identifier and returns it as a plain string.
pub fn sanitize_id(value: Option<&Scalar>) -> String {
    sanitize(value, true).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_empty_become_unknown() {
        for identifier in [false, true] {
            assert_eq!(sanitize(None, identifier), Scalar::from("Unknown"));
            assert_eq!(
                sanitize(Some(&Scalar::from("")), identifier),
                Scalar::from("Unknown")
            );
        }
    }

    #[test]
    fn test_non_identifier_values_pass_through() {
        let values = [
            Scalar::from("Jane"),
            Scalar::Integer(0),
            Scalar::Float(6.2),
            Scalar::Bool(false),
            Scalar::from(" "),
        ];
        for value in values {
            assert_eq!(sanitize(Some(&value), false), value);
        }
    }

    #[test]
    fn test_identifiers_are_stringified() {
        assert_eq!(sanitize(Some(&Scalar::Integer(42)), true), Scalar::from("42"));
        assert_eq!(sanitize(Some(&Scalar::Float(7.5)), true), Scalar::from("7.5"));
        assert_eq!(sanitize(Some(&Scalar::from("abc")), true), Scalar::from("abc"));
        assert_eq!(sanitize_id(Some(&Scalar::Integer(10115))), "10115");
        assert_eq!(sanitize_id(None), "Unknown");
    }
}
