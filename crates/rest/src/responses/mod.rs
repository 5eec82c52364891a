//! Response envelopes.
//!
//! Successful reads are wrapped as `{ "fhirData": ... }`. Preflight requests
//! are acknowledged with a plain `ok` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body of a preflight acknowledgement.
pub const PREFLIGHT_BODY: &str = "ok";

/// Success envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FhirData<T> {
    /// The mapped resource or resources.
    pub fhir_data: T,
}

impl<T> FhirData<T> {
    /// Wraps `fhir_data`.
    pub fn new(fhir_data: T) -> Self {
        Self { fhir_data }
    }
}

/// Renders `200 { "fhirData": data }`.
pub fn fhir_data_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(FhirData::new(data))).into_response()
}

/// Renders the preflight acknowledgement.
pub fn preflight_response() -> Response {
    (StatusCode::OK, PREFLIGHT_BODY).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_uses_camel_case_key() {
        let value = serde_json::to_value(FhirData::new(vec![1, 2])).unwrap();
        assert_eq!(value, json!({ "fhirData": [1, 2] }));
    }

    #[test]
    fn test_response_statuses() {
        assert_eq!(fhir_data_response(json!({})).status(), StatusCode::OK);
        assert_eq!(preflight_response().status(), StatusCode::OK);
    }
}
