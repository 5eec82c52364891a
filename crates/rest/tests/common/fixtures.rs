//! Seed rows and caller tokens.

use fhirbridge_store::Identity;
use fhirbridge_store::backends::memory::{InMemoryBackend, StaticIdentityProvider};
use fhirbridge_store::types::{ADDRESS_TABLE, GLUCOSE_TABLE, PATIENT_TABLE, TELECOM_TABLE};
use serde_json::json;

/// Token of a caller not linked to any patient.
pub const CLINICIAN_TOKEN: &str = "clinician-token";

/// Token of a caller linked to patient 123.
pub const PATIENT_TOKEN: &str = "patient-123-token";

/// Builds the identity provider used by every test.
pub fn identities() -> StaticIdentityProvider {
    StaticIdentityProvider::new()
        .with_user(
            CLINICIAN_TOKEN,
            Identity::new("user-clinician").with_email("clinician@example.org"),
        )
        .with_user(
            PATIENT_TOKEN,
            Identity::new("user-patient").with_patient_id("123"),
        )
}

/// Seeds patient 123 with one address, one contact point, and two glucose
/// readings, plus a sparse patient 456 with no children.
pub fn seed(backend: &InMemoryBackend) {
    backend.insert(
        PATIENT_TABLE,
        json!({
            "id": 123,
            "first_name": "Ann",
            "last_name": "Lee",
            "birthday": "1990-01-01"
        }),
    );
    backend.insert(
        ADDRESS_TABLE,
        json!({
            "patient_id": 123,
            "use": "home",
            "line": "1 Main St",
            "city": "Springfield",
            "postal_code": 12345,
            "country": "US"
        }),
    );
    backend.insert(
        TELECOM_TABLE,
        json!({
            "patient_id": 123,
            "system": "phone",
            "value": "555-0100",
            "use": "mobile"
        }),
    );
    backend.insert(
        GLUCOSE_TABLE,
        json!({
            "id": 9,
            "patient_id": 123,
            "created_at": "2024-03-01T10:00:00Z",
            "sugar_level": 110
        }),
    );
    backend.insert(
        GLUCOSE_TABLE,
        json!({
            "id": 10,
            "patient_id": 123,
            "created_at": "2024-03-02T10:00:00Z",
            "sugar_level": null
        }),
    );

    backend.insert(
        PATIENT_TABLE,
        json!({
            "id": 456,
            "first_name": "",
            "last_name": null
        }),
    );
}
