//! Output resource shapes.
//!
//! Minimal FHIR `Patient` and `Observation` structures covering exactly the
//! elements the bridge emits. Field names serialize in FHIR's camelCase.

use fhirbridge_store::Scalar;
use serde::{Deserialize, Serialize};

/// A FHIR `Patient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResource {
    /// Always `"Patient"`.
    pub resource_type: String,
    /// Logical id.
    pub id: String,
    /// Names; the bridge emits exactly one.
    pub name: Vec<HumanName>,
    /// Date of birth.
    pub birth_date: Scalar,
    /// Postal addresses.
    pub address: Vec<Address>,
    /// Contact points.
    pub telecom: Vec<ContactPoint>,
}

/// A FHIR `HumanName`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    /// Family name.
    pub family: Scalar,
    /// Given names.
    pub given: Vec<Scalar>,
}

/// A FHIR `Address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// home | work | temp | old | billing
    #[serde(rename = "use")]
    pub use_: Scalar,
    /// Street lines.
    pub line: Vec<Scalar>,
    /// City.
    pub city: Scalar,
    /// Postal code, always a string.
    pub postal_code: Scalar,
    /// Country.
    pub country: Scalar,
}

/// A FHIR `ContactPoint`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    /// phone | fax | email | pager | url | sms | other
    pub system: Scalar,
    /// The actual contact point details.
    pub value: Scalar,
    /// home | work | temp | old | mobile
    #[serde(rename = "use")]
    pub use_: Scalar,
}

/// A FHIR `Observation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResource {
    /// Always `"Observation"`.
    pub resource_type: String,
    /// Logical id.
    pub id: String,
    /// Always `"final"`.
    pub status: String,
    /// Classification of the observation.
    pub category: Vec<CodeableConcept>,
    /// Who the observation is about.
    pub subject: Reference,
    /// When the result was made available.
    pub issued: Scalar,
    /// What was observed.
    pub code: CodeableConcept,
    /// The measured value.
    pub value_quantity: Quantity,
}

/// A FHIR `CodeableConcept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    /// Codes from terminology systems.
    pub coding: Vec<Coding>,
}

/// A FHIR `Coding`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    /// Terminology system URI.
    pub system: String,
    /// Code within the system.
    pub code: String,
    /// Human-readable display.
    pub display: String,
}

impl Coding {
    /// Creates a coding from static parts.
    pub fn new(system: &str, code: &str, display: &str) -> Self {
        Self {
            system: system.to_string(),
            code: code.to_string(),
            display: display.to_string(),
        }
    }
}

/// A FHIR `Reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// Literal reference, e.g. `Patient/42`.
    pub reference: String,
}

/// A FHIR `Quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numerical value, rendered as a string.
    pub value: Scalar,
    /// Unit representation.
    pub unit: String,
    /// System that defines the coded unit form.
    pub system: String,
    /// Coded form of the unit.
    pub code: String,
}
