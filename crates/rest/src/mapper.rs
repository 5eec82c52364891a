//! Raw rows to FHIR resources.
//!
//! Pure functions: the same input always yields structurally equal output,
//! and every leaf passes through [`sanitize`].

use clap::ValueEnum;
use fhirbridge_store::{RawAddress, RawGlucoseReading, RawPatient, RawTelecom, Scalar};
use thiserror::Error;
use tracing::warn;

use crate::fhir_types::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, ObservationResource,
    PatientResource, Quantity, Reference,
};
use crate::sanitize::{sanitize, sanitize_id};

/// Fixed codings emitted on every glucose observation.
///
/// Existing consumers match on these exact values, including the LOINC code,
/// which identifies aerobic exercise intensity rather than a glucose level.
pub mod codes {
    /// Observation category code system.
    pub const CATEGORY_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/observation-category";
    /// Observation category code.
    pub const CATEGORY_CODE: &str = "activity";
    /// Observation category display.
    pub const CATEGORY_DISPLAY: &str = "Activity";
    /// LOINC system URI.
    pub const LOINC_SYSTEM: &str = "http://loinc.org";
    /// Observation code.
    pub const OBSERVATION_CODE: &str = "82288-2";
    /// Observation code display.
    pub const OBSERVATION_DISPLAY: &str = "Absolute aerobic exercise intensity";
    /// UCUM system URI.
    pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";
    /// Quantity unit and unit code.
    pub const UNIT: &str = "min";
    /// Observation status.
    pub const STATUS_FINAL: &str = "final";
}

/// Which column becomes the `Observation` id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ObservationIdSource {
    /// The reading's `patient_id`. Every observation of a patient shares
    /// the same id; existing consumers expect this.
    #[default]
    Patient,
    /// The reading's own `id`.
    Reading,
}

impl ObservationIdSource {
    fn column<'a>(self, raw: &'a RawGlucoseReading) -> Option<&'a Scalar> {
        match self {
            ObservationIdSource::Patient => raw.patient_id.as_ref(),
            ObservationIdSource::Reading => raw.id.as_ref(),
        }
    }
}

/// Failures while mapping a query result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The query returned no record for the requested id.
    #[error("{resource_type}/{id} not found")]
    NotFound {
        /// Resource type that was requested.
        resource_type: &'static str,
        /// Requested id.
        id: String,
    },
}

/// Maps a patient query result to a `Patient`.
///
/// Uses the first row; extra rows are logged and ignored.
///
/// # Errors
///
/// [`MappingError::NotFound`] when `rows` is empty.
pub fn map_patient(rows: &[RawPatient], requested_id: &str) -> Result<PatientResource, MappingError> {
    let Some(first) = rows.first() else {
        return Err(MappingError::NotFound {
            resource_type: "Patient",
            id: requested_id.to_string(),
        });
    };
    if rows.len() > 1 {
        warn!(
            id = %requested_id,
            rows = rows.len(),
            "Patient query returned more than one row; using the first"
        );
    }
    Ok(map_patient_record(first))
}

/// Maps a single patient row.
pub fn map_patient_record(raw: &RawPatient) -> PatientResource {
    PatientResource {
        resource_type: "Patient".to_string(),
        id: sanitize_id(raw.id.as_ref()),
        name: vec![HumanName {
            family: sanitize(raw.last_name.as_ref(), false),
            given: vec![sanitize(raw.first_name.as_ref(), false)],
        }],
        birth_date: sanitize(raw.birthday.as_ref(), false),
        address: raw.addresses.iter().map(map_address).collect(),
        telecom: raw.telecoms.iter().map(map_telecom).collect(),
    }
}

fn map_address(raw: &RawAddress) -> Address {
    Address {
        use_: sanitize(raw.use_.as_ref(), false),
        line: vec![sanitize(raw.line.as_ref(), false)],
        city: sanitize(raw.city.as_ref(), false),
        postal_code: sanitize(raw.postal_code.as_ref(), true),
        country: sanitize(raw.country.as_ref(), false),
    }
}

fn map_telecom(raw: &RawTelecom) -> ContactPoint {
    ContactPoint {
        system: sanitize(raw.system.as_ref(), false),
        value: sanitize(raw.value.as_ref(), false),
        use_: sanitize(raw.use_.as_ref(), false),
    }
}

/// Maps glucose readings to `Observation`s, one per row, in order.
pub fn map_glucose_observations(
    rows: &[RawGlucoseReading],
    id_source: ObservationIdSource,
) -> Vec<ObservationResource> {
    rows.iter()
        .map(|raw| map_glucose_observation(raw, id_source))
        .collect()
}

/// Maps a single glucose reading.
pub fn map_glucose_observation(
    raw: &RawGlucoseReading,
    id_source: ObservationIdSource,
) -> ObservationResource {
    ObservationResource {
        resource_type: "Observation".to_string(),
        id: sanitize_id(id_source.column(raw)),
        status: codes::STATUS_FINAL.to_string(),
        category: vec![CodeableConcept {
            coding: vec![Coding::new(
                codes::CATEGORY_SYSTEM,
                codes::CATEGORY_CODE,
                codes::CATEGORY_DISPLAY,
            )],
        }],
        subject: Reference {
            reference: format!("Patient/{}", sanitize_id(raw.patient_id.as_ref())),
        },
        issued: sanitize(raw.created_at.as_ref(), false),
        code: CodeableConcept {
            coding: vec![Coding::new(
                codes::LOINC_SYSTEM,
                codes::OBSERVATION_CODE,
                codes::OBSERVATION_DISPLAY,
            )],
        },
        value_quantity: Quantity {
            value: sanitize(raw.sugar_level.as_ref(), true),
            unit: codes::UNIT.to_string(),
            system: codes::UCUM_SYSTEM.to_string(),
            code: codes::UNIT.to_string(),
        },
    }
}
