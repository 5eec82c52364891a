//! Patient read handler.

use axum::response::Response;
use fhirbridge_store::DataStore;
use tracing::debug;

use crate::error::RestResult;
use crate::fetcher::Fetcher;
use crate::mapper::map_patient;
use crate::responses::fhir_data_response;

/// Reads patient `id` and renders it as `{ "fhirData": Patient }`.
///
/// # Errors
///
/// - [`RestError::NotFound`](crate::error::RestError::NotFound) when no row matches
/// - [`RestError::Fetch`](crate::error::RestError::Fetch) when the store query fails
/// - [`RestError::Timeout`](crate::error::RestError::Timeout) when the store does not answer in time
pub async fn read_patient<S>(fetcher: &Fetcher<'_, S>, id: &str) -> RestResult<Response>
where
    S: DataStore + ?Sized,
{
    debug!(patient_id = %id, "Processing patient read");

    let rows = fetcher.fetch_patient(id).await?;
    let patient = map_patient(&rows, id)?;

    debug!(
        patient_id = %id,
        addresses = patient.address.len(),
        telecoms = patient.telecom.len(),
        "Patient mapped"
    );
    Ok(fhir_data_response(patient))
}
