//! Glucose observations handler.

use axum::response::Response;
use fhirbridge_store::DataStore;
use tracing::debug;

use crate::error::RestResult;
use crate::fetcher::Fetcher;
use crate::mapper::{ObservationIdSource, map_glucose_observations};
use crate::responses::fhir_data_response;

/// Reads every glucose reading for patient `id` and renders them as
/// `{ "fhirData": [Observation] }`.
///
/// A patient with no readings yields an empty list, not an error.
pub async fn read_glucose<S>(
    fetcher: &Fetcher<'_, S>,
    id: &str,
    id_source: ObservationIdSource,
) -> RestResult<Response>
where
    S: DataStore + ?Sized,
{
    debug!(patient_id = %id, "Processing glucose read");

    let rows = fetcher.fetch_glucose(id).await?;
    let observations = map_glucose_observations(&rows, id_source);

    debug!(patient_id = %id, count = observations.len(), "Observations mapped");
    Ok(fhir_data_response(observations))
}
