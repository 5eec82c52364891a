//! Data Fetcher.
//!
//! Issues the two queries the bridge needs and decodes the rows into typed
//! records. Every store call is bounded by the upstream timeout. No row
//! shaping happens here; that is the mapper's job.

use std::time::Duration;

use fhirbridge_store::types::{ADDRESS_TABLE, GLUCOSE_TABLE, PATIENT_TABLE, TELECOM_TABLE};
use fhirbridge_store::{
    AccessToken, DataStore, Query, RawGlucoseReading, RawPatient, StoreError, StoreResult,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Columns selected from the glucose table.
pub const GLUCOSE_COLUMNS: [&str; 4] = ["id", "patient_id", "created_at", "sugar_level"];

/// Builds the patient query: the row with `id`, plus its addresses and
/// contact points.
pub fn patient_query(id: &str) -> Query {
    Query::from_table(PATIENT_TABLE)
        .embed(ADDRESS_TABLE)
        .embed(TELECOM_TABLE)
        .eq("id", id)
}

/// Builds the glucose query: every reading for `patient_id`.
pub fn glucose_query(patient_id: &str) -> Query {
    Query::from_table(GLUCOSE_TABLE)
        .select(GLUCOSE_COLUMNS)
        .eq("patient_id", patient_id)
}

/// Runs queries on behalf of one caller.
pub struct Fetcher<'a, S: ?Sized> {
    store: &'a S,
    token: &'a AccessToken,
    timeout: Duration,
}

impl<'a, S> Fetcher<'a, S>
where
    S: DataStore + ?Sized,
{
    /// Creates a fetcher that forwards `token` and bounds each call by `timeout`.
    pub fn new(store: &'a S, token: &'a AccessToken, timeout: Duration) -> Self {
        Self {
            store,
            token,
            timeout,
        }
    }

    /// Fetches the patient rows matching `id`.
    pub async fn fetch_patient(&self, id: &str) -> StoreResult<Vec<RawPatient>> {
        self.run(patient_query(id)).await
    }

    /// Fetches every glucose reading for patient `id`.
    pub async fn fetch_glucose(&self, id: &str) -> StoreResult<Vec<RawGlucoseReading>> {
        self.run(glucose_query(id)).await
    }

    async fn run<T: DeserializeOwned>(&self, query: Query) -> StoreResult<Vec<T>> {
        let table = query.table().to_string();
        debug!(table = %table, backend = self.store.backend_name(), "Fetching rows");

        let rows = tokio::time::timeout(self.timeout, self.store.select(self.token, &query))
            .await
            .map_err(|_| StoreError::Timeout {
                operation: format!("select {}", table),
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| StoreError::decode(&table, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fhirbridge_store::Scalar;
    use fhirbridge_store::backends::memory::InMemoryBackend;
    use serde_json::{Value, json};

    struct StalledStore;

    #[async_trait]
    impl DataStore for StalledStore {
        fn backend_name(&self) -> &'static str {
            "stalled"
        }

        async fn select(&self, _token: &AccessToken, _query: &Query) -> StoreResult<Vec<Value>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    fn token() -> AccessToken {
        AccessToken::new("t")
    }

    #[test]
    fn test_queries_target_expected_tables() {
        assert_eq!(
            patient_query("5").to_query_pairs(),
            vec![
                ("select".to_string(), "*,patient_address(*),telecom(*)".to_string()),
                ("id".to_string(), "eq.5".to_string()),
            ]
        );
        assert_eq!(
            glucose_query("5").to_query_pairs(),
            vec![
                ("select".to_string(), "id,patient_id,created_at,sugar_level".to_string()),
                ("patient_id".to_string(), "eq.5".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetches_typed_patient_rows() {
        let store = InMemoryBackend::new();
        store.insert("patient", json!({"id": 5, "first_name": "Jane"}));
        store.insert("telecom", json!({"patient_id": 5, "system": "phone"}));

        let token = token();
        let fetcher = Fetcher::new(&store, &token, Duration::from_secs(1));
        let rows = fetcher.fetch_patient("5").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].first_name, Some(Scalar::from("Jane")));
        assert_eq!(rows[0].telecoms.len(), 1);
        assert!(rows[0].addresses.is_empty());
    }

    #[tokio::test]
    async fn test_fetches_glucose_rows_for_patient_only() {
        let store = InMemoryBackend::new();
        store.insert("diabetes_sugar", json!({"id": 1, "patient_id": 5, "sugar_level": 5.1}));
        store.insert("diabetes_sugar", json!({"id": 2, "patient_id": 6, "sugar_level": 9.3}));

        let token = token();
        let rows = Fetcher::new(&store, &token, Duration::from_secs(1))
            .fetch_glucose("5")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sugar_level, Some(Scalar::Float(5.1)));
    }

    #[tokio::test]
    async fn test_malformed_rows_are_decode_errors() {
        let store = InMemoryBackend::new();
        store.insert("diabetes_sugar", json!({"id": [1], "patient_id": 5}));

        let token = token();
        let err = Fetcher::new(&store, &token, Duration::from_secs(1))
            .fetch_glucose("5")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Decode { ref table, .. } if table == "diabetes_sugar"));
    }

    #[tokio::test]
    async fn test_store_failure_is_passed_through() {
        let store = InMemoryBackend::new();
        store.set_failure(Some("permission denied for table patient"));

        let token = token();
        let err = Fetcher::new(&store, &token, Duration::from_secs(1))
            .fetch_patient("1")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "permission denied for table patient");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_times_out() {
        let token = token();
        let err = Fetcher::new(&StalledStore, &token, Duration::from_millis(250))
            .fetch_patient("1")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::Timeout {
                operation: "select patient".to_string(),
                timeout_ms: 250,
            }
        );
    }
}
