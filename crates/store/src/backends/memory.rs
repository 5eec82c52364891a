//! In-memory backend.
//!
//! Holds table rows as JSON objects and evaluates [`Query`] the way PostgREST
//! would for the subset of features the bridge uses: column projection,
//! equality filters, and one-level embedding of child tables linked through a
//! `{parent_table}_id` column.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::{AccessToken, DataStore, Identity, IdentityProvider};
use crate::error::{AuthError, StoreError, StoreResult};
use crate::query::Query;

/// A [`DataStore`] backed by in-memory tables.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    failure: RwLock<Option<String>>,
    queries: AtomicUsize,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to `table`, creating the table if needed.
    pub fn insert(&self, table: &str, row: Value) {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Makes every subsequent query fail with `message`, or clears the failure.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.write() = message.map(String::from);
    }

    /// Number of queries executed so far, including failed ones.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn rows_matching(&self, table: &str, column: &str, value: &str) -> Vec<Value> {
        self.tables
            .read()
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| column_text(row, column).as_deref() == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataStore for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, _token: &AccessToken, query: &Query) -> StoreResult<Vec<Value>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure.read().clone() {
            return Err(StoreError::Query {
                table: query.table().to_string(),
                status: None,
                message,
            });
        }

        let rows: Vec<Value> = self
            .tables
            .read()
            .get(query.table())
            .cloned()
            .unwrap_or_default();

        let foreign_key = format!("{}_id", query.table());
        let mut result = Vec::new();

        for row in rows {
            let matches = query.filters().iter().all(|filter| {
                column_text(&row, &filter.column).as_deref() == Some(filter.value.as_str())
            });
            if !matches {
                continue;
            }

            let mut projected = project(&row, query.columns());
            if let Some(parent_id) = column_text(&row, "id") {
                for embed in query.embeds() {
                    let children = self.rows_matching(embed, &foreign_key, &parent_id);
                    projected.insert(embed.clone(), Value::Array(children));
                }
            }
            result.push(Value::Object(projected));
        }

        debug!(table = %query.table(), rows = result.len(), "In-memory select");
        Ok(result)
    }
}

/// Renders a column as text for comparison, the way a URL filter value would.
fn column_text(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn project(row: &Value, columns: &[String]) -> Map<String, Value> {
    let Some(object) = row.as_object() else {
        return Map::new();
    };
    if columns.is_empty() {
        return object.clone();
    }
    columns
        .iter()
        .filter_map(|column| object.get(column).map(|value| (column.clone(), value.clone())))
        .collect()
}

/// An [`IdentityProvider`] with a fixed token-to-identity table.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    users: RwLock<HashMap<String, Identity>>,
}

impl StaticIdentityProvider {
    /// Creates a provider that knows no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `identity` under `token`.
    #[must_use]
    pub fn with_user(self, token: &str, identity: Identity) -> Self {
        self.users.write().insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn get_user(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        self.users
            .read()
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken("unknown token".to_string()))
    }
}
