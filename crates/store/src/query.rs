//! Read query model.
//!
//! A [`Query`] names a table, the columns to return, any child tables to embed,
//! and a conjunction of equality filters. Backends translate it into their own
//! dialect; [`Query::to_query_pairs`] gives the PostgREST form.

/// An equality filter on a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Column name.
    pub column: String,
    /// Value the column must equal, compared as text.
    pub value: String,
}

/// A read query against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    columns: Vec<String>,
    embeds: Vec<String>,
    filters: Vec<Filter>,
}

impl Query {
    /// Starts a query selecting every column of `table`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            embeds: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Restricts the returned columns.
    #[must_use]
    pub fn select<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Embeds all rows of a child table that reference each returned row.
    #[must_use]
    pub fn embed(mut self, table: impl Into<String>) -> Self {
        self.embeds.push(table.into());
        self
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// The queried table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Explicitly selected columns; empty means all columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Embedded child tables.
    pub fn embeds(&self) -> &[String] {
        &self.embeds
    }

    /// Equality filters, all of which must hold.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Renders the PostgREST `select` parameter, e.g. `*,telecom(*)`.
    pub fn select_clause(&self) -> String {
        let mut parts: Vec<String> = if self.columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.columns.clone()
        };
        parts.extend(self.embeds.iter().map(|table| format!("{}(*)", table)));
        parts.join(",")
    }

    /// Renders the query string pairs for a PostgREST request.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select_clause())];
        pairs.extend(
            self.filters
                .iter()
                .map(|filter| (filter.column.clone(), format!("eq.{}", filter.value))),
        );
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_with_embeds() {
        let query = Query::from_table("patient")
            .embed("patient_address")
            .embed("telecom")
            .eq("id", "5");

        assert_eq!(query.table(), "patient");
        assert_eq!(query.select_clause(), "*,patient_address(*),telecom(*)");
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("select".to_string(), "*,patient_address(*),telecom(*)".to_string()),
                ("id".to_string(), "eq.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_explicit_columns() {
        let query = Query::from_table("diabetes_sugar")
            .select(["id", "patient_id", "created_at", "sugar_level"])
            .eq("patient_id", "9");

        assert_eq!(query.select_clause(), "id,patient_id,created_at,sugar_level");
        assert_eq!(query.filters()[0].column, "patient_id");
        assert_eq!(query.filters()[0].value, "9");
        assert!(query.embeds().is_empty());
    }
}
