use askdb_core::Record;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("table '{0}' is registered twice")]
    DuplicateTable(String),
    #[error("table '{table}': row {row} does not share the field set of row 0")]
    InconsistentFields { table: String, row: usize },
}

/// Named tables of records, in registration order.
///
/// Built once at startup and shared read-only; nothing in the crate
/// mutates a catalog after construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(super) tables: IndexMap<String, Vec<Record>>,
}

/// Shape of one table, for listings and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub row_count: usize,
    pub fields: Vec<String>,
}

impl Catalog {
    /// Rows of a table in insertion order.
    pub fn table(&self, name: &str) -> Option<&[Record]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// First row of a table, used as the schema sample.
    pub fn sample_row(&self, name: &str) -> Option<&Record> {
        self.tables.get(name).and_then(|rows| rows.first())
    }

    /// Field names of a table, taken from its sample row.
    pub fn fields(&self, name: &str) -> Vec<&str> {
        self.sample_row(name)
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> Vec<TableSummary> {
        self.tables
            .iter()
            .map(|(name, rows)| TableSummary {
                name: name.clone(),
                row_count: rows.len(),
                fields: self.fields(name).into_iter().map(str::to_string).collect(),
            })
            .collect()
    }
}
