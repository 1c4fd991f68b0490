use std::collections::BTreeSet;

use askdb_core::Record;
use indexmap::IndexMap;
use tracing::info;

use super::seed;
use super::types::{Catalog, CatalogError};

/// Collects tables and checks that every row of a table carries the same
/// field set before handing out an immutable [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    tables: Vec<(String, Vec<Record>)>,
}

impl CatalogBuilder {
    pub fn table(mut self, name: impl Into<String>, rows: Vec<Record>) -> Self {
        self.tables.push((name.into(), rows));
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut tables = IndexMap::with_capacity(self.tables.len());

        for (name, rows) in self.tables {
            if let Some(first) = rows.first() {
                let expected: BTreeSet<&str> = first.keys().map(String::as_str).collect();
                for (idx, row) in rows.iter().enumerate().skip(1) {
                    let fields: BTreeSet<&str> = row.keys().map(String::as_str).collect();
                    if fields != expected {
                        return Err(CatalogError::InconsistentFields {
                            table: name,
                            row: idx,
                        });
                    }
                }
            }

            if tables.contains_key(&name) {
                return Err(CatalogError::DuplicateTable(name));
            }
            tables.insert(name, rows);
        }

        Ok(Catalog { tables })
    }
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The fixed analytics dataset: `sales` and `customers`.
    pub fn seeded() -> Self {
        let catalog = Catalog {
            tables: seed::tables(),
        };
        info!(
            "Catalog seeded: {}",
            catalog
                .tables
                .iter()
                .map(|(name, rows)| format!("{} ({} rows)", name, rows.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        catalog
    }
}
