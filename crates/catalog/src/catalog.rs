//! The fixed, read-only table registry the executor and validator run against.

mod builder;
mod seed;
mod types;

pub use builder::CatalogBuilder;
pub use types::{Catalog, CatalogError, TableSummary};
