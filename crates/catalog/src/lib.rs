pub mod catalog;
pub mod condition;
pub mod executor;
pub mod plan;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, TableSummary};
pub use condition::ConditionEvaluator;
pub use executor::QueryExecutor;
pub use plan::{
    AggregateFn, Comparison, CompareOp, FilterExpr, GroupFn, PlanParseError, PseudoQuery,
};
