//! Row filtering for WHERE clauses.
//!
//! `>=` and `<=` compare the textual forms of both sides, which orders ISO
//! dates correctly and is applied the same way to every field type, so
//! numeric fields order lexicographically (`"450" >= "1200"`). `=` is
//! coercive: a number equals a string holding the same number.

use askdb_core::Record;

use crate::plan::{CompareOp, Comparison, FilterExpr};

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// True when every comparison holds for the record. An empty filter
    /// matches everything.
    pub fn matches(record: &Record, filter: &FilterExpr) -> bool {
        filter
            .comparisons()
            .iter()
            .all(|cmp| Self::holds(record, cmp))
    }

    /// A comparison against a field the record does not have is false.
    fn holds(record: &Record, cmp: &Comparison) -> bool {
        let Some(value) = record.get(&cmp.field) else {
            return false;
        };
        match cmp.op {
            CompareOp::Eq => value.loose_eq(&cmp.literal),
            CompareOp::GtEq => value.to_text() >= cmp.literal.to_text(),
            CompareOp::LtEq => value.to_text() <= cmp.literal.to_text(),
        }
    }
}
