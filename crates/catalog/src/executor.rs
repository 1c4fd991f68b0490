use std::sync::Arc;

use askdb_core::{Record, Value};
use indexmap::IndexMap;
use tracing::debug;

use crate::catalog::Catalog;
use crate::condition::ConditionEvaluator;
use crate::plan::{AggregateFn, FilterExpr, GroupFn, PseudoQuery};

/// Runs pseudo-queries against a [`Catalog`].
///
/// Lookup misses are not errors: an unknown table, an unknown aggregate or
/// group field, or a non-numeric value under SUM/AVG all produce an empty
/// result.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    catalog: Arc<Catalog>,
}

impl QueryExecutor {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn execute(&self, query: &PseudoQuery) -> Vec<Record> {
        let Some(rows) = self.catalog.table(query.table()) else {
            debug!("Unknown table '{}': empty result", query.table());
            return Vec::new();
        };

        let results = match query {
            PseudoQuery::Count { filter, .. } => {
                let count = Self::filtered(rows, filter.as_ref()).count();
                vec![single("count", Value::from(count))]
            }
            PseudoQuery::SelectAll { filter, limit, .. } => {
                let matched = Self::filtered(rows, filter.as_ref()).cloned();
                match limit {
                    Some(n) => matched.take(*n).collect(),
                    None => matched.collect(),
                }
            }
            PseudoQuery::Aggregate { func, field, .. } => {
                Self::exec_aggregate(rows, *func, field).unwrap_or_default()
            }
            PseudoQuery::GroupAggregate {
                group_field,
                func,
                field,
                ..
            } => Self::exec_group(rows, group_field, *func, field.as_deref()).unwrap_or_default(),
        };

        debug!("Executed '{}': {} rows", query, results.len());
        results
    }

    /// Parse pseudo-SQL text and execute it. Text that is not one of the
    /// recognised shapes yields an empty result.
    pub fn execute_sql(&self, sql: &str) -> Vec<Record> {
        match sql.parse::<PseudoQuery>() {
            Ok(query) => self.execute(&query),
            Err(e) => {
                debug!("Unrecognised pseudo-SQL '{}': {}", sql, e);
                Vec::new()
            }
        }
    }

    fn filtered<'a>(
        rows: &'a [Record],
        filter: Option<&'a FilterExpr>,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        rows.iter()
            .filter(move |row| filter.map_or(true, |f| ConditionEvaluator::matches(row, f)))
    }

    /// Numeric values of `field` across `rows`; `None` if any row lacks the
    /// field or holds a non-numeric value there.
    fn numbers<'a>(rows: impl IntoIterator<Item = &'a Record>, field: &str) -> Option<Vec<f64>> {
        rows.into_iter()
            .map(|row| match row.get(field) {
                Some(Value::Number(n)) => Some(*n),
                _ => None,
            })
            .collect()
    }

    fn exec_aggregate(rows: &[Record], func: AggregateFn, field: &str) -> Option<Vec<Record>> {
        if let Some(sample) = rows.first() {
            if !sample.contains_key(field) {
                debug!("Unknown aggregate field '{}'", field);
                return None;
            }
        }
        let values = Self::numbers(rows, field)?;
        let sum: f64 = values.iter().sum();
        let result = match func {
            AggregateFn::Sum => sum,
            // Σ/N with N = 0 is NaN; left as is.
            AggregateFn::Avg => sum / values.len() as f64,
        };
        Some(vec![single(
            &format!("{}_{}", func.prefix(), field),
            Value::Number(result),
        )])
    }

    fn exec_group(
        rows: &[Record],
        group_field: &str,
        func: GroupFn,
        field: Option<&str>,
    ) -> Option<Vec<Record>> {
        // Keyed by the textual form of the group value, first appearance first.
        let mut groups: IndexMap<String, Vec<&Record>> = IndexMap::new();
        for row in rows {
            let Some(key) = row.get(group_field) else {
                debug!("Unknown group field '{}'", group_field);
                return None;
            };
            groups.entry(key.to_text()).or_default().push(row);
        }

        let column = match field {
            Some(f) => format!("{}_{}", func.prefix(), f),
            None => func.prefix().to_string(),
        };

        let mut results = Vec::with_capacity(groups.len());
        for (key, members) in groups {
            let value = match func {
                GroupFn::Count => Value::from(members.len()),
                GroupFn::Sum => {
                    let field = field?;
                    let values = Self::numbers(members.iter().copied(), field)?;
                    Value::Number(values.iter().sum())
                }
            };
            let mut record = Record::new();
            record.insert(group_field.to_string(), Value::Text(key));
            record.insert(column.clone(), value);
            results.push(record);
        }

        debug!("Grouped by '{}': {} groups", group_field, results.len());
        Some(results)
    }
}

fn single(column: &str, value: Value) -> Record {
    let mut record = Record::new();
    record.insert(column.to_string(), value);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_core::record;

    fn seeded() -> QueryExecutor {
        QueryExecutor::new(Arc::new(Catalog::seeded()))
    }

    fn run(sql: &str) -> Vec<Record> {
        seeded().execute_sql(sql)
    }

    #[test]
    fn count_all_sales() {
        assert_eq!(run("SELECT COUNT(*) FROM sales"), vec![record! { "count" => 3 }]);
    }

    #[test]
    fn count_with_date_filter() {
        let rows = run(
            "SELECT COUNT(*) FROM customers WHERE join_date >= '2023-01-01' AND join_date <= '2023-01-31'",
        );
        assert_eq!(rows, vec![record! { "count" => 1 }]);
    }

    #[test]
    fn select_all_preserves_catalog_order() {
        let rows = run("SELECT * FROM sales");
        let ids: Vec<String> = rows.iter().map(|r| r["id"].to_text()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn select_all_applies_limit_after_filter() {
        let rows = run("SELECT * FROM sales WHERE date >= '2023-01-16' LIMIT 1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["product"], Value::from("Phone"));
    }

    #[test]
    fn select_with_coercive_equality() {
        let rows = run("SELECT * FROM sales WHERE amount = '1200'");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["product"], Value::from("Laptop"));
    }

    #[test]
    fn sum_and_avg() {
        assert_eq!(run("SELECT SUM(amount) FROM sales"), vec![record! { "sum_amount" => 2450 }]);
        let avg = run("SELECT AVG(amount) FROM sales");
        let Value::Number(n) = avg[0]["avg_amount"] else {
            panic!("avg should be numeric");
        };
        assert!((n - 816.666_666_666_666_6).abs() < 1e-9);
    }

    #[test]
    fn avg_of_empty_table_is_nan() {
        let catalog = Catalog::builder().table("sales", vec![]).build().unwrap();
        let executor = QueryExecutor::new(Arc::new(catalog));
        let rows = executor.execute_sql("SELECT AVG(amount) FROM sales");
        assert_eq!(rows.len(), 1);
        let Value::Number(n) = rows[0]["avg_amount"] else {
            panic!("avg should be numeric");
        };
        assert!(n.is_nan());
        assert_eq!(
            executor.execute_sql("SELECT SUM(amount) FROM sales"),
            vec![record! { "sum_amount" => 0 }]
        );
    }

    #[test]
    fn group_sum_by_region_keeps_first_appearance_order() {
        let rows = run("SELECT region, SUM(amount) FROM sales GROUP BY region");
        assert_eq!(
            rows,
            vec![
                record! { "region" => "North", "sum_amount" => 1200 },
                record! { "region" => "South", "sum_amount" => 800 },
                record! { "region" => "East", "sum_amount" => 450 },
            ]
        );
    }

    #[test]
    fn group_count_merges_equal_keys() {
        let catalog = Catalog::builder()
            .table(
                "sales",
                vec![
                    record! { "region" => "North", "amount" => 1 },
                    record! { "region" => "South", "amount" => 2 },
                    record! { "region" => "North", "amount" => 3 },
                ],
            )
            .build()
            .unwrap();
        let executor = QueryExecutor::new(Arc::new(catalog));
        assert_eq!(
            executor.execute_sql("SELECT region, COUNT(amount) FROM sales GROUP BY region"),
            vec![
                record! { "region" => "North", "count_amount" => 2 },
                record! { "region" => "South", "count_amount" => 1 },
            ]
        );
        assert_eq!(
            executor.execute_sql("SELECT region, COUNT(*) FROM sales GROUP BY region")[0],
            record! { "region" => "North", "count" => 2 }
        );
    }

    #[test]
    fn numeric_group_keys_render_as_text() {
        let rows = run("SELECT amount, COUNT(id) FROM sales GROUP BY amount");
        assert_eq!(rows[0]["amount"], Value::from("1200"));
    }

    #[test]
    fn lookup_misses_are_empty() {
        assert!(run("SELECT * FROM orders").is_empty());
        assert!(run("SELECT SUM(price) FROM sales").is_empty());
        assert!(run("SELECT SUM(product) FROM sales").is_empty());
        assert!(run("SELECT colour, COUNT(*) FROM sales GROUP BY colour").is_empty());
    }

    #[test]
    fn unrecognised_sql_is_empty() {
        assert!(run("DROP TABLE sales").is_empty());
        assert!(run("SELECT MAX(amount) FROM sales").is_empty());
    }

    #[test]
    fn catalog_is_untouched_by_execution() {
        let executor = seeded();
        let before = executor.catalog().table("sales").unwrap().to_vec();
        executor.execute_sql("SELECT * FROM sales WHERE region = 'North'");
        executor.execute_sql("SELECT region, SUM(amount) FROM sales GROUP BY region");
        assert_eq!(executor.catalog().table("sales").unwrap(), before.as_slice());
    }
}
