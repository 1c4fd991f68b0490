use std::sync::Arc;
use std::time::Instant;

use askdb_catalog::{Catalog, PseudoQuery, QueryExecutor};
use askdb_core::Record;
use serde::Serialize;
use tracing::info;

use crate::explainer::{Explainer, Explanation};
use crate::translator::{KeywordTranslator, Translate};
use crate::validator::{ValidationReport, Validator};

/// Answer to a question: the pseudo-SQL it became and the rows it produced.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub original_query: String,
    pub translated_query: String,
    pub plan: PseudoQuery,
    pub result: Vec<Record>,
    pub execution_time_ms: u64,
}

/// Translates questions and runs them against one shared catalog.
pub struct QueryEngine {
    translator: Arc<dyn Translate>,
    executor: QueryExecutor,
    validator: Validator,
    explainer: Explainer,
}

impl QueryEngine {
    /// Engine with the keyword rule set.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_translator(catalog, Arc::new(KeywordTranslator))
    }

    pub fn with_translator(catalog: Arc<Catalog>, translator: Arc<dyn Translate>) -> Self {
        Self {
            executor: QueryExecutor::new(Arc::clone(&catalog)),
            validator: Validator::new(catalog),
            explainer: Explainer::new(Arc::clone(&translator)),
            translator,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.executor.catalog()
    }

    pub fn translate(&self, text: &str) -> PseudoQuery {
        self.translator.translate(text)
    }

    pub fn execute(&self, query: &PseudoQuery) -> Vec<Record> {
        self.executor.execute(query)
    }

    /// Run pseudo-SQL text directly; unrecognised text yields no rows.
    pub fn execute_sql(&self, sql: &str) -> Vec<Record> {
        self.executor.execute_sql(sql)
    }

    pub fn explain(&self, text: &str) -> Explanation {
        self.explainer.explain(text)
    }

    pub fn validate(&self, text: &str) -> ValidationReport {
        self.validator.validate(text)
    }

    /// Translate and execute in one step, timing both.
    pub fn ask(&self, text: &str) -> QueryOutcome {
        let start = Instant::now();
        let plan = self.translate(text);
        let translated_query = plan.to_pseudo_sql();
        let result = self.execute(&plan);
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Answered '{}' with '{}' ({} rows, {}ms)",
            text,
            translated_query,
            result.len(),
            execution_time_ms
        );

        QueryOutcome {
            original_query: text.to_string(),
            translated_query,
            plan,
            result,
            execution_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_catalog::AggregateFn;
    use askdb_core::{record, Value};

    fn engine() -> QueryEngine {
        QueryEngine::new(Arc::new(Catalog::seeded()))
    }

    #[test]
    fn ask_fills_every_field() {
        let outcome = engine().ask("How many sales?");
        assert_eq!(outcome.original_query, "How many sales?");
        assert_eq!(outcome.translated_query, "SELECT COUNT(*) FROM sales");
        assert_eq!(outcome.result, vec![record! { "count" => 3 }]);
    }

    #[test]
    fn ask_serialises_like_the_api_payload() {
        let json = serde_json::to_value(engine().ask("total sales")).unwrap();
        assert_eq!(json["translated_query"], "SELECT SUM(amount) FROM sales");
        assert_eq!(json["result"], serde_json::json!([{ "sum_amount": 2450 }]));
        assert_eq!(json["plan"]["type"], "aggregate");
        assert!(json["execution_time_ms"].is_u64());
    }

    struct FixedTranslator;

    impl Translate for FixedTranslator {
        fn translate(&self, _text: &str) -> PseudoQuery {
            PseudoQuery::Aggregate {
                table: "sales".to_string(),
                func: AggregateFn::Avg,
                field: "amount".to_string(),
            }
        }
    }

    #[test]
    fn custom_translator_drives_ask_and_explain() {
        let engine =
            QueryEngine::with_translator(Arc::new(Catalog::seeded()), Arc::new(FixedTranslator));
        let outcome = engine.ask("anything");
        let Value::Number(avg) = outcome.result[0]["avg_amount"] else {
            panic!("avg should be numeric");
        };
        assert!((avg - 2450.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            engine.explain("anything").steps[2],
            "Translated to database query: SELECT AVG(amount) FROM sales"
        );
    }

    #[test]
    fn execute_sql_passes_through() {
        assert_eq!(engine().execute_sql("SELECT * FROM customers").len(), 2);
        assert!(engine().execute_sql("not sql").is_empty());
    }
}
