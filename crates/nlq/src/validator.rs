//! Heuristic validation of a question against the catalog.
//!
//! Every check runs and contributes notes; a single failed check makes the
//! question invalid.

use std::sync::Arc;

use askdb_catalog::Catalog;
use serde::Serialize;
use tracing::debug;

use crate::translator::infer_table;

/// Keywords the executor cannot honour. Matched as case-insensitive
/// substrings, so "without" also trips `with`.
const COMPLEX_OPERATIONS: [&str; 4] = ["join", "subquery", "having", "with"];

const RESERVED_WORDS: [&str; 10] = [
    "select", "from", "where", "and", "or", "group", "by", "sum", "avg", "count",
];

/// Outcome of [`Validator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub notes: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            is_valid: true,
            notes: Vec::new(),
        }
    }

    fn fail(&mut self, note: String) {
        self.is_valid = false;
        self.notes.push(note);
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    catalog: Arc<Catalog>,
}

impl Validator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn validate(&self, text: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        let table = infer_table(text);

        if !self.catalog.contains_table(table) {
            report.fail(format!("Table '{table}' not found"));
        }

        let lowered = text.to_lowercase();
        for op in COMPLEX_OPERATIONS {
            if lowered.contains(op) {
                report.fail(format!("Complex operation '{op}' might not be supported"));
            }
        }

        if let Some(sample) = self.catalog.sample_row(table) {
            for token in alphabetic_tokens(text) {
                let lower = token.to_lowercase();
                if !sample.contains_key(&lower) && !RESERVED_WORDS.contains(&lower.as_str()) {
                    report.fail(format!("Field '{token}' not found in table '{table}'"));
                }
            }
        }

        debug!(
            "Validated '{}': valid={} notes={}",
            text,
            report.is_valid,
            report.notes.len()
        );
        report
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Maximal runs of `[A-Za-z0-9_]` made up only of letters and underscores.
/// Runs containing a digit are skipped whole.
fn alphabetic_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|run| !run.is_empty())
        .filter(|run| run.chars().all(|c| c.is_ascii_alphabetic() || c == '_'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use askdb_core::record;

    fn validator() -> Validator {
        Validator::new(Arc::new(Catalog::seeded()))
    }

    #[test]
    fn join_is_flagged() {
        let report = validator().validate("join sales and customers");
        assert!(!report.is_valid);
        assert!(report
            .notes
            .contains(&"Complex operation 'join' might not be supported".to_string()));
    }

    #[test]
    fn ordinary_words_are_flagged_as_fields() {
        let report = validator().validate("list all sales");
        assert!(!report.is_valid);
        assert_eq!(
            report.notes,
            vec![
                "Field 'list' not found in table 'sales'",
                "Field 'all' not found in table 'sales'",
                "Field 'sales' not found in table 'sales'",
            ]
        );
    }

    #[test]
    fn field_names_and_reserved_words_are_valid() {
        let report = validator().validate("SELECT amount, region where Date");
        assert_eq!(report, ValidationReport { is_valid: true, notes: vec![] });
    }

    #[test]
    fn one_note_per_occurrence() {
        let report = validator().validate("colour colour");
        assert_eq!(report.notes.len(), 2);
        assert_eq!(report.notes[0], "Field 'colour' not found in table 'sales'");
    }

    #[test]
    fn tokens_with_digits_are_ignored() {
        let report = validator().validate("amount region2 2023 q4");
        assert!(report.is_valid, "{:?}", report.notes);
    }

    #[test]
    fn with_matches_inside_longer_words() {
        let report = validator().validate("amount without region");
        assert!(report
            .notes
            .contains(&"Complex operation 'with' might not be supported".to_string()));
    }

    #[test]
    fn customers_table_is_inferred() {
        let report = validator().validate("customer name email");
        assert_eq!(report.notes, vec!["Field 'customer' not found in table 'customers'"]);
    }

    #[test]
    fn missing_table_is_reported_and_skips_field_check() {
        let catalog = Catalog::builder()
            .table("customers", vec![record! { "id" => 1 }])
            .build()
            .unwrap();
        let report = Validator::new(Arc::new(catalog)).validate("having fun");
        assert!(!report.is_valid);
        assert_eq!(
            report.notes,
            vec![
                "Table 'sales' not found",
                "Complex operation 'having' might not be supported",
            ]
        );
    }

    #[test]
    fn empty_table_skips_field_check() {
        let catalog = Catalog::builder().table("sales", vec![]).build().unwrap();
        let report = Validator::new(Arc::new(catalog)).validate("anything goes");
        assert!(report.is_valid);
    }
}
