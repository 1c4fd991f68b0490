use std::sync::Arc;

use serde::Serialize;

use crate::translator::{KeywordTranslator, Translate};

/// Characters of the question echoed back in the first step.
const PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub steps: Vec<String>,
    pub limitations: Vec<String>,
}

/// Describes how a question would be answered without running it.
#[derive(Clone)]
pub struct Explainer {
    translator: Arc<dyn Translate>,
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new(Arc::new(KeywordTranslator))
    }
}

impl Explainer {
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self { translator }
    }

    pub fn explain(&self, text: &str) -> Explanation {
        let query = self.translator.translate(text);
        let steps = vec![
            format!("Identified query type: {}", preview(text)),
            "Determined relevant tables and fields".to_string(),
            format!("Translated to database query: {query}"),
            "Optimized query execution plan".to_string(),
        ];

        let mut limitations = Vec::new();
        if text.to_lowercase().contains("join") {
            limitations.push("Joins might be limited".to_string());
        }
        if query.is_grouped() {
            limitations.push("Grouping may impact performance".to_string());
        }

        Explanation { steps, limitations }
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps_in_order() {
        let explanation = Explainer::default().explain("How many sales?");
        assert_eq!(
            explanation.steps,
            vec![
                "Identified query type: How many sales?",
                "Determined relevant tables and fields",
                "Translated to database query: SELECT COUNT(*) FROM sales",
                "Optimized query execution plan",
            ]
        );
        assert!(explanation.limitations.is_empty());
    }

    #[test]
    fn long_questions_are_truncated() {
        let text = "What are the total sales by region this year?";
        let explanation = Explainer::default().explain(text);
        assert_eq!(
            explanation.steps[0],
            "Identified query type: What are the total sales by re..."
        );
    }

    #[test]
    fn exactly_thirty_chars_is_not_truncated() {
        let text = "a".repeat(30);
        let explanation = Explainer::default().explain(&text);
        assert_eq!(explanation.steps[0], format!("Identified query type: {text}"));
    }

    #[test]
    fn grouping_is_a_limitation() {
        let explanation = Explainer::default().explain("total sales by region");
        assert_eq!(explanation.limitations, vec!["Grouping may impact performance"]);
    }

    #[test]
    fn joins_are_a_limitation() {
        let explanation = Explainer::default().explain("JOIN sales with customers");
        assert_eq!(explanation.limitations, vec!["Joins might be limited"]);
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "é".repeat(31);
        assert_eq!(preview(&text), format!("{}...", "é".repeat(30)));
    }
}
