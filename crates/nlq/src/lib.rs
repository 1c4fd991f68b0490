pub mod engine;
pub mod explainer;
pub mod translator;
pub mod validator;

pub use engine::{QueryEngine, QueryOutcome};
pub use explainer::{Explainer, Explanation};
pub use translator::{infer_table, KeywordTranslator, Translate};
pub use validator::{ValidationReport, Validator};
