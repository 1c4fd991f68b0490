//! Keyword rules that turn an English question into a [`PseudoQuery`].
//!
//! Rules are tried in declaration order and the first one that applies
//! wins. A question can satisfy several rules ("how many sales, list all
//! customers"); only the order decides.

use askdb_catalog::{AggregateFn, FilterExpr, GroupFn, PseudoQuery};
use tracing::debug;

/// Date range used for "last month" and "january" questions.
const PERIOD_START: &str = "2023-01-01";
const PERIOD_END: &str = "2023-01-31";

/// Row cap for questions that fall through every rule.
const FALLBACK_LIMIT: usize = 10;

/// Maps question text to a pseudo-query. Implementations must be pure:
/// the same text always yields the same query.
pub trait Translate: Send + Sync {
    fn translate(&self, text: &str) -> PseudoQuery;
}

/// The fixed, ordered keyword rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTranslator;

impl KeywordTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Translate for KeywordTranslator {
    fn translate(&self, text: &str) -> PseudoQuery {
        let q = text.to_lowercase();
        let query = rule_how_many(&q)
            .or_else(|| rule_list_all(&q))
            .or_else(|| rule_total_sales(&q))
            .or_else(|| rule_average_sale(&q))
            .or_else(|| rule_customers_joined_january(&q))
            .unwrap_or_else(|| fallback(&q));
        debug!("Translated '{}' -> {}", text, query);
        query
    }
}

/// Table a free-form question is most likely about: `sales` if it
/// mentions "sale", else `customers` if it mentions "customer", else
/// `sales`.
pub fn infer_table(text: &str) -> &'static str {
    let q = text.to_lowercase();
    if q.contains("sale") {
        "sales"
    } else if q.contains("customer") {
        "customers"
    } else {
        "sales"
    }
}

fn rule_how_many(q: &str) -> Option<PseudoQuery> {
    if !q.contains("how many") {
        return None;
    }
    if q.contains("sales") {
        let filter = q
            .contains("last month")
            .then(|| FilterExpr::between("date", PERIOD_START, PERIOD_END));
        return Some(PseudoQuery::Count {
            table: "sales".to_string(),
            filter,
        });
    }
    if q.contains("customers") {
        return Some(PseudoQuery::Count {
            table: "customers".to_string(),
            filter: None,
        });
    }
    None
}

fn rule_list_all(q: &str) -> Option<PseudoQuery> {
    if !q.contains("list all") {
        return None;
    }
    let table = if q.contains("sales") {
        "sales"
    } else if q.contains("customers") {
        "customers"
    } else {
        return None;
    };
    Some(PseudoQuery::SelectAll {
        table: table.to_string(),
        filter: None,
        limit: None,
    })
}

fn rule_total_sales(q: &str) -> Option<PseudoQuery> {
    if !q.contains("total sales") {
        return None;
    }
    if q.contains("by region") {
        return Some(PseudoQuery::GroupAggregate {
            table: "sales".to_string(),
            group_field: "region".to_string(),
            func: GroupFn::Sum,
            field: Some("amount".to_string()),
        });
    }
    Some(PseudoQuery::Aggregate {
        table: "sales".to_string(),
        func: AggregateFn::Sum,
        field: "amount".to_string(),
    })
}

fn rule_average_sale(q: &str) -> Option<PseudoQuery> {
    (q.contains("average") && q.contains("sale")).then(|| PseudoQuery::Aggregate {
        table: "sales".to_string(),
        func: AggregateFn::Avg,
        field: "amount".to_string(),
    })
}

fn rule_customers_joined_january(q: &str) -> Option<PseudoQuery> {
    (q.contains("customer") && q.contains("joined") && q.contains("january")).then(|| {
        PseudoQuery::SelectAll {
            table: "customers".to_string(),
            filter: Some(FilterExpr::between("join_date", PERIOD_START, PERIOD_END)),
            limit: None,
        }
    })
}

fn fallback(q: &str) -> PseudoQuery {
    PseudoQuery::SelectAll {
        table: infer_table(q).to_string(),
        filter: None,
        limit: Some(FALLBACK_LIMIT),
    }
}
