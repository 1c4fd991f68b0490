use std::fmt;
use std::str::FromStr;

use askdb_core::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A translated question, ready for the executor.
///
/// Every shape has a pseudo-SQL text form (`Display`) that parses back to
/// the same value (`FromStr`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PseudoQuery {
    Count {
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<FilterExpr>,
    },
    SelectAll {
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<FilterExpr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },
    /// Whole-table aggregate; never filtered.
    Aggregate {
        table: String,
        func: AggregateFn,
        field: String,
    },
    GroupAggregate {
        table: String,
        group_field: String,
        func: GroupFn,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFn {
    Sum,
    Avg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupFn {
    Sum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=")]
    LtEq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub field: String,
    pub op: CompareOp,
    pub literal: Value,
}

/// Comparisons joined by an implicit AND. No OR, no nesting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpr(pub Vec<Comparison>);

#[derive(Debug, Error, PartialEq)]
pub enum PlanParseError {
    #[error("pseudo-SQL must start with SELECT")]
    MissingSelect,
    #[error("pseudo-SQL has no FROM clause")]
    MissingFrom,
    #[error("invalid table name: '{0}'")]
    InvalidTable(String),
    #[error("invalid LIMIT: '{0}'")]
    InvalidLimit(String),
    #[error("unsupported projection: '{0}'")]
    UnsupportedProjection(String),
    #[error("{0} is not allowed on this query shape")]
    UnexpectedClause(&'static str),
    #[error("GROUP BY '{group}' does not match the selected column '{column}'")]
    GroupMismatch { group: String, column: String },
}

impl PseudoQuery {
    pub fn table(&self) -> &str {
        match self {
            PseudoQuery::Count { table, .. }
            | PseudoQuery::SelectAll { table, .. }
            | PseudoQuery::Aggregate { table, .. }
            | PseudoQuery::GroupAggregate { table, .. } => table,
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, PseudoQuery::GroupAggregate { .. })
    }

    pub fn to_pseudo_sql(&self) -> String {
        self.to_string()
    }
}

impl AggregateFn {
    /// Prefix of the output column, e.g. `sum` in `sum_amount`.
    pub fn prefix(self) -> &'static str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Avg => "avg",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
        }
    }
}

impl GroupFn {
    pub fn prefix(self) -> &'static str {
        match self {
            GroupFn::Sum => "sum",
            GroupFn::Count => "count",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            GroupFn::Sum => "SUM",
            GroupFn::Count => "COUNT",
        }
    }
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::GtEq => ">=",
            CompareOp::LtEq => "<=",
        }
    }
}

impl Comparison {
    pub fn new(field: impl Into<String>, op: CompareOp, literal: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            literal: literal.into(),
        }
    }
}

impl FilterExpr {
    /// Inclusive `field >= from AND field <= to` range.
    pub fn between(field: &str, from: &str, to: &str) -> Self {
        FilterExpr(vec![
            Comparison::new(field, CompareOp::GtEq, from),
            Comparison::new(field, CompareOp::LtEq, to),
        ])
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a WHERE body.
    ///
    /// Clauses are split on the literal token `AND` with a plain substring
    /// split, so a quoted literal containing `AND` is cut in two. Each
    /// clause is tried against `>=`, then `<=`, then `=`; a clause without
    /// any of them is dropped. Quotes are stripped from both sides, and an
    /// unquoted literal that reads as a number becomes a number.
    pub fn parse(clause: &str) -> Self {
        let comparisons = clause
            .split("AND")
            .filter_map(|cond| {
                let (op, (field, literal)) = [CompareOp::GtEq, CompareOp::LtEq, CompareOp::Eq]
                    .into_iter()
                    .find_map(|op| cond.split_once(op.symbol()).map(|parts| (op, parts)))?;
                Some(Comparison {
                    field: strip_quotes(field),
                    op,
                    literal: parse_literal(literal),
                })
            })
            .collect();
        FilterExpr(comparisons)
    }
}

fn strip_quotes(raw: &str) -> String {
    raw.trim().replace(['\'', '"'], "")
}

fn parse_literal(raw: &str) -> Value {
    let trimmed = raw.trim();
    let quoted = trimmed.contains(['\'', '"']);
    let text = strip_quotes(trimmed);
    if !quoted {
        if let Ok(n) = text.parse::<f64>() {
            if n.is_finite() {
                return Value::Number(n);
            }
        }
    }
    Value::Text(text)
}

// ── Pseudo-SQL rendering ────────────────────────────────────────────

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Value::Number(_) => write!(f, "{} {} {}", self.field, self.op.symbol(), self.literal),
            Value::Text(s) => write!(f, "{} {} '{}'", self.field, self.op.symbol(), s),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmp) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{}", cmp)?;
        }
        Ok(())
    }
}

fn write_where(f: &mut fmt::Formatter<'_>, filter: &Option<FilterExpr>) -> fmt::Result {
    match filter {
        Some(expr) if !expr.is_empty() => write!(f, " WHERE {}", expr),
        _ => Ok(()),
    }
}

impl fmt::Display for PseudoQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoQuery::Count { table, filter } => {
                write!(f, "SELECT COUNT(*) FROM {}", table)?;
                write_where(f, filter)
            }
            PseudoQuery::SelectAll {
                table,
                filter,
                limit,
            } => {
                write!(f, "SELECT * FROM {}", table)?;
                write_where(f, filter)?;
                if let Some(n) = limit {
                    write!(f, " LIMIT {}", n)?;
                }
                Ok(())
            }
            PseudoQuery::Aggregate { table, func, field } => {
                write!(f, "SELECT {}({}) FROM {}", func.keyword(), field, table)
            }
            PseudoQuery::GroupAggregate {
                table,
                group_field,
                func,
                field,
            } => write!(
                f,
                "SELECT {}, {}({}) FROM {} GROUP BY {}",
                group_field,
                func.keyword(),
                field.as_deref().unwrap_or("*"),
                table,
                group_field
            ),
        }
    }
}

// ── Pseudo-SQL parsing ──────────────────────────────────────────────

/// Case-insensitive search for an ASCII keyword. Uppercasing ASCII keeps
/// byte offsets intact, so the index is valid in the original string.
fn find_keyword(haystack: &str, keyword: &str) -> Option<usize> {
    haystack.to_ascii_uppercase().find(keyword)
}

fn split_keyword<'a>(haystack: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let idx = find_keyword(haystack, keyword)?;
    Some((&haystack[..idx], &haystack[idx + keyword.len()..]))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `NAME(arg)` → `(NAME uppercased, arg)`.
fn parse_call(expr: &str) -> Option<(String, &str)> {
    let open = expr.find('(')?;
    let inner = expr[open + 1..].strip_suffix(')')?;
    Some((expr[..open].trim().to_ascii_uppercase(), inner.trim()))
}

impl FromStr for PseudoQuery {
    type Err = PlanParseError;

    fn from_str(sql: &str) -> Result<Self, Self::Err> {
        let sql = sql.trim();
        if !sql.to_ascii_uppercase().starts_with("SELECT ") {
            return Err(PlanParseError::MissingSelect);
        }
        let body = &sql["SELECT ".len()..];
        let (projection, rest) = split_keyword(body, " FROM ").ok_or(PlanParseError::MissingFrom)?;
        let projection = projection.trim();

        let (rest, limit) = match split_keyword(rest, " LIMIT ") {
            Some((head, n)) => {
                let n = n.trim();
                let parsed = n
                    .parse::<usize>()
                    .map_err(|_| PlanParseError::InvalidLimit(n.to_string()))?;
                (head, Some(parsed))
            }
            None => (rest, None),
        };
        let (rest, group_by) = match split_keyword(rest, " GROUP BY ") {
            Some((head, group)) => (head, Some(group.trim().to_string())),
            None => (rest, None),
        };
        let (table, filter) = match split_keyword(rest, " WHERE ") {
            Some((head, clause)) => (head, Some(FilterExpr::parse(clause))),
            None => (rest, None),
        };
        let table = table.trim();
        if !is_identifier(table) {
            return Err(PlanParseError::InvalidTable(table.to_string()));
        }
        let table = table.to_string();

        if let Some(group_field) = group_by {
            if filter.is_some() {
                return Err(PlanParseError::UnexpectedClause("WHERE"));
            }
            if limit.is_some() {
                return Err(PlanParseError::UnexpectedClause("LIMIT"));
            }
            let (column, call) = projection
                .split_once(',')
                .ok_or_else(|| PlanParseError::UnsupportedProjection(projection.to_string()))?;
            let column = column.trim();
            if column != group_field {
                return Err(PlanParseError::GroupMismatch {
                    group: group_field,
                    column: column.to_string(),
                });
            }
            let (name, arg) = parse_call(call.trim())
                .ok_or_else(|| PlanParseError::UnsupportedProjection(projection.to_string()))?;
            let func = match name.as_str() {
                "SUM" => GroupFn::Sum,
                "COUNT" => GroupFn::Count,
                _ => return Err(PlanParseError::UnsupportedProjection(projection.to_string())),
            };
            let field = match arg {
                "*" if func == GroupFn::Count => None,
                a if is_identifier(a) => Some(a.to_string()),
                _ => return Err(PlanParseError::UnsupportedProjection(projection.to_string())),
            };
            return Ok(PseudoQuery::GroupAggregate {
                table,
                group_field,
                func,
                field,
            });
        }

        if projection == "*" {
            return Ok(PseudoQuery::SelectAll {
                table,
                filter,
                limit,
            });
        }

        let (name, arg) = parse_call(projection)
            .ok_or_else(|| PlanParseError::UnsupportedProjection(projection.to_string()))?;
        match (name.as_str(), arg) {
            ("COUNT", "*") => {
                if limit.is_some() {
                    return Err(PlanParseError::UnexpectedClause("LIMIT"));
                }
                Ok(PseudoQuery::Count { table, filter })
            }
            ("SUM" | "AVG", field) if is_identifier(field) => {
                if filter.is_some() {
                    return Err(PlanParseError::UnexpectedClause("WHERE"));
                }
                if limit.is_some() {
                    return Err(PlanParseError::UnexpectedClause("LIMIT"));
                }
                let func = if name == "SUM" {
                    AggregateFn::Sum
                } else {
                    AggregateFn::Avg
                };
                Ok(PseudoQuery::Aggregate {
                    table,
                    func,
                    field: field.to_string(),
                })
            }
            _ => Err(PlanParseError::UnsupportedProjection(projection.to_string())),
        }
    }
}
