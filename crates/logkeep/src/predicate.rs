//! Backend-neutral query predicates.
//!
//! A [`QueryPredicate`] is the compiled form of a
//! [`MatchCriteria`](crate::types::MatchCriteria). Stores that scan records
//! in-process evaluate it with [`QueryPredicate::matches`]; external backends
//! render it through [`crate::render`].

use std::fmt;

use crate::types::{LogRecord, Severity};

/// A conjunction/disjunction tree over record fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPredicate {
    /// Every child must match.
    And(Vec<QueryPredicate>),
    /// At least one child must match.
    Or(Vec<QueryPredicate>),
    /// `created_at` strictly greater than the bound.
    CreatedAfter(i64),
    /// `created_at` strictly less than the bound.
    CreatedBefore(i64),
    /// Severity is one of the listed levels.
    SeverityIn(Vec<Severity>),
    /// Origin service is one of the listed names.
    OriginIn(Vec<String>),
    /// The record carries at least one of the listed labels.
    LabelsAny(Vec<String>),
    /// The message contains the text (case-sensitive).
    MessageContains(String),
}

impl QueryPredicate {
    /// Evaluates the predicate against a record.
    #[must_use]
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Self::And(children) => children.iter().all(|c| c.matches(record)),
            Self::Or(children) => children.iter().any(|c| c.matches(record)),
            Self::CreatedAfter(bound) => record.created_at() > *bound,
            Self::CreatedBefore(bound) => record.created_at() < *bound,
            Self::SeverityIn(levels) => levels.contains(&record.severity()),
            Self::OriginIn(origins) => origins.iter().any(|o| o == record.origin_service()),
            Self::LabelsAny(labels) => record.labels().iter().any(|l| labels.contains(l)),
            Self::MessageContains(text) => record.message().contains(text.as_str()),
        }
    }
}

/// Evaluates an optional predicate, where `None` matches everything.
#[must_use]
pub fn matches_optional(predicate: Option<&QueryPredicate>, record: &LogRecord) -> bool {
    predicate.is_none_or(|p| p.matches(record))
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[QueryPredicate], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

impl fmt::Display for QueryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(children) => write_joined(f, children, "AND"),
            Self::Or(children) => write_joined(f, children, "OR"),
            Self::CreatedAfter(bound) => write!(f, "created > {bound}"),
            Self::CreatedBefore(bound) => write!(f, "created < {bound}"),
            Self::SeverityIn(levels) => {
                let names: Vec<&str> = levels.iter().map(Severity::as_str).collect();
                write!(f, "logLevel IN {names:?}")
            }
            Self::OriginIn(origins) => write!(f, "originService IN {origins:?}"),
            Self::LabelsAny(labels) => write!(f, "labels ANY {labels:?}"),
            Self::MessageContains(text) => write!(f, "message CONTAINS {text:?}"),
        }
    }
}
