//! Translation of [`MatchCriteria`] into [`QueryPredicate`] trees.
//!
//! Field groups are ANDed together; keywords are ORed with each other. An
//! empty group never filters. Criteria without a time bound on either side
//! translate to no predicate at all, which callers read as "every record".

use tracing::debug;

use crate::predicate::QueryPredicate;
use crate::types::MatchCriteria;

/// Compiles criteria into a predicate.
///
/// Returns `None` when `criteria` is absent or when both `start` and `end`
/// are zero or negative, regardless of the other fields. Otherwise the
/// predicate always begins with `created_at > start AND created_at < end`;
/// both bounds are exclusive and are applied literally even when one of them
/// is zero.
#[must_use]
pub fn translate(criteria: Option<&MatchCriteria>) -> Option<QueryPredicate> {
    let criteria = criteria?;
    if criteria.is_unbounded() {
        return None;
    }

    let mut clauses = vec![
        QueryPredicate::CreatedAfter(criteria.start),
        QueryPredicate::CreatedBefore(criteria.end),
    ];

    if !criteria.levels.is_empty() {
        clauses.push(QueryPredicate::SeverityIn(criteria.levels.clone()));
    }
    if !criteria.origin_services.is_empty() {
        clauses.push(QueryPredicate::OriginIn(criteria.origin_services.clone()));
    }
    if !criteria.labels.is_empty() {
        clauses.push(QueryPredicate::LabelsAny(criteria.labels.clone()));
    }
    if !criteria.message_keywords.is_empty() {
        clauses.push(QueryPredicate::Or(
            criteria
                .message_keywords
                .iter()
                .cloned()
                .map(QueryPredicate::MessageContains)
                .collect(),
        ));
    }

    let predicate = QueryPredicate::And(clauses);
    debug!(%predicate, "compiled match criteria");
    Some(predicate)
}
