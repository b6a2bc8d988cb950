//! Document-store filter rendering.
//!
//! Produces filters in the `$and` / `$or` / `$gt` / `$lt` / `$in` / `$regex`
//! dialect understood by document databases and search indexes. Field names
//! follow the record's JSON wire form. Keywords are regex-escaped so they
//! still match as literal substrings.

use serde_json::{json, Value};

use crate::predicate::QueryPredicate;

/// Renders an optional predicate as a filter document.
///
/// `None` renders as the empty document, which matches everything.
#[must_use]
pub fn to_filter(predicate: Option<&QueryPredicate>) -> Value {
    predicate.map_or_else(|| json!({}), render)
}

fn render(predicate: &QueryPredicate) -> Value {
    match predicate {
        QueryPredicate::And(children) => {
            json!({ "$and": children.iter().map(render).collect::<Vec<_>>() })
        }
        QueryPredicate::Or(children) => {
            json!({ "$or": children.iter().map(render).collect::<Vec<_>>() })
        }
        QueryPredicate::CreatedAfter(bound) => json!({ "created": { "$gt": bound } }),
        QueryPredicate::CreatedBefore(bound) => json!({ "created": { "$lt": bound } }),
        QueryPredicate::SeverityIn(levels) => {
            let names: Vec<&str> = levels.iter().map(|l| l.as_str()).collect();
            json!({ "logLevel": { "$in": names } })
        }
        QueryPredicate::OriginIn(origins) => json!({ "originService": { "$in": origins } }),
        // `$in` against an array field matches on any shared element
        QueryPredicate::LabelsAny(labels) => json!({ "labels": { "$in": labels } }),
        QueryPredicate::MessageContains(text) => {
            json!({ "message": { "$regex": regex::escape(text) } })
        }
    }
}
