//! Relational `WHERE` clause rendering.
//!
//! Records live in one table; labels live in a child table with one row per
//! label. Values are never inlined: every literal becomes a `?` placeholder
//! with a matching entry in [`SqlWhere::params`].

use crate::predicate::QueryPredicate;

/// Table and column names the clause refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSchema {
    /// Record table.
    pub table: &'static str,
    /// Primary key column of the record table.
    pub id: &'static str,
    /// Creation time column (epoch millis).
    pub created: &'static str,
    /// Severity column (wire names, e.g. `WARN`).
    pub severity: &'static str,
    /// Origin service column.
    pub origin_service: &'static str,
    /// Message column.
    pub message: &'static str,
    /// Label table.
    pub labels_table: &'static str,
    /// Label table column referencing the record id.
    pub labels_record_id: &'static str,
    /// Label value column.
    pub label: &'static str,
}

impl Default for SqlSchema {
    fn default() -> Self {
        Self {
            table: "log_records",
            id: "id",
            created: "created",
            severity: "log_level",
            origin_service: "origin_service",
            message: "message",
            labels_table: "log_labels",
            labels_record_id: "record_id",
            label: "label",
        }
    }
}

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Integer parameter.
    Int(i64),
    /// Text parameter.
    Text(String),
}

/// A rendered `WHERE` fragment and its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlWhere {
    /// Condition text, without the `WHERE` keyword.
    pub clause: String,
    /// Values for each `?` in `clause`.
    pub params: Vec<SqlParam>,
}

/// Renders an optional predicate against the default schema.
///
/// `None` renders as `1=1`.
#[must_use]
pub fn to_where_clause(predicate: Option<&QueryPredicate>) -> SqlWhere {
    to_where_clause_with(&SqlSchema::default(), predicate)
}

/// Renders an optional predicate against the given schema.
#[must_use]
pub fn to_where_clause_with(schema: &SqlSchema, predicate: Option<&QueryPredicate>) -> SqlWhere {
    let mut params = Vec::new();
    let clause = predicate.map_or_else(
        || "1=1".to_string(),
        |p| render(schema, p, &mut params),
    );
    SqlWhere { clause, params }
}

fn render(schema: &SqlSchema, predicate: &QueryPredicate, params: &mut Vec<SqlParam>) -> String {
    match predicate {
        QueryPredicate::And(children) => join(schema, children, " AND ", "1=1", params),
        QueryPredicate::Or(children) => join(schema, children, " OR ", "1=0", params),
        QueryPredicate::CreatedAfter(bound) => {
            params.push(SqlParam::Int(*bound));
            format!("{} > ?", schema.created)
        }
        QueryPredicate::CreatedBefore(bound) => {
            params.push(SqlParam::Int(*bound));
            format!("{} < ?", schema.created)
        }
        QueryPredicate::SeverityIn(levels) => in_list(
            schema.severity,
            levels.iter().map(|l| l.as_str().to_string()),
            params,
        ),
        QueryPredicate::OriginIn(origins) => {
            in_list(schema.origin_service, origins.iter().cloned(), params)
        }
        QueryPredicate::LabelsAny(labels) => {
            let column = format!("{}.{}", schema.labels_table, schema.label);
            let inner = in_list(&column, labels.iter().cloned(), params);
            format!(
                "EXISTS (SELECT 1 FROM {lt} WHERE {lt}.{fk} = {t}.{id} AND {inner})",
                lt = schema.labels_table,
                fk = schema.labels_record_id,
                t = schema.table,
                id = schema.id,
            )
        }
        QueryPredicate::MessageContains(text) => {
            params.push(SqlParam::Text(format!("%{}%", escape_like(text))));
            format!("{} LIKE ? ESCAPE '\\'", schema.message)
        }
    }
}

fn join(
    schema: &SqlSchema,
    children: &[QueryPredicate],
    separator: &str,
    empty: &str,
    params: &mut Vec<SqlParam>,
) -> String {
    if children.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = children
        .iter()
        .map(|c| render(schema, c, params))
        .collect();
    format!("({})", parts.join(separator))
}

fn in_list(
    column: &str,
    values: impl Iterator<Item = String>,
    params: &mut Vec<SqlParam>,
) -> String {
    let before = params.len();
    params.extend(values.map(SqlParam::Text));
    let count = params.len() - before;
    if count == 0 {
        return "1=0".to_string();
    }
    let placeholders = vec!["?"; count].join(", ");
    format!("{column} IN ({placeholders})")
}

/// Escapes `LIKE` wildcards so the text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
