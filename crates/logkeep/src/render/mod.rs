//! Predicate renderers for external storage backends.
//!
//! Each renderer expresses the same [`QueryPredicate`](crate::QueryPredicate)
//! semantics in a backend's own query language:
//! - [`sql`] - Parameterized relational `WHERE` clause
//! - [`document`] - Document-store filter in the `$and`/`$or`/`$in` dialect
//!
//! In-process stores need no renderer; they call
//! [`QueryPredicate::matches`](crate::QueryPredicate::matches) directly.

pub mod document;
pub mod sql;

pub use document::to_filter;
pub use sql::{to_where_clause, SqlParam, SqlSchema, SqlWhere};
