//! Traits for log record storage backends.
//!
//! This module provides the [`LogRecordStore`] trait for abstracting over
//! storage implementations (in-memory, file-based, external databases).

use crate::error::StoreError;
use crate::predicate::QueryPredicate;
use crate::types::LogRecord;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for log record storage backends.
///
/// A `None` predicate means "every record". Implementors are responsible for
/// their own atomicity: [`delete_and_return`](Self::delete_and_return) must
/// return exactly the records it removed.
pub trait LogRecordStore: Send + Sync {
    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist the record.
    fn insert(&self, record: &LogRecord) -> StoreResult<()>;

    /// Finds records matching the predicate, at most `limit` of them.
    ///
    /// `None` for `limit` means unbounded. Result order is backend-defined.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn find(
        &self,
        predicate: Option<&QueryPredicate>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<LogRecord>>;

    /// Removes records matching the predicate and returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn delete_and_return(&self, predicate: Option<&QueryPredicate>) -> StoreResult<Vec<LogRecord>>;

    /// Returns the number of stored records.
    ///
    /// For file-based stores, this may be an approximation.
    fn len(&self) -> usize;

    /// Returns true if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
