//! In-memory log record storage.
//!
//! This module provides:
//! - [`MemoryLogStore`] - Thread-safe record storage
//! - Implementation of [`LogRecordStore`] for generic usage

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::predicate::{matches_optional, QueryPredicate};
use crate::traits::{LogRecordStore, StoreResult};
use crate::types::LogRecord;

/// Thread-safe in-memory record store.
///
/// Records are kept in insertion order and returned newest first, and leave
/// the store only through [`delete_and_return`](Self::delete_and_return).
/// Finds take a read guard; inserts and deletes take the write guard for
/// their whole duration, so a delete never races a concurrent insert.
pub struct MemoryLogStore {
    /// All records, oldest at the front
    records: RwLock<VecDeque<LogRecord>>,
    /// Whether the store is accepting work
    accepting: AtomicBool,
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            accepting: AtomicBool::new(true),
        }
    }

    fn check_accepting(&self) -> StoreResult<()> {
        if self.accepting.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is stopped".to_string()))
        }
    }

    /// Inserts a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been stopped.
    pub fn insert(&self, record: &LogRecord) -> StoreResult<()> {
        self.check_accepting()?;
        self.records.write().push_back(record.clone());
        Ok(())
    }

    /// Finds matching records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been stopped.
    pub fn find(
        &self,
        predicate: Option<&QueryPredicate>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<LogRecord>> {
        self.check_accepting()?;

        let records = self.records.read();
        Ok(records
            .iter()
            .rev()
            .filter(|r| matches_optional(predicate, r))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    /// Removes matching records and returns them, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store has been stopped.
    pub fn delete_and_return(
        &self,
        predicate: Option<&QueryPredicate>,
    ) -> StoreResult<Vec<LogRecord>> {
        self.check_accepting()?;

        let mut records = self.records.write();
        let mut removed = Vec::new();
        records.retain(|r| {
            if matches_optional(predicate, r) {
                removed.push(r.clone());
                false
            } else {
                true
            }
        });
        removed.reverse();
        Ok(removed)
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Stops accepting work; every operation fails until [`start`](Self::start).
    pub fn stop(&self) {
        self.accepting.store(false, Ordering::Release);
    }

    /// Resumes accepting work.
    pub fn start(&self) {
        self.accepting.store(true, Ordering::Release);
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl LogRecordStore for MemoryLogStore {
    fn insert(&self, record: &LogRecord) -> StoreResult<()> {
        MemoryLogStore::insert(self, record)
    }

    fn find(
        &self,
        predicate: Option<&QueryPredicate>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<LogRecord>> {
        MemoryLogStore::find(self, predicate, limit)
    }

    fn delete_and_return(&self, predicate: Option<&QueryPredicate>) -> StoreResult<Vec<LogRecord>> {
        MemoryLogStore::delete_and_return(self, predicate)
    }

    fn len(&self) -> usize {
        MemoryLogStore::len(self)
    }

    fn is_empty(&self) -> bool {
        MemoryLogStore::is_empty(self)
    }
}
