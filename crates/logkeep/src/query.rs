//! Criteria-based retrieval and bulk deletion.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::traits::LogRecordStore;
use crate::translate::translate;
use crate::types::{LogRecord, MatchCriteria};

/// Finds and removes persisted records by [`MatchCriteria`].
///
/// Every call goes straight to the store; nothing is cached here.
#[derive(Clone)]
pub struct LogQueryService {
    store: Arc<dyn LogRecordStore>,
}

/// Maps a caller limit onto a store limit; zero or negative is unbounded.
fn store_limit(limit: i64) -> Option<usize> {
    if limit <= 0 {
        None
    } else {
        Some(usize::try_from(limit).unwrap_or(usize::MAX))
    }
}

impl LogQueryService {
    /// Creates a query service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LogRecordStore>) -> Self {
        Self { store }
    }

    /// Finds records matching `criteria`, at most `limit` of them.
    ///
    /// A `limit` of zero or less returns every match. Unbounded or absent
    /// criteria match every record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Store`](crate::LogError::Store) if the store read fails.
    pub fn find_by_criteria(
        &self,
        criteria: Option<&MatchCriteria>,
        limit: i64,
    ) -> Result<Vec<LogRecord>> {
        let predicate = translate(criteria);
        let records = self.store.find(predicate.as_ref(), store_limit(limit))?;
        debug!(
            found = records.len(),
            limit,
            filtered = predicate.is_some(),
            "found records by criteria"
        );
        Ok(records)
    }

    /// Removes records matching `criteria` and returns them.
    ///
    /// Unbounded or absent criteria remove every record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Store`](crate::LogError::Store) if the store delete
    /// fails. The delete is not retried.
    pub fn remove_by_criteria(&self, criteria: Option<&MatchCriteria>) -> Result<Vec<LogRecord>> {
        let predicate = translate(criteria);
        let removed = self.store.delete_and_return(predicate.as_ref())?;
        info!(
            removed = removed.len(),
            filtered = predicate.is_some(),
            "removed records by criteria"
        );
        Ok(removed)
    }
}
