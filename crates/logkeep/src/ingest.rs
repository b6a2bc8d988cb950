//! Ingestion of submitted records.
//!
//! [`LogIngestDecider`] emits every record to its [`Sink`] and persists only
//! the records whose severity clears the configured threshold for their
//! origin service.

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::gate::LevelGate;
use crate::sink::Sink;
use crate::traits::LogRecordStore;
use crate::types::LogRecord;

/// Gates, emits, and conditionally persists incoming records.
#[derive(Clone)]
pub struct LogIngestDecider {
    gate: LevelGate,
    sink: Arc<dyn Sink>,
    store: Arc<dyn LogRecordStore>,
}

impl LogIngestDecider {
    /// Creates a decider over the given gate, sink, and store.
    #[must_use]
    pub fn new(gate: LevelGate, sink: Arc<dyn Sink>, store: Arc<dyn LogRecordStore>) -> Self {
        Self { gate, sink, store }
    }

    /// Ingests one record and reports whether it was loggable.
    ///
    /// The record always goes to the sink. It is inserted into the store iff
    /// its severity meets the minimum configured for its origin service, so
    /// a `true` return means the record was persisted.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Store`](crate::LogError::Store) if the insert fails.
    /// The insert is not retried.
    pub fn ingest(&self, record: &LogRecord) -> Result<bool> {
        let loggable = self.gate.decide(record);
        let sink_enabled = self.sink.emit(record);

        trace!(
            origin_service = %record.origin_service(),
            severity = %record.severity(),
            minimum = %self.gate.minimum_for(record.origin_service()),
            loggable,
            sink_enabled,
            "ingest decision"
        );

        if loggable {
            self.store.insert(record)?;
        }
        Ok(loggable)
    }
}
