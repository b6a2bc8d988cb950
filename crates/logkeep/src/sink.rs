//! Emission of accepted records to the process log.
//!
//! A [`Sink`] receives every ingested record, whatever the gate decided, and
//! applies its own level filtering.

use tracing::Level;

use crate::types::{LogRecord, Severity};

/// Target used for events carrying ingested records.
pub const RECORD_TARGET: &str = "logkeep::records";

/// Destination for ingested records.
pub trait Sink: Send + Sync {
    /// Emits the record on the channel for its severity.
    ///
    /// Returns whether that channel currently accepts the severity.
    fn emit(&self, record: &LogRecord) -> bool;
}

/// Emits records as `tracing` events under [`RECORD_TARGET`].
///
/// Creation time, origin service, and labels are attached as event fields so
/// subscribers can format or route on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

macro_rules! emit_at {
    ($level:expr, $record:expr) => {{
        let record = $record;
        tracing::event!(
            target: RECORD_TARGET,
            $level,
            created = record.created_at(),
            origin_service = %record.origin_service(),
            labels = ?record.labels(),
            "{}",
            record.message()
        );
        tracing::enabled!(target: RECORD_TARGET, $level)
    }};
}

impl Sink for TracingSink {
    fn emit(&self, record: &LogRecord) -> bool {
        match record.severity() {
            Severity::Trace => emit_at!(Level::TRACE, record),
            Severity::Debug => emit_at!(Level::DEBUG, record),
            Severity::Info => emit_at!(Level::INFO, record),
            Severity::Warn => emit_at!(Level::WARN, record),
            Severity::Error => emit_at!(Level::ERROR, record),
        }
    }
}
