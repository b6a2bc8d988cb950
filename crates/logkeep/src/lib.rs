//! # logkeep
//!
//! Level-gated log persistence for distributed services.
//!
//! Services submit [`LogRecord`]s. Every record is emitted to a [`Sink`];
//! only records whose [`Severity`] meets the threshold configured for their
//! origin service are persisted. Persisted records can later be found or
//! removed in bulk by [`MatchCriteria`].
//!
//! This crate provides:
//!
//! - [`LogRecord`] - Immutable record with timestamp, origin, severity, labels, and message
//! - [`Severity`] - Ordered severity levels (Trace, Debug, Info, Warn, Error)
//! - [`LevelGate`] - Per-origin threshold decisions
//! - [`LogIngestDecider`] - Emit, gate, and persist incoming records
//! - [`MatchCriteria`] / [`QueryPredicate`] - Caller-facing criteria and the compiled predicate
//! - [`LogQueryService`] - Find and remove records by criteria
//! - [`MemoryLogStore`] / [`FileLogStore`] - Storage backends behind [`LogRecordStore`]
//! - [`render`] - SQL and document-filter renderings of a predicate
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use logkeep::{
//!     LevelGate, LogIngestDecider, LogQueryService, LogRecord, MatchCriteria,
//!     MemoryLogStore, SeverityThresholdConfig, Severity, TracingSink,
//! };
//!
//! let store = Arc::new(MemoryLogStore::new());
//! let gate = LevelGate::new(SeverityThresholdConfig::new(Severity::Debug));
//! let decider = LogIngestDecider::new(gate, Arc::new(TracingSink::new()), store.clone());
//!
//! let record = LogRecord::builder()
//!     .origin_service("billing")
//!     .severity(Severity::Warn)
//!     .label("payments")
//!     .message("card declined")
//!     .build()?;
//! assert!(decider.ingest(&record)?);
//!
//! let queries = LogQueryService::new(store);
//! // Both bounds are set, so the label filter applies
//! let criteria = MatchCriteria::between(1, i64::MAX).with_label("payments");
//! assert_eq!(queries.find_by_criteria(Some(&criteria), -1)?.len(), 1);
//! # Ok::<(), logkeep::LogError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod file_store;
pub mod gate;
pub mod ingest;
pub mod predicate;
pub mod query;
pub mod render;
pub mod sink;
pub mod store;
pub mod traits;
pub mod translate;
pub mod types;

// Re-export main types
pub use config::{LogkeepConfig, SeverityThresholdConfig, StoreConfig};
pub use error::{LogError, Result, StoreError};
pub use file_store::{FileLogStore, FileLogStoreConfig};
pub use gate::{is_loggable, LevelGate};
pub use ingest::LogIngestDecider;
pub use predicate::{matches_optional, QueryPredicate};
pub use query::LogQueryService;
pub use sink::{Sink, TracingSink, RECORD_TARGET};
pub use store::MemoryLogStore;
pub use traits::{LogRecordStore, StoreResult};
pub use translate::translate;
pub use types::{now_millis, LogRecord, LogRecordBuilder, MatchCriteria, Severity};
