//! Error types for ingestion, queries, and storage backends.

use thiserror::Error;

/// Errors raised by a [`LogRecordStore`](crate::traits::LogRecordStore) backend.
///
/// These are surfaced to callers unchanged; nothing in this crate retries a
/// failed store call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be reached or refuses work.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend gave up waiting for the operation to complete.
    #[error("store operation timed out: {0}")]
    Timeout(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted data is unreadable.
    #[error("corrupt store data: {0}")]
    Corrupt(String),
}

/// Errors surfaced by the logging core.
#[derive(Debug, Error)]
pub enum LogError {
    /// A record failed boundary validation.
    #[error("invalid log record: {0}")]
    InvalidRecord(String),

    /// Configuration could not be parsed or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for logging operations.
pub type Result<T> = std::result::Result<T, LogError>;
