//! Core types for level-gated log persistence.
//!
//! This module provides:
//! - [`Severity`] - Ordered log levels
//! - [`LogRecord`] - Immutable structured log record
//! - [`LogRecordBuilder`] - Validating constructor for records
//! - [`MatchCriteria`] - Multi-field filter for finding and removing records

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Log severity levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Most verbose, detailed tracing information
    #[serde(alias = "trace")]
    Trace = 0,
    /// Debugging information
    #[serde(alias = "debug")]
    Debug = 1,
    /// General information
    #[serde(alias = "info")]
    Info = 2,
    /// Warning conditions
    #[serde(alias = "warn")]
    Warn = 3,
    /// Error conditions
    #[serde(alias = "error")]
    Error = 4,
}

impl Severity {
    /// Every severity, lowest first.
    pub const ALL: [Self; 5] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Returns true if this level is at least as severe as the given level.
    #[must_use]
    pub fn is_at_least(&self, level: Self) -> bool {
        *self >= level
    }

    /// Returns the wire name of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogError::InvalidRecord(format!("unrecognized severity: {s:?}")))
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A structured log record submitted by a service.
///
/// Records are immutable once built. Every construction path, including
/// deserialization, rejects an empty origin service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLogRecord")]
pub struct LogRecord {
    #[serde(rename = "created")]
    created_at: i64,
    origin_service: String,
    #[serde(rename = "logLevel")]
    severity: Severity,
    labels: Vec<String>,
    message: String,
}

/// Unvalidated wire form of a [`LogRecord`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogRecord {
    #[serde(default)]
    created: Option<i64>,
    origin_service: String,
    log_level: Severity,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    message: String,
}

impl TryFrom<RawLogRecord> for LogRecord {
    type Error = LogError;

    fn try_from(raw: RawLogRecord) -> Result<Self, Self::Error> {
        let mut builder = LogRecord::builder()
            .origin_service(raw.origin_service)
            .severity(raw.log_level)
            .labels(raw.labels)
            .message(raw.message);
        if let Some(created) = raw.created {
            builder = builder.created_at(created);
        }
        builder.build()
    }
}

impl LogRecord {
    /// Creates a new record builder.
    #[must_use]
    pub fn builder() -> LogRecordBuilder {
        LogRecordBuilder::default()
    }

    /// Parses and validates a record from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidRecord`] for malformed JSON, an unknown
    /// severity, or a missing or empty origin service.
    pub fn from_json(json: &str) -> Result<Self, LogError> {
        serde_json::from_str(json).map_err(|e| LogError::InvalidRecord(e.to_string()))
    }

    /// Creation time in epoch milliseconds.
    #[must_use]
    pub const fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Name of the service that produced the record.
    #[must_use]
    pub fn origin_service(&self) -> &str {
        &self.origin_service
    }

    /// Severity of the record.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Label tags, in submission order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Free-text message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Builder for constructing log records.
#[derive(Debug, Default)]
pub struct LogRecordBuilder {
    created_at: Option<i64>,
    origin_service: Option<String>,
    severity: Option<Severity>,
    labels: Vec<String>,
    message: String,
}

impl LogRecordBuilder {
    /// Sets the creation time in epoch milliseconds.
    #[must_use]
    pub const fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the origin service.
    #[must_use]
    pub fn origin_service(mut self, origin_service: impl Into<String>) -> Self {
        self.origin_service = Some(origin_service.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub const fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Appends a label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Replaces all labels.
    #[must_use]
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Builds the record.
    ///
    /// A record without an explicit creation time is stamped with the
    /// current wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidRecord`] if the origin service is missing
    /// or empty, or if no severity was set.
    pub fn build(self) -> Result<LogRecord, LogError> {
        let origin_service = self
            .origin_service
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| LogError::InvalidRecord("origin service is required".to_string()))?;
        let severity = self
            .severity
            .ok_or_else(|| LogError::InvalidRecord("severity is required".to_string()))?;

        Ok(LogRecord {
            created_at: self.created_at.unwrap_or_else(now_millis),
            origin_service,
            severity,
            labels: self.labels,
            message: self.message,
        })
    }
}

/// Filter criteria for finding and removing records.
///
/// Every non-empty list narrows the match; an empty list does not filter on
/// that dimension. A `start` and `end` of zero together mean "no filter at
/// all", see [`translate`](crate::translate::translate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchCriteria {
    /// Lower creation bound in epoch millis (exclusive, 0 = unbounded)
    pub start: i64,
    /// Upper creation bound in epoch millis (exclusive, 0 = unbounded)
    pub end: i64,
    /// Severities to include
    #[serde(rename = "logLevels")]
    pub levels: Vec<Severity>,
    /// Origin services to include
    pub origin_services: Vec<String>,
    /// Labels, at least one of which a record must carry
    pub labels: Vec<String>,
    /// Substrings, at least one of which the message must contain
    pub message_keywords: Vec<String>,
}

impl MatchCriteria {
    /// Creates empty criteria that match every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates criteria bounded by the given creation range.
    #[must_use]
    pub fn between(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Returns true if neither time bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start <= 0 && self.end <= 0
    }

    /// Adds a severity filter.
    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.levels.push(level);
        self
    }

    /// Adds an origin service filter.
    #[must_use]
    pub fn with_origin_service(mut self, origin_service: impl Into<String>) -> Self {
        self.origin_services.push(origin_service.into());
        self
    }

    /// Adds a label filter.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Adds a message keyword.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.message_keywords.push(keyword.into());
        self
    }
}
