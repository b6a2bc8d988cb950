//! Severity gating.

use std::sync::Arc;

use crate::config::SeverityThresholdConfig;
use crate::types::{LogRecord, Severity};

/// Returns true if `severity` meets or exceeds `minimum`.
#[must_use]
pub fn is_loggable(severity: Severity, minimum: Severity) -> bool {
    severity.is_at_least(minimum)
}

/// Decides loggability against per-service thresholds.
///
/// The gate only reads its threshold configuration, so clones can be handed
/// to any number of threads.
#[derive(Debug, Clone, Default)]
pub struct LevelGate {
    thresholds: Arc<SeverityThresholdConfig>,
}

impl LevelGate {
    /// Creates a gate over the given thresholds.
    #[must_use]
    pub fn new(thresholds: SeverityThresholdConfig) -> Self {
        Self {
            thresholds: Arc::new(thresholds),
        }
    }

    /// Minimum severity configured for a service.
    #[must_use]
    pub fn minimum_for(&self, origin_service: &str) -> Severity {
        self.thresholds.minimum_for(origin_service)
    }

    /// Returns true if the record clears its service's threshold.
    #[must_use]
    pub fn decide(&self, record: &LogRecord) -> bool {
        is_loggable(record.severity(), self.minimum_for(record.origin_service()))
    }
}
