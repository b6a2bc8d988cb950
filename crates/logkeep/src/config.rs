//! Process configuration.
//!
//! Configuration is loaded once at start-up and is read-only afterwards:
//! - [`SeverityThresholdConfig`] - Default and per-service minimum severity
//! - [`StoreConfig`] - Which record store to open
//! - [`LogkeepConfig`] - The TOML document combining both
//!
//! ```toml
//! [thresholds]
//! default = "DEBUG"
//!
//! [thresholds.sources]
//! billing = "WARN"
//!
//! [store]
//! kind = "file"
//! dir = "/var/lib/logkeep"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LogError, Result};
use crate::file_store::{FileLogStore, FileLogStoreConfig};
use crate::store::MemoryLogStore;
use crate::traits::LogRecordStore;
use crate::types::Severity;

const fn default_minimum() -> Severity {
    Severity::Info
}

/// Minimum severity per origin service, with a process-wide fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityThresholdConfig {
    /// Minimum severity for services without an override.
    #[serde(default = "default_minimum")]
    pub default: Severity,
    /// Per-service overrides, keyed by origin service name.
    #[serde(default)]
    pub sources: HashMap<String, Severity>,
}

impl Default for SeverityThresholdConfig {
    fn default() -> Self {
        Self::new(default_minimum())
    }
}

impl SeverityThresholdConfig {
    /// Creates a config with the given default and no overrides.
    #[must_use]
    pub fn new(default: Severity) -> Self {
        Self {
            default,
            sources: HashMap::new(),
        }
    }

    /// Adds a per-service override.
    #[must_use]
    pub fn with_source(mut self, origin_service: impl Into<String>, minimum: Severity) -> Self {
        self.sources.insert(origin_service.into(), minimum);
        self
    }

    /// Resolves the minimum severity for a service.
    #[must_use]
    pub fn minimum_for(&self, origin_service: &str) -> Severity {
        self.sources
            .get(origin_service)
            .copied()
            .unwrap_or(self.default)
    }
}

/// Record store selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Volatile in-process store.
    Memory,
    /// JSON-lines files under a directory.
    File {
        /// Directory holding the log files.
        dir: PathBuf,
        /// Size in bytes at which the active file is rotated.
        #[serde(default)]
        max_file_size: Option<u64>,
        /// Prefix for file names.
        #[serde(default)]
        file_prefix: Option<String>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory
    }
}

impl StoreConfig {
    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if a file store directory cannot be created or read.
    pub fn open(&self) -> Result<Arc<dyn LogRecordStore>> {
        match self {
            Self::Memory => {
                debug!("opening in-memory log store");
                Ok(Arc::new(MemoryLogStore::new()))
            }
            Self::File {
                dir,
                max_file_size,
                file_prefix,
            } => {
                debug!(dir = %dir.display(), "opening file log store");
                let mut config = FileLogStoreConfig::new(dir);
                if let Some(size) = max_file_size {
                    config = config.with_max_file_size(*size);
                }
                if let Some(prefix) = file_prefix {
                    config = config.with_file_prefix(prefix.clone());
                }
                Ok(Arc::new(FileLogStore::new(config)?))
            }
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogkeepConfig {
    /// Severity thresholds.
    #[serde(default)]
    pub thresholds: SeverityThresholdConfig,
    /// Record store.
    #[serde(default)]
    pub store: StoreConfig,
}

impl LogkeepConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LogError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| LogError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.sources.keys().any(|name| name.trim().is_empty()) {
            return Err(LogError::Config(
                "threshold source names cannot be empty".to_string(),
            ));
        }

        match &self.store {
            StoreConfig::File { dir, .. } if dir.as_os_str().is_empty() => Err(LogError::Config(
                "store.dir cannot be empty".to_string(),
            )),
            StoreConfig::File {
                max_file_size: Some(0),
                ..
            } => Err(LogError::Config(
                "store.max_file_size must be greater than 0".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogRecord;

    #[test]
    fn thresholds_fall_back_to_default() {
        let config =
            SeverityThresholdConfig::new(Severity::Debug).with_source("noisy", Severity::Warn);
        assert_eq!(config.minimum_for("noisy"), Severity::Warn);
        assert_eq!(config.minimum_for("quiet"), Severity::Debug);
    }

    #[test]
    fn thresholds_default_is_info() {
        assert_eq!(SeverityThresholdConfig::default().default, Severity::Info);
    }

    #[test]
    fn parse_full_config() {
        let config = LogkeepConfig::from_toml(
            r#"
            [thresholds]
            default = "DEBUG"

            [thresholds.sources]
            billing = "WARN"
            inventory = "trace"

            [store]
            kind = "file"
            dir = "/tmp/logkeep"
            max_file_size = 4096
            "#,
        )
        .expect("parse");

        assert_eq!(config.thresholds.default, Severity::Debug);
        assert_eq!(config.thresholds.minimum_for("billing"), Severity::Warn);
        assert_eq!(config.thresholds.minimum_for("inventory"), Severity::Trace);
        assert_eq!(
            config.store,
            StoreConfig::File {
                dir: PathBuf::from("/tmp/logkeep"),
                max_file_size: Some(4096),
                file_prefix: None,
            }
        );
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = LogkeepConfig::from_toml("").expect("parse");
        assert_eq!(config, LogkeepConfig::default());
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn parse_rejects_unknown_severity() {
        let result = LogkeepConfig::from_toml("[thresholds]\ndefault = \"LOUD\"\n");
        assert!(matches!(result, Err(LogError::Config(_))));
    }

    #[test]
    fn memory_store_from_config_keeps_every_record() {
        let config = LogkeepConfig::from_toml("[store]\nkind = \"memory\"\n").expect("parse");
        let store = config.store.open().expect("open");

        for i in 0..100 {
            let record = LogRecord::builder()
                .created_at(i)
                .origin_service("svc")
                .severity(Severity::Info)
                .build()
                .expect("valid record");
            store.insert(&record).expect("insert");
        }
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn validate_rejects_zero_file_size() {
        let result =
            LogkeepConfig::from_toml("[store]\nkind = \"file\"\ndir = \"x\"\nmax_file_size = 0\n");
        assert!(matches!(result, Err(LogError::Config(_))));
    }

    #[test]
    fn validate_rejects_blank_source_name() {
        let config = LogkeepConfig {
            thresholds: SeverityThresholdConfig::default().with_source(" ", Severity::Warn),
            store: StoreConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = LogkeepConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(LogError::Config(msg)) if msg.contains("absent.toml")));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logkeep.toml");
        std::fs::write(&path, "[thresholds]\ndefault = \"ERROR\"\n").expect("write");
        let config = LogkeepConfig::from_file(&path).expect("load");
        assert_eq!(config.thresholds.default, Severity::Error);
    }

    #[test]
    fn open_memory_store() {
        let store = StoreConfig::Memory.open().expect("open");
        assert!(store.is_empty());
    }

    #[test]
    fn open_file_store_creates_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested");
        let store = StoreConfig::File {
            dir: path.clone(),
            max_file_size: None,
            file_prefix: Some("svc".to_string()),
        }
        .open()
        .expect("open");
        assert!(store.is_empty());
        assert!(path.exists());
    }
}
