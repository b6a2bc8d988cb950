//! File-based record storage with rotation support.
//!
//! This module provides:
//! - [`FileLogStore`] - Persistent record storage backed by files
//! - Log rotation based on size
//! - JSON-lines format, one record per line, in the record's wire form
//! - Implementation of [`LogRecordStore`]

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::predicate::{matches_optional, QueryPredicate};
use crate::traits::{LogRecordStore, StoreResult};
use crate::types::LogRecord;

/// Configuration for file-based record storage.
#[derive(Debug, Clone)]
pub struct FileLogStoreConfig {
    /// Base directory for log files.
    pub base_dir: PathBuf,
    /// Maximum size of a single log file before rotation (bytes).
    pub max_file_size: u64,
    /// Prefix for log file names.
    pub file_prefix: String,
}

impl Default for FileLogStoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("logs"),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            file_prefix: "logkeep".to_string(),
        }
    }
}

impl FileLogStoreConfig {
    /// Creates a new config with the given base directory.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the max file size for rotation.
    #[must_use]
    pub const fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Sets the file prefix.
    #[must_use]
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}

/// Internal state for file management.
struct FileState {
    /// Current active log file path.
    current_file: Option<PathBuf>,
    /// Current file size in bytes.
    current_size: u64,
    /// List of rotated log files (oldest first).
    rotated_files: Vec<PathBuf>,
}

impl FileState {
    /// All files, newest first.
    fn files_newest_first(&self) -> Vec<PathBuf> {
        self.current_file
            .iter()
            .chain(self.rotated_files.iter().rev())
            .cloned()
            .collect()
    }
}

/// File-based record storage with rotation.
///
/// Stores records as JSON lines, rotating when the active file would exceed
/// its size limit. Inserts and deletes hold the write guard for their whole
/// duration; a delete stages every rewrite before replacing any file.
pub struct FileLogStore {
    config: FileLogStoreConfig,
    state: RwLock<FileState>,
    /// Monotonic counter for unique filenames (avoids collisions within same millisecond).
    file_seq: AtomicU64,
}

impl FileLogStore {
    /// Creates a new file store, picking up files left by a previous run.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory cannot be created or listed.
    pub fn new(config: FileLogStoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.base_dir)?;

        let mut files: Vec<PathBuf> = fs::read_dir(&config.base_dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.extension().is_some_and(|ext| ext == "log")
                    && p.file_name()
                        .is_some_and(|n| n.to_string_lossy().starts_with(&config.file_prefix))
            })
            .collect();
        files.sort();

        let mut current_file = None;
        let mut current_size = 0u64;
        if let Some(last) = files.pop() {
            current_size = fs::metadata(&last)?.len();
            current_file = Some(last);
        }

        info!(
            dir = %config.base_dir.display(),
            files = files.len() + usize::from(current_file.is_some()),
            "opened file log store"
        );

        Ok(Self {
            config,
            state: RwLock::new(FileState {
                current_file,
                current_size,
                rotated_files: files,
            }),
            file_seq: AtomicU64::new(0),
        })
    }

    /// Creates a file store with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory cannot be created.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::new(FileLogStoreConfig::new(base_dir))
    }

    /// Appends a record to the active file.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn insert(&self, record: &LogRecord) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        let line = format!("{json}\n");
        let line_bytes = line.len() as u64;

        let mut state = self.state.write();

        // Rotate unless the active file is still empty
        if state.current_size > 0 && state.current_size + line_bytes > self.config.max_file_size {
            self.rotate_locked(&mut state);
        }

        let path = match &state.current_file {
            Some(path) => path.clone(),
            None => {
                let path = self.config.base_dir.join(self.generate_filename());
                state.current_file = Some(path.clone());
                state.current_size = 0;
                path
            }
        };

        if let Err(e) = append_line(&path, line.as_bytes()) {
            // Part of the line may have reached the disk
            state.current_size = fs::metadata(&path).map_or(state.current_size, |m| m.len());
            return Err(e.into());
        }
        state.current_size += line_bytes;

        Ok(())
    }

    /// Finds matching records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or holds an unreadable line.
    pub fn find(
        &self,
        predicate: Option<&QueryPredicate>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<LogRecord>> {
        let state = self.state.read();
        let limit = limit.unwrap_or(usize::MAX);
        let mut results = Vec::new();

        for path in state.files_newest_first() {
            if results.len() >= limit {
                break;
            }
            let remaining = limit - results.len();
            let records = read_records(&path)?;
            results.extend(
                records
                    .into_iter()
                    .rev()
                    .filter(|r| matches_optional(predicate, r))
                    .take(remaining),
            );
        }

        Ok(results)
    }

    /// Removes matching records from every file and returns them, newest first.
    ///
    /// Every file is read and every replacement is staged before any file is
    /// touched, so a read or staging failure leaves the store unchanged.
    /// Rotated files left empty are deleted; the active file is truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, holds an unreadable line, or
    /// cannot be replaced.
    pub fn delete_and_return(
        &self,
        predicate: Option<&QueryPredicate>,
    ) -> StoreResult<Vec<LogRecord>> {
        let mut state = self.state.write();

        let mut affected = Vec::new();
        for path in state.files_newest_first() {
            let (gone, kept): (Vec<LogRecord>, Vec<LogRecord>) = read_records(&path)?
                .into_iter()
                .partition(|r| matches_optional(predicate, r));
            if !gone.is_empty() {
                affected.push((path, gone, kept));
            }
        }

        let mut staged = Vec::new();
        for (path, _, kept) in &affected {
            let is_current = state.current_file.as_ref() == Some(path);
            if kept.is_empty() && !is_current {
                continue;
            }
            match stage_rewrite(path, kept) {
                Ok(tmp) => staged.push(tmp),
                Err(e) => {
                    staged.push(staged_path(path));
                    discard_staged(&staged);
                    return Err(e);
                }
            }
        }

        let mut removed = Vec::new();
        for (path, gone, kept) in affected {
            let is_current = state.current_file.as_ref() == Some(&path);
            if kept.is_empty() && !is_current {
                fs::remove_file(&path)?;
                state.rotated_files.retain(|p| p != &path);
                debug!(file = %path.display(), "removed emptied log file");
            } else {
                fs::rename(staged_path(&path), &path)?;
                if is_current {
                    state.current_size = fs::metadata(&path)?.len();
                }
            }
            removed.extend(gone.into_iter().rev());
        }

        Ok(removed)
    }

    // ========== Internal Methods ==========

    fn rotate_locked(&self, state: &mut FileState) {
        if let Some(current) = state.current_file.take() {
            debug!(file = %current.display(), size = state.current_size, "rotating log file");
            state.rotated_files.push(current);
        }

        let path = self.config.base_dir.join(self.generate_filename());
        state.current_file = Some(path);
        state.current_size = 0;
    }

    fn generate_filename(&self) -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let seq = self.file_seq.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}_s{:04}.log", self.config.file_prefix, timestamp, seq)
    }

    /// Counts the total number of records across all files.
    fn count_records(&self) -> usize {
        let state = self.state.read();
        state
            .files_newest_first()
            .iter()
            .map(|path| count_lines(path))
            .sum()
    }
}

fn append_line(path: &Path, line: &[u8]) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(line)?;
    writer.flush()
}

/// Reads every record in a file, oldest first. A missing file is empty.
fn read_records(path: &Path) -> StoreResult<Vec<LogRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            StoreError::Corrupt(format!("{}:{}: {e}", path.display(), number + 1))
        })?;
        records.push(record);
    }
    Ok(records)
}

fn staged_path(path: &Path) -> PathBuf {
    path.with_extension("log.tmp")
}

/// Writes `records` to the staging file beside `path` and returns its path.
fn stage_rewrite(path: &Path, records: &[LogRecord]) -> StoreResult<PathBuf> {
    let tmp = staged_path(path);
    let mut writer = BufWriter::new(File::create(&tmp)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(tmp)
}

fn discard_staged(staged: &[PathBuf]) {
    for tmp in staged {
        if let Err(e) = fs::remove_file(tmp) {
            debug!(file = %tmp.display(), error = %e, "failed to discard staged rewrite");
        }
    }
}

fn count_lines(path: &Path) -> usize {
    let Ok(file) = File::open(path) else {
        return 0;
    };
    BufReader::new(file)
        .lines()
        .map_while(std::result::Result::ok)
        .filter(|l| !l.trim().is_empty())
        .count()
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl LogRecordStore for FileLogStore {
    fn insert(&self, record: &LogRecord) -> StoreResult<()> {
        FileLogStore::insert(self, record)
    }

    fn find(
        &self,
        predicate: Option<&QueryPredicate>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<LogRecord>> {
        FileLogStore::find(self, predicate, limit)
    }

    fn delete_and_return(&self, predicate: Option<&QueryPredicate>) -> StoreResult<Vec<LogRecord>> {
        FileLogStore::delete_and_return(self, predicate)
    }

    fn len(&self) -> usize {
        self.count_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use tempfile::TempDir;

    fn make_record(severity: Severity, message: &str) -> LogRecord {
        LogRecord::builder()
            .created_at(100)
            .origin_service("svc")
            .severity(severity)
            .labels(["l1"])
            .message(message)
            .build()
            .expect("valid record")
    }

    fn make_temp_store() -> (FileLogStore, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = FileLogStoreConfig::new(temp_dir.path());
        let store = FileLogStore::new(config).expect("create store");
        (store, temp_dir)
    }

    /// Store that rotates before every insert into a non-empty file.
    fn make_one_per_file_store() -> (FileLogStore, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = FileLogStoreConfig::new(temp_dir.path()).with_max_file_size(1);
        let store = FileLogStore::new(config).expect("create store");
        (store, temp_dir)
    }

    fn log_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .expect("list dir")
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn file_store_creates_directory() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("nested/logs");
        let config = FileLogStoreConfig::new(&path);
        let store = FileLogStore::new(config);
        assert!(store.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn file_store_find_returns_newest_first() {
        let (store, _dir) = make_temp_store();

        let _ = store.insert(&make_record(Severity::Info, "first"));
        let _ = store.insert(&make_record(Severity::Info, "second"));
        let _ = store.insert(&make_record(Severity::Info, "third"));

        let results = store.find(None, None).expect("find");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].message(), "third");
        assert_eq!(results[1].message(), "second");
        assert_eq!(results[2].message(), "first");
    }

    #[test]
    fn file_store_find_with_limit() {
        let (store, _dir) = make_temp_store();

        for i in 0..10 {
            let _ = store.insert(&make_record(Severity::Info, &format!("message {i}")));
        }

        let results = store.find(None, Some(3)).expect("find");
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn file_store_find_with_predicate() {
        let (store, _dir) = make_temp_store();

        let _ = store.insert(&make_record(Severity::Info, "info message"));
        let _ = store.insert(&make_record(Severity::Error, "error message"));
        let _ = store.insert(&make_record(Severity::Warn, "warn message"));

        let predicate = QueryPredicate::SeverityIn(vec![Severity::Error]);
        let results = store.find(Some(&predicate), None).expect("find");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity(), Severity::Error);
    }

    #[test]
    fn file_store_rotates_on_size() {
        let temp_dir = TempDir::new().expect("create temp dir");
        // Very small to trigger rotation
        let config = FileLogStoreConfig::new(temp_dir.path()).with_max_file_size(100);

        let store = FileLogStore::new(config).expect("create store");

        for i in 0..10 {
            let _ = store.insert(&make_record(
                Severity::Info,
                &format!("message {i} with some extra text to make it bigger"),
            ));
        }

        assert!(log_files(temp_dir.path()).len() > 1);
        let results = store.find(None, None).expect("find");
        assert_eq!(results.len(), 10);
        assert!(results[0].message().starts_with("message 9"));
    }

    #[test]
    fn file_store_delete_spans_rotated_files() {
        let (store, dir) = make_one_per_file_store();

        let _ = store.insert(&make_record(Severity::Error, "old failure"));
        let _ = store.insert(&make_record(Severity::Info, "old ok"));
        let _ = store.insert(&make_record(Severity::Error, "new failure"));
        let _ = store.insert(&make_record(Severity::Error, "only failure"));
        assert_eq!(log_files(dir.path()).len(), 4);

        let predicate = QueryPredicate::SeverityIn(vec![Severity::Error]);
        let removed = store.delete_and_return(Some(&predicate)).expect("delete");

        let messages: Vec<&str> = removed.iter().map(LogRecord::message).collect();
        assert_eq!(messages, vec!["only failure", "new failure", "old failure"]);

        // Emptied rotated files are gone; the truncated active one is kept
        assert_eq!(log_files(dir.path()).len(), 2);
        let remaining = store.find(None, None).expect("find");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message(), "old ok");
    }

    #[test]
    fn file_store_delete_touches_nothing_when_an_older_file_is_corrupt() {
        let (store, dir) = make_one_per_file_store();

        let _ = store.insert(&make_record(Severity::Info, "old"));
        let oldest = log_files(dir.path()).remove(0);
        let mut file = OpenOptions::new().append(true).open(&oldest).expect("open");
        file.write_all(b"{bad}\n").expect("write");
        let _ = store.insert(&make_record(Severity::Info, "new"));

        let result = store.delete_and_return(None);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));

        // The newer file still holds its record
        let newest = store.find(None, Some(1)).expect("find");
        assert_eq!(newest.len(), 1);
        assert_eq!(newest[0].message(), "new");
        assert_eq!(log_files(dir.path()).len(), 2);
        assert!(fs::read_dir(dir.path())
            .expect("list dir")
            .filter_map(std::result::Result::ok)
            .all(|e| !e.path().to_string_lossy().ends_with(".tmp")));
    }

    #[test]
    fn file_store_delete_then_find_is_empty() {
        let (store, _dir) = make_temp_store();
        let _ = store.insert(&make_record(Severity::Info, "a"));
        let _ = store.insert(&make_record(Severity::Info, "b"));

        assert_eq!(store.delete_and_return(None).expect("delete").len(), 2);
        assert!(store.find(None, None).expect("find").is_empty());
        assert_eq!(store.len(), 0);

        // The truncated active file still accepts appends
        let _ = store.insert(&make_record(Severity::Info, "c"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_store_reports_corrupt_lines() {
        let (store, dir) = make_temp_store();
        let _ = store.insert(&make_record(Severity::Info, "fine"));

        let path = log_files(dir.path()).remove(0);
        let mut file = OpenOptions::new().append(true).open(&path).expect("open");
        file.write_all(b"{not json}\n").expect("write");

        let result = store.find(None, None);
        assert!(matches!(result, Err(StoreError::Corrupt(msg)) if msg.contains(":2:")));
    }

    #[test]
    fn file_store_failed_append_resyncs_size() {
        let (store, _dir) = make_temp_store();
        let _ = store.insert(&make_record(Severity::Info, "first"));

        let path = store.state.read().current_file.clone().expect("active file");
        fs::remove_file(&path).expect("remove");
        fs::create_dir(&path).expect("replace with directory");

        let result = store.insert(&make_record(Severity::Info, "second"));
        assert!(matches!(result, Err(StoreError::Io(_))));
        let on_disk = fs::metadata(&path).expect("metadata").len();
        assert_eq!(store.state.read().current_size, on_disk);
    }

    #[test]
    fn file_store_config_defaults() {
        let config = FileLogStoreConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("logs"));
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.file_prefix, "logkeep");
    }

    #[test]
    fn file_store_config_builder() {
        let config = FileLogStoreConfig::new("/var/log/app")
            .with_max_file_size(5 * 1024 * 1024)
            .with_file_prefix("myapp");

        assert_eq!(config.base_dir, PathBuf::from("/var/log/app"));
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.file_prefix, "myapp");
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config = FileLogStoreConfig::new(temp_dir.path());

        {
            let store = FileLogStore::new(config.clone()).expect("create store");
            let _ = store.insert(&make_record(Severity::Warn, "persisted"));
        }

        {
            let store = FileLogStore::new(config).expect("reopen store");
            let results = store.find(None, None).expect("find");
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].message(), "persisted");
            assert_eq!(results[0].severity(), Severity::Warn);
            assert_eq!(results[0].labels(), ["l1"]);
        }
    }

    #[test]
    fn file_store_ignores_foreign_files() {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::write(temp_dir.path().join("other_20240101.log"), "garbage\n").expect("write");
        fs::write(temp_dir.path().join("logkeep_notes.txt"), "garbage\n").expect("write");

        let store = FileLogStore::with_base_dir(temp_dir.path()).expect("create store");
        assert!(store.state.read().current_file.is_none());
        assert!(store.find(None, None).expect("find").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_find_empty_returns_empty() {
        let (store, _dir) = make_temp_store();
        let results = store.find(None, Some(10)).expect("find");
        assert!(results.is_empty());
    }
}
