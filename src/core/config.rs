//! Logger configuration
//!
//! Everything a [`Logger`](super::Logger) needs at construction time, plus the
//! initial state of the switches that can later be changed at runtime.
//! Every field has a default, so a configuration file only needs to list
//! what it changes.

use super::error::{LoggerError, Result};
use super::formatter::DEFAULT_LINE_TERMINATOR;
use super::log_level::LevelSet;
use super::output::OutputSet;
use super::timestamp::TimestampZone;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the directory created under `base_dir` to hold log files
pub const LOG_SUBDIR: &str = "log";

/// Default upper bound on how long the idle worker sleeps between wake-ups
pub const DEFAULT_IDLE_WAIT_MS: u64 = 300;

/// Construction parameters and initial switches
///
/// # Example
///
/// ```
/// use fanout_logger::{LoggerConfig, LogLevel, OutputType};
///
/// let config = LoggerConfig::from_json_str(r#"{
///     "base_dir": "/tmp/app",
///     "file_name": "server.log",
///     "outputs": ["Console", "LogFile"],
///     "levels": ["Debug", "Info", "Warn", "Error", "Fatal"],
///     "modules": { "1": "http", "2": "db" }
/// }"#).unwrap();
///
/// assert!(config.outputs.contains(OutputType::Console));
/// assert!(config.levels.contains(LogLevel::Debug));
/// assert!(config.detail_mode);
/// assert_eq!(config.modules[&2], "db");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory under which `log/` is created
    pub base_dir: PathBuf,
    /// File name appended to the date, e.g. `2024-01-02_<file_name>`
    pub file_name: String,
    pub outputs: OutputSet,
    pub levels: LevelSet,
    pub detail_mode: bool,
    /// ANSI colors on the console, keyed by level
    pub colorful: bool,
    pub reverse_filter: bool,
    pub timestamp_zone: TimestampZone,
    pub line_terminator: String,
    /// Longest time the idle worker waits before checking its state again
    pub idle_wait_ms: u64,
    pub modules: HashMap<i32, String>,
    pub and_filters: Vec<String>,
    pub or_filters: Vec<String>,
    pub module_filters: Vec<i32>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            file_name: "app.log".to_string(),
            outputs: OutputSet::default(),
            levels: LevelSet::default(),
            detail_mode: true,
            colorful: true,
            reverse_filter: false,
            timestamp_zone: TimestampZone::default(),
            line_terminator: DEFAULT_LINE_TERMINATOR.to_string(),
            idle_wait_ms: DEFAULT_IDLE_WAIT_MS,
            modules: HashMap::new(),
            and_filters: Vec::new(),
            or_filters: Vec::new(),
            module_filters: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Default configuration writing `<base_dir>/log/<date>_<file_name>`
    pub fn new(base_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.trim().is_empty() {
            return Err(LoggerError::config("file_name", "must not be empty"));
        }
        if self.file_name.contains(|c| c == '/' || c == '\\') {
            return Err(LoggerError::config(
                "file_name",
                format!("'{}' must not contain path separators", self.file_name),
            ));
        }
        if self.idle_wait_ms == 0 {
            return Err(LoggerError::config("idle_wait_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// Directory holding the dated log files
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join(LOG_SUBDIR)
    }

    /// Worker idle wait, never zero even when validation was skipped
    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms.max(1))
    }
}
