//! In-memory engine settings derived from the `[logger]` section.
//!
//! [`EngineConfig`] is built in one step, either from the first-run defaults
//! or from a parsed file, and is read-only from then on.  The engine hands out
//! `&EngineConfig` only, so nothing can change it after bootstrap.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::level_filters::LevelFilter;

use super::config::LoggerSection;

/// Severity threshold for the engine logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Maps the level onto a `tracing` filter.  `tracing` has no level above
    /// ERROR, so `Critical` shares it.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.to_level_filter()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// The five settings the engine uses at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory the log file lives in.
    pub log_file_path: PathBuf,
    /// Base name of the log file, without date or extension.
    pub log_file_name: String,
    pub log_level: LogLevel,
    pub log_to_stdio: bool,
    pub log_to_file: bool,
}

impl EngineConfig {
    /// Builds the runtime settings from a `[logger]` section.
    ///
    /// The level is always [`LogLevel::Debug`]: the file has no level key, and
    /// enabling the logger means debug output.
    pub fn from_logger_section(section: &LoggerSection) -> Self {
        Self {
            log_file_path: PathBuf::from(&section.log_dir),
            log_file_name: section.log_file.clone(),
            log_level: LogLevel::Debug,
            log_to_stdio: section.log_to_stdio.is_enabled(),
            log_to_file: section.log_to_file.is_enabled(),
        }
    }

    /// File name for a logger created on `date`: `"{base}_{YYYY-MM-DD}.log"`.
    pub fn dated_log_file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.log", self.log_file_name, date)
    }

    /// Full path of the log file for a logger created on `date`.
    pub fn dated_log_file(&self, date: NaiveDate) -> PathBuf {
        self.log_file_path.join(self.dated_log_file_name(date))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_logger_section(&LoggerSection::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
