//! Logger activation.
//!
//! [`LoggerActivator`] turns an [`EngineConfig`] into a [`LoggerHandle`]: a
//! `tracing` dispatcher composed from a level filter and up to two `fmt`
//! layers.
//!
//! ```text
//! Registry
//!  ├─ LevelFilter (always DEBUG for the engine logger)
//!  ├─ fmt layer → stdout            (log_to_stdio)
//!  └─ fmt layer → <dir>/<name>_<date>.log, append, no ANSI   (log_to_file)
//! ```
//!
//! The two sinks are independent.  With both switched off the handle is still
//! valid and simply discards everything.
//!
//! The date in the file name is taken once, when the logger is activated.
//! A process that runs past midnight keeps writing to the same file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use dm_core::{EngineConfig, LogLevel};
use thiserror::Error;
use tracing::{debug, Dispatch};
use tracing_subscriber::{fmt, prelude::*, Registry};

/// Error type for logger activation.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory or file could not be created/opened.
    #[error("I/O error preparing log output at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another subscriber is already installed process-wide.
    #[error("a global logger is already installed")]
    GlobalAlreadySet,
}

/// A ready-to-use logger.
///
/// Cloning is cheap; all clones write to the same sinks.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    dispatch: Dispatch,
    log_file: PathBuf,
    level: LogLevel,
    to_file: bool,
    to_stdio: bool,
}

impl LoggerHandle {
    /// Runs `f` with this logger as the current `tracing` dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Installs this logger as the process-wide default.
    ///
    /// # Errors
    ///
    /// [`LoggingError::GlobalAlreadySet`] if a global default already exists.
    pub fn install_global(&self) -> Result<(), LoggingError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|_| LoggingError::GlobalAlreadySet)
    }

    /// Full path of the dated log file, whether or not the file sink is on.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn writes_to_file(&self) -> bool {
        self.to_file
    }

    pub fn writes_to_stdio(&self) -> bool {
        self.to_stdio
    }
}

/// Builds [`LoggerHandle`]s from engine settings.
#[derive(Debug)]
pub struct LoggerActivator<'a> {
    config: &'a EngineConfig,
}

impl<'a> LoggerActivator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Activates a logger dated with today's local calendar date.
    ///
    /// # Errors
    ///
    /// See [`activate_on`](Self::activate_on).
    pub fn activate(&self) -> Result<LoggerHandle, LoggingError> {
        self.activate_on(Local::now().date_naive())
    }

    /// Activates a logger whose file name carries `date`.
    ///
    /// The log directory is created first, even when the file sink is off.
    ///
    /// # Errors
    ///
    /// [`LoggingError::Io`] if the directory cannot be created or the log file
    /// cannot be opened for appending.
    pub fn activate_on(&self, date: NaiveDate) -> Result<LoggerHandle, LoggingError> {
        let dir = &self.config.log_file_path;
        std::fs::create_dir_all(dir).map_err(|source| LoggingError::Io {
            path: dir.clone(),
            source,
        })?;

        let log_file = self.config.dated_log_file(date);
        let file = if self.config.log_to_file {
            Some(open_log_file(&log_file)?)
        } else {
            None
        };

        let stdout_layer = self
            .config
            .log_to_stdio
            .then(|| fmt::layer().with_writer(io::stdout));
        let file_layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(Arc::new(f)));

        let subscriber = Registry::default()
            .with(self.config.log_level.to_level_filter())
            .with(stdout_layer)
            .with(file_layer);

        let handle = LoggerHandle {
            dispatch: Dispatch::new(subscriber),
            log_file,
            level: self.config.log_level,
            to_file: self.config.log_to_file,
            to_stdio: self.config.log_to_stdio,
        };
        handle.in_scope(|| {
            debug!(
                "logger active: level={}, file={}, stdio={}",
                handle.level, handle.to_file, handle.to_stdio
            )
        });
        Ok(handle)
    }
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Io {
            path: path.to_path_buf(),
            source,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
