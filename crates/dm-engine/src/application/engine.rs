//! The engine: configuration bootstrap, logger lifecycle and the run loop.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized
//!   └─ construct ──► ConfigBootstrapped ──┬─► LoggerActive   (enable_logger)
//!                                         └─► LoggerSkipped  (otherwise)
//!   run() ──► Running ──interrupt──► ShutdownConfirming ──┬─ confirm ─► Terminated
//!               ▲                                         │
//!               └──────────────── reject ─────────────────┘
//! ```
//!
//! Construction validates the enable-logger input before any file I/O, then
//! bootstraps the configuration file (skipped entirely when no path is given)
//! and activates the logger if requested.
//!
//! The run loop has no work of its own yet.  It waits for interrupts and asks
//! for confirmation; a rejected exit resumes the loop with all engine state
//! intact.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dm_core::{validate_enable_logger, EngineConfig, FlagError};
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::logging::{LoggerActivator, LoggerHandle, LoggingError};
use crate::infrastructure::shutdown::{ConfirmPrompt, CtrlCInterrupts, InterruptSource, StdioPrompt};
use crate::infrastructure::storage::{BootstrapOutcome, ConfigError, ConfigStore};

/// Error type for engine construction and the run loop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The enable-logger input failed validation.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// The configuration file could not be created, read or written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The logger could not be activated.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// A logger was requested but no configuration path was given.
    #[error("cannot activate the logger: no configuration has been loaded")]
    ConfigMissing,

    /// Waiting for an interrupt failed.
    #[error("failed to wait for interrupt: {0}")]
    Interrupt(#[source] io::Error),

    /// Reading the exit confirmation failed.
    #[error("failed to read exit confirmation: {0}")]
    Prompt(#[source] io::Error),
}

impl EngineError {
    /// `true` for construction-input errors that are reported to the user
    /// rather than treated as crashes.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Flag(_))
    }
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    ConfigBootstrapped,
    LoggerActive,
    LoggerSkipped,
    Running,
    ShutdownConfirming,
    Terminated,
}

/// Construction inputs.
///
/// `enable_logger` is untyped so that embedders passing values through from
/// documents or scripts get the same validation as the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Configuration file; `None` runs without any configuration file I/O.
    pub gameconf: Option<PathBuf>,
    /// Must be a TOML boolean.
    pub enable_logger: Option<toml::Value>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            gameconf: None,
            enable_logger: Some(toml::Value::Boolean(false)),
        }
    }
}

/// The engine instance.  Owns its configuration and logger exclusively.
#[derive(Debug)]
pub struct Engine {
    config_path: Option<PathBuf>,
    config: Option<EngineConfig>,
    bootstrap: Option<BootstrapOutcome>,
    enable_logger: bool,
    logger: Option<Arc<LoggerHandle>>,
    state: EngineState,
    interrupts_handled: u64,
}

impl Engine {
    /// Constructs an engine with an already-typed enable-logger flag.
    ///
    /// # Errors
    ///
    /// See [`Engine::from_options`].
    pub fn new(gameconf: Option<PathBuf>, enable_logger: bool) -> Result<Self, EngineError> {
        Self::from_options(EngineOptions {
            gameconf,
            enable_logger: Some(toml::Value::Boolean(enable_logger)),
        })
    }

    /// Validates `options`, bootstraps the configuration and, if enabled,
    /// activates the logger.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Flag`] if `enable_logger` is not a boolean or is
    ///   missing; no file I/O has happened in that case.
    /// - [`EngineError::Config`] for configuration file failures.
    /// - [`EngineError::ConfigMissing`] if the logger is enabled without a
    ///   configuration path.
    /// - [`EngineError::Logging`] if the log directory or file cannot be
    ///   prepared.
    pub fn from_options(options: EngineOptions) -> Result<Self, EngineError> {
        let enable_logger = validate_enable_logger(options.enable_logger.as_ref())?;

        let mut engine = Self {
            config_path: options.gameconf,
            config: None,
            bootstrap: None,
            enable_logger,
            logger: None,
            state: EngineState::Uninitialized,
            interrupts_handled: 0,
        };

        if let Some(path) = &engine.config_path {
            let store = ConfigStore::new(path)?;
            let (config, outcome) = store.bootstrap_engine_config()?;
            engine.config = Some(config);
            engine.bootstrap = Some(outcome);
        } else {
            debug!("no configuration path given; skipping config bootstrap");
        }
        engine.state = EngineState::ConfigBootstrapped;

        if engine.enable_logger {
            engine.set_logger()?;
            if let (Some(logger), Some(config)) = (&engine.logger, &engine.config) {
                logger.in_scope(|| {
                    info!("Logging information : {}", config.log_file_path.display())
                });
            }
        } else {
            engine.state = EngineState::LoggerSkipped;
        }

        Ok(engine)
    }

    /// Activates a fresh logger from the loaded configuration and replaces
    /// the current one.  The file name is dated with today's local date.
    ///
    /// # Errors
    ///
    /// [`EngineError::ConfigMissing`] if no configuration is loaded,
    /// [`EngineError::Logging`] if activation fails.
    pub fn set_logger(&mut self) -> Result<(), EngineError> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigMissing)?;
        let handle = LoggerActivator::new(config).activate()?;
        self.logger = Some(Arc::new(handle));
        if matches!(
            self.state,
            EngineState::ConfigBootstrapped | EngineState::LoggerSkipped
        ) {
            self.state = EngineState::LoggerActive;
        }
        Ok(())
    }

    /// The active logger, if any.
    pub fn logger(&self) -> Option<Arc<LoggerHandle>> {
        self.logger.clone()
    }

    /// The loaded settings; `None` when constructed without a config path.
    pub fn config(&self) -> Option<&EngineConfig> {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Whether the configuration file was seeded or loaded at construction.
    pub fn bootstrap_outcome(&self) -> Option<BootstrapOutcome> {
        self.bootstrap
    }

    pub fn logger_enabled(&self) -> bool {
        self.enable_logger
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Interrupts received by [`run`](Self::run) so far.
    pub fn interrupts_handled(&self) -> u64 {
        self.interrupts_handled
    }

    /// Runs the main loop until an interrupt is confirmed at the prompt.
    ///
    /// Returns `Ok(())` once the engine is [`EngineState::Terminated`].
    ///
    /// # Errors
    ///
    /// [`EngineError::Interrupt`] if the interrupt source fails,
    /// [`EngineError::Prompt`] if the confirmation cannot be read.
    pub async fn run<I, P>(&mut self, interrupts: &mut I, prompt: &mut P) -> Result<(), EngineError>
    where
        I: InterruptSource + ?Sized,
        P: ConfirmPrompt + ?Sized,
    {
        loop {
            self.state = EngineState::Running;
            self.log(|| info!("Starting the main loop"));

            interrupts
                .next_interrupt()
                .await
                .map_err(EngineError::Interrupt)?;
            self.interrupts_handled += 1;
            self.state = EngineState::ShutdownConfirming;
            self.log(|| debug!("interrupt received; awaiting exit confirmation"));

            if prompt.confirm_exit().map_err(EngineError::Prompt)? {
                self.state = EngineState::Terminated;
                self.log(|| info!("Engine exiting"));
                return Ok(());
            }
            self.log(|| info!("exit cancelled; resuming main loop"));
        }
    }

    /// [`run`](Self::run) wired to Ctrl-C and the terminal.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_until_exit(&mut self) -> Result<(), EngineError> {
        let mut interrupts = CtrlCInterrupts;
        let mut prompt = StdioPrompt::stdio();
        self.run(&mut interrupts, &mut prompt).await
    }

    /// Emits through the engine logger when one is active, otherwise through
    /// whatever dispatcher is current.
    fn log(&self, f: impl FnOnce()) {
        match &self.logger {
            Some(logger) => logger.in_scope(f),
            None => f(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shutdown::mock::{ScriptedInterrupts, ScriptedPrompt};
    use dm_core::LogLevel;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("dm_engine_test_{}", Uuid::new_v4()))
    }

    /// Writes a config whose log directory is inside `dir`.
    fn write_config(dir: &Path, to_file: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("game.ini");
        let log_dir = dir.join("logs");
        let text = format!(
            "[logger]\nlog_file = session\nlog_dir = {}\nlog_to_file = {to_file}\nlog_to_stdio = disable\nenable_debug = disable\n\n[engine]\nenable_debug = disable\n",
            log_dir.display()
        );
        std::fs::write(&path, text).unwrap();
        path
    }

    // ── Construction validation ───────────────────────────────────────────────

    #[test]
    fn test_string_flag_is_type_error_before_any_io() {
        // Arrange
        let dir = temp_dir();
        let options = EngineOptions {
            gameconf: Some(dir.join("config").join("game.ini")),
            enable_logger: Some(toml::Value::String("yes".to_string())),
        };

        // Act
        let result = Engine::from_options(options);

        // Assert
        assert!(matches!(
            result,
            Err(EngineError::Flag(FlagError::EnableLoggerType { .. }))
        ));
        assert!(!dir.exists(), "validation must fail before touching the disk");
    }

    #[test]
    fn test_missing_flag_is_value_error_before_any_io() {
        let dir = temp_dir();
        let options = EngineOptions {
            gameconf: Some(dir.join("game.ini")),
            enable_logger: None,
        };

        let err = Engine::from_options(options).unwrap_err();

        assert!(matches!(err, EngineError::Flag(FlagError::EnableLoggerValue)));
        assert!(err.is_validation());
        assert!(!dir.exists());
    }

    // ── Bootstrap ─────────────────────────────────────────────────────────────

    #[test]
    fn test_no_config_path_skips_bootstrap() {
        let engine = Engine::new(None, false).expect("construct");

        assert!(engine.config().is_none());
        assert!(engine.config_path().is_none());
        assert!(engine.bootstrap_outcome().is_none());
        assert!(engine.logger().is_none());
        assert_eq!(engine.state(), EngineState::LoggerSkipped);
    }

    #[test]
    fn test_logger_without_config_is_an_error() {
        let err = Engine::new(None, true).unwrap_err();
        assert!(matches!(err, EngineError::ConfigMissing));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_fresh_path_is_seeded_with_defaults() {
        // Arrange
        let dir = temp_dir();
        let path = dir.join("config").join("game.ini");

        // Act
        let engine = Engine::new(Some(path.clone()), false).expect("construct");

        // Assert
        assert_eq!(engine.bootstrap_outcome(), Some(BootstrapOutcome::Seeded));
        assert_eq!(engine.config(), Some(&EngineConfig::default()));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert_eq!(engine.state(), EngineState::LoggerSkipped);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_existing_config_is_loaded_and_logger_activated() {
        // Arrange
        let dir = temp_dir();
        let path = write_config(&dir, "enable");

        // Act
        let engine = Engine::new(Some(path), true).expect("construct");

        // Assert
        let cfg = engine.config().expect("config loaded");
        assert_eq!(cfg.log_file_name, "session");
        assert_eq!(cfg.log_file_path, dir.join("logs"));
        assert!(cfg.log_to_file);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(engine.bootstrap_outcome(), Some(BootstrapOutcome::Loaded));
        assert_eq!(engine.state(), EngineState::LoggerActive);

        let logger = engine.logger().expect("logger active");
        let content = std::fs::read_to_string(logger.log_file()).expect("log file written");
        assert!(content.contains("Logging information"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_set_logger_replaces_handle() {
        let dir = temp_dir();
        let path = write_config(&dir, "disable");
        let mut engine = Engine::new(Some(path), false).unwrap();
        assert!(engine.logger().is_none());

        engine.set_logger().expect("set logger");

        assert!(engine.logger().is_some());
        assert_eq!(engine.state(), EngineState::LoggerActive);

        std::fs::remove_dir_all(&dir).ok();
    }

    // ── Run loop ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_confirming_answers_terminate() {
        for answer in ["", "y", "Yes"] {
            // Arrange
            let mut engine = Engine::new(None, false).unwrap();
            let mut interrupts = ScriptedInterrupts::new(1);
            let mut prompt = ScriptedPrompt::new([answer]);

            // Act
            engine.run(&mut interrupts, &mut prompt).await.expect("run");

            // Assert
            assert_eq!(engine.state(), EngineState::Terminated, "answer {answer:?}");
            assert_eq!(engine.interrupts_handled(), 1);
        }
    }

    #[tokio::test]
    async fn test_rejecting_answers_resume_until_confirmed() {
        // Arrange
        let mut engine = Engine::new(None, false).unwrap();
        let mut interrupts = ScriptedInterrupts::new(3);
        let mut prompt = ScriptedPrompt::new(["n", "no", "y"]);

        // Act
        engine.run(&mut interrupts, &mut prompt).await.expect("run");

        // Assert
        assert_eq!(engine.state(), EngineState::Terminated);
        assert_eq!(engine.interrupts_handled(), 3);
        assert_eq!(prompt.asked(), ["n", "no", "y"]);
    }

    #[tokio::test]
    async fn test_reject_returns_to_running_without_state_loss() {
        // Arrange: one interrupt, rejected; the next wait fails because the
        // script is exhausted, which surfaces the state the loop resumed in.
        let dir = temp_dir();
        let path = write_config(&dir, "disable");
        let mut engine = Engine::new(Some(path), false).unwrap();
        let before = engine.config().cloned();
        let mut interrupts = ScriptedInterrupts::new(1);
        let mut prompt = ScriptedPrompt::new(["no"]);

        // Act
        let result = engine.run(&mut interrupts, &mut prompt).await;

        // Assert
        assert!(matches!(result, Err(EngineError::Interrupt(_))));
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.config().cloned(), before);

        std::fs::remove_dir_all(&dir).ok();
    }
}
