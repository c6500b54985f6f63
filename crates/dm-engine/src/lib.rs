//! dm-engine library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

/// Application layer: the engine lifecycle and run loop.
pub mod application;

/// Infrastructure layer: config storage, logging, shutdown handling.
pub mod infrastructure;

pub use application::engine::{Engine, EngineError, EngineOptions, EngineState};
pub use infrastructure::logging::{LoggerActivator, LoggerHandle, LoggingError};
pub use infrastructure::storage::{BootstrapOutcome, ConfigError, ConfigStore};
