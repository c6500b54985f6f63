//! # dm-core
//!
//! Shared domain types for the dm engine.
//!
//! This crate has no file-system, terminal, or signal dependencies.  It
//! defines:
//!
//! - **`domain::config`** – the on-disk configuration schema (`[logger]` and
//!   `[engine]` sections) together with the first-run defaults.
//!
//! - **`domain::engine_config`** – the in-memory [`EngineConfig`] record the
//!   engine builds once from the schema and then only reads.
//!
//! - **`domain::flag`** – validation of the untyped "enable logger" input.
//!
//! - **`domain::shutdown`** – the rule deciding whether an answer to the
//!   exit prompt confirms termination.

pub mod domain;

pub use domain::config::{EngineSection, GameConfig, LoggerSection, Toggle};
pub use domain::engine_config::{EngineConfig, LogLevel};
pub use domain::flag::{validate_enable_logger, FlagError};
pub use domain::shutdown::is_exit_confirmed;
