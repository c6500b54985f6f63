//! Domain layer for the dm engine.
//!
//! Pure types and rules only.  Reading and writing the configuration file,
//! creating loggers, and listening for signals all live in `dm-engine`.

pub mod config;
pub mod engine_config;
pub mod flag;
pub mod shutdown;
