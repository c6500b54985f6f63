//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module owns the on-disk configuration file:
//!
//! - Creating the file (and its directory) on first run.
//! - Seeding an empty file with the default schema.
//! - Parsing an existing file into the schema types from `dm-core`.

pub mod config;

pub use config::{BootstrapOutcome, ConfigError, ConfigStore};
