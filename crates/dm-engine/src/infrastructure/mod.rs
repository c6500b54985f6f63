//! Infrastructure layer for the engine.
//!
//! OS-facing adapters: configuration file storage, `tracing` logger
//! construction, and Ctrl-C / terminal handling for shutdown confirmation.

pub mod logging;
pub mod shutdown;
pub mod storage;
