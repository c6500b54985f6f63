//! Application layer for the engine.
//!
//! - **`engine`** – the [`Engine`](engine::Engine): construction-time
//!   validation, configuration bootstrap, logger activation and the
//!   interrupt-driven run loop.
//!
//! The engine depends on infrastructure only through the concrete storage and
//! logging adapters and the [`InterruptSource`] / [`ConfirmPrompt`] traits, so
//! the run loop is testable without a terminal.
//!
//! [`InterruptSource`]: crate::infrastructure::shutdown::InterruptSource
//! [`ConfirmPrompt`]: crate::infrastructure::shutdown::ConfirmPrompt

pub mod engine;
