//! Validation of the "enable logger" construction input.
//!
//! Embedders may hand the engine an untyped value (read from a document,
//! an environment override, a scripting layer).  It must be a boolean.
//! The type is checked before presence, so a present non-boolean value is
//! always a type error and only an absent value is a value error.

use thiserror::Error;
use toml::Value;

/// Construction-time validation failures for the enable-logger flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The flag was supplied but is not a boolean.
    #[error("Enable-Logger-Type error: enable logger must be of type boolean, got {found}")]
    EnableLoggerType { found: &'static str },

    /// The flag was not supplied at all.
    #[error("Enable-Logger-Value error: a boolean value is required for enable logger")]
    EnableLoggerValue,
}

/// Checks the raw enable-logger input and returns the boolean it carries.
///
/// # Errors
///
/// [`FlagError::EnableLoggerType`] for any non-boolean value,
/// [`FlagError::EnableLoggerValue`] when the value is missing.
pub fn validate_enable_logger(raw: Option<&Value>) -> Result<bool, FlagError> {
    match raw {
        Some(Value::Boolean(enabled)) => Ok(*enabled),
        Some(other) => Err(FlagError::EnableLoggerType {
            found: other.type_str(),
        }),
        None => Err(FlagError::EnableLoggerValue),
    }
}
