//! On-disk configuration schema for the engine.
//!
//! The configuration file is a small sectioned INI document with unquoted
//! values:
//!
//! ```ini
//! [logger]
//! log_file = engine
//! log_dir = ./logs
//! log_to_file = disable
//! log_to_stdio = disable
//! enable_debug = disable
//!
//! [engine]
//! enable_debug = disable
//! ```
//!
//! These types only describe the schema; the INI syntax lives with the file
//! store in `dm-engine`.  Every value is a string.
//!
//! Switch-like keys hold the literal strings `"enable"` or `"disable"`; see
//! [`Toggle`].  Keys missing from a hand-edited file fall back to the values
//! above through `#[serde(default = "...")]`.
//!
//! Both `enable_debug` keys are written on first run and parsed on later runs,
//! but nothing reads them yet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal value that switches a feature on.
pub const ENABLE: &str = "enable";
/// Literal value that switches a feature off.
pub const DISABLE: &str = "disable";

// ── Toggle ────────────────────────────────────────────────────────────────────

/// A string-valued on/off switch.
///
/// Only the exact string `"enable"` counts as enabled.  Any other value is
/// treated as disabled, but is kept verbatim so re-serializing a loaded file
/// does not silently rewrite what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Toggle {
    Enable,
    #[default]
    Disable,
    /// Any unrecognised string; behaves like [`Toggle::Disable`].
    Other(String),
}

impl Toggle {
    /// Returns `true` only for [`Toggle::Enable`].
    pub fn is_enabled(&self) -> bool {
        matches!(self, Toggle::Enable)
    }

    /// The literal string stored in the file.
    pub fn as_str(&self) -> &str {
        match self {
            Toggle::Enable => ENABLE,
            Toggle::Disable => DISABLE,
            Toggle::Other(raw) => raw,
        }
    }
}

impl From<String> for Toggle {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            ENABLE => Toggle::Enable,
            DISABLE => Toggle::Disable,
            _ => Toggle::Other(raw),
        }
    }
}

impl From<Toggle> for String {
    fn from(toggle: Toggle) -> Self {
        match toggle {
            Toggle::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl From<bool> for Toggle {
    fn from(enabled: bool) -> Self {
        if enabled {
            Toggle::Enable
        } else {
            Toggle::Disable
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Schema types ──────────────────────────────────────────────────────────────

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub logger: LoggerSection,
    #[serde(default)]
    pub engine: EngineSection,
}

/// The `[logger]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggerSection {
    /// Base name of the log file; the date and `.log` are appended at activation.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Directory the log file is written to.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default)]
    pub log_to_file: Toggle,
    #[serde(default)]
    pub log_to_stdio: Toggle,
    /// Legacy switch; parsed but not consumed.
    #[serde(default)]
    pub enable_debug: Toggle,
}

/// The `[engine]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineSection {
    /// Reserved; parsed but not consumed.
    #[serde(default)]
    pub enable_debug: Toggle,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_file() -> String {
    "engine".to_string()
}
fn default_log_dir() -> String {
    "./logs".to_string()
}

impl Default for LoggerSection {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            log_dir: default_log_dir(),
            log_to_file: Toggle::Disable,
            log_to_stdio: Toggle::Disable,
            enable_debug: Toggle::Disable,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
