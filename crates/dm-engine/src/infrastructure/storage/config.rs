//! INI-based configuration persistence for the engine.
//!
//! The file is a plain sectioned INI document with unquoted values, the same
//! shape Python's `configparser` reads and writes:
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
//! `rust-ini` handles the syntax.  The key set, defaults and `enable`/`disable`
//! handling stay in the serde schema from `dm-core`: a parsed document is
//! lifted into a table of strings and deserialized into [`GameConfig`], and
//! writing goes the other way.  Surrounding quotes are stripped on load, so
//! files written with quoted values (`log_file = "engine"`) load too.
//!
//! [`ConfigStore::bootstrap`] guarantees that the configuration file and its
//! parent directory exist.  The decision between seeding and parsing is made
//! once, from the file size at bootstrap time:
//!
//! - **empty** (just created, or created earlier but never written): the
//!   default [`GameConfig`] is written and returned;
//! - **non-empty**: the file is parsed and returned, and is never rewritten.
//!
//! Any file-system failure is returned as [`ConfigError::Io`]; callers treat
//! it as fatal.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use dm_core::{EngineConfig, GameConfig};
use ini::{EscapePolicy, Ini, ParseOption, WriteOption};
use thiserror::Error;
use toml::{Table, Value};
use tracing::{debug, info};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration path was an empty string.
    #[error("configuration path must not be empty")]
    EmptyPath,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The INI syntax could not be parsed.
    #[error("failed to parse config INI: {0}")]
    Parse(#[from] ini::ParseError),

    /// The document parsed but does not fit the config schema.
    #[error("config does not match the expected schema: {0}")]
    Schema(#[from] toml::de::Error),

    /// The config could not be converted for writing.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Which branch [`ConfigStore::bootstrap`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The file was empty and has been seeded with defaults.
    Seeded,
    /// The file already had content and was parsed.
    Loaded,
}

/// Owner of one configuration file path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store for `path`.  No file-system access happens here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPath`] if `path` is empty.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        Ok(Self { path })
    }

    /// The path this store manages.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensures the directory and file exist, then seeds or loads the config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] for directory/file creation, read or write failures,
    /// [`ConfigError::Parse`] / [`ConfigError::Schema`] if an existing file
    /// cannot be read as the config schema.
    pub fn bootstrap(&self) -> Result<(GameConfig, BootstrapOutcome), ConfigError> {
        self.ensure_file()?;

        let len = std::fs::metadata(&self.path)
            .map_err(|source| self.io_error(source))?
            .len();

        if len == 0 {
            let config = GameConfig::default();
            save_config(&self.path, &config)?;
            info!("seeded default configuration at {}", self.path.display());
            Ok((config, BootstrapOutcome::Seeded))
        } else {
            let config = load_config(&self.path)?;
            debug!("loaded configuration from {} ({len} bytes)", self.path.display());
            Ok((config, BootstrapOutcome::Loaded))
        }
    }

    /// Runs [`bootstrap`](Self::bootstrap) and derives the runtime settings
    /// from the `[logger]` section.
    ///
    /// # Errors
    ///
    /// Same as [`bootstrap`](Self::bootstrap).
    pub fn bootstrap_engine_config(&self) -> Result<(EngineConfig, BootstrapOutcome), ConfigError> {
        let (config, outcome) = self.bootstrap()?;
        Ok((EngineConfig::from_logger_section(&config.logger), outcome))
    }

    /// Creates the parent directory and an empty file if either is missing.
    /// An existing file is opened without truncation.
    fn ensure_file(&self) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Parses INI text into the config schema.
///
/// Keys outside any section are ignored.  Backslashes are taken literally.
///
/// # Errors
///
/// [`ConfigError::Parse`] for malformed INI, [`ConfigError::Schema`] if the
/// sections do not fit [`GameConfig`].
pub fn parse_config(text: &str) -> Result<GameConfig, ConfigError> {
    let options = ParseOption {
        enabled_quote: true,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let document = Ini::load_from_str_opt(text, options)?;

    let mut sections = Table::new();
    for (name, properties) in document.iter() {
        let Some(name) = name else { continue };
        if !sections.contains_key(name) {
            sections.insert(name.to_string(), Value::Table(Table::new()));
        }
        if let Some(Value::Table(keys)) = sections.get_mut(name) {
            for (key, value) in properties.iter() {
                keys.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }

    Ok(Value::Table(sections).try_into()?)
}

/// Lifts the config schema into an INI document.
///
/// # Errors
///
/// [`ConfigError::Serialize`] if the schema cannot be converted.
pub fn to_document(config: &GameConfig) -> Result<Ini, ConfigError> {
    let mut document = Ini::new();
    if let Value::Table(sections) = Value::try_from(config)? {
        for (name, section) in sections {
            let Value::Table(keys) = section else { continue };
            for (key, value) in keys {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                document.with_section(Some(name.as_str())).set(key, text);
            }
        }
    }
    Ok(document)
}

/// `key = value` lines, values written verbatim.
fn write_options() -> WriteOption {
    WriteOption {
        escape_policy: EscapePolicy::Nothing,
        kv_separator: " = ",
        ..WriteOption::default()
    }
}

/// Reads and parses the configuration at `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read, otherwise as
/// [`parse_config`].
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Writes `config` to `path`, replacing any existing content.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &GameConfig) -> Result<(), ConfigError> {
    let document = to_document(config)?;
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_error)?;
    document.write_to_opt(&mut file, write_options()).map_err(io_error)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
