//! dm engine entry point.
//!
//! # Usage
//!
//! ```text
//! dm [OPTIONS]
//!
//! Options:
//!   -c, --gameconf <PATH>  Game configuration file [default: <cwd>/config/game.ini]
//!   -b, --build-mode       Debug build mode: forces the engine logger on
//! ```
//!
//! # Startup
//!
//! 1. CLI arguments are parsed with `clap`.
//! 2. A bootstrap stderr subscriber (filtered by `RUST_LOG`, default `warn`)
//!    is active while the engine is constructed.
//! 3. Invalid construction input is printed and the process exits normally.
//! 4. The engine logger, if enabled, becomes the global subscriber; otherwise
//!    the bootstrap subscriber does.
//! 5. The run loop waits for Ctrl-C and asks for confirmation.  A confirmed
//!    exit prints `Engine exiting` and ends the process with status 1.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use dm_engine::{Engine, EngineOptions};

/// Status reported after a confirmed shutdown.
const EXIT_STATUS_CONFIRMED: i32 = 1;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Text-based game engine runtime.
#[derive(Debug, Parser)]
#[command(name = "dm", about = "Bootstraps and runs the dm engine", version)]
struct Cli {
    /// Path to the game configuration file.
    ///
    /// Created (with its directory) and seeded with defaults when missing or
    /// empty.
    #[arg(short = 'c', long, env = "DM_GAMECONF")]
    gameconf: Option<PathBuf>,

    /// Build (debug) mode.  Enables the engine logger.
    #[arg(short = 'b', long)]
    build_mode: bool,
}

impl Cli {
    /// Converts the parsed CLI arguments into [`EngineOptions`].
    ///
    /// # Errors
    ///
    /// Returns an error if no path was given and the current directory
    /// cannot be determined.
    fn into_engine_options(self) -> anyhow::Result<EngineOptions> {
        let gameconf = match self.gameconf {
            Some(path) => path,
            None => default_gameconf()?,
        };
        Ok(EngineOptions {
            gameconf: Some(gameconf),
            enable_logger: Some(toml::Value::Boolean(self.build_mode)),
        })
    }
}

/// `<cwd>/config/game.ini`
fn default_gameconf() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("could not determine the current directory")?;
    Ok(cwd.join("config").join("game.ini"))
}

fn bootstrap_dispatch() -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    Dispatch::new(subscriber)
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let options = cli.into_engine_options()?;

    let bootstrap = bootstrap_dispatch();
    let constructed = tracing::dispatcher::with_default(&bootstrap, || Engine::from_options(options));

    let mut engine = match constructed {
        Ok(engine) => engine,
        Err(e) if e.is_validation() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e).context("engine bootstrap failed"),
    };

    match engine.logger() {
        Some(logger) => logger.install_global()?,
        None => tracing::dispatcher::set_global_default(bootstrap)
            .context("failed to install the bootstrap logger")?,
    }

    engine.run_until_exit().await?;

    eprintln!("Engine exiting");
    std::process::exit(EXIT_STATUS_CONFIRMED);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_release_mode() {
        let cli = Cli::parse_from(["dm"]);
        assert!(!cli.build_mode);
        if std::env::var_os("DM_GAMECONF").is_none() {
            assert!(cli.gameconf.is_none());
        }
    }

    #[test]
    fn test_cli_gameconf_override() {
        let cli = Cli::parse_from(["dm", "--gameconf", "/srv/dm/game.ini"]);
        assert_eq!(cli.gameconf, Some(PathBuf::from("/srv/dm/game.ini")));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["dm", "-c", "campaign.ini", "-b"]);
        assert_eq!(cli.gameconf, Some(PathBuf::from("campaign.ini")));
        assert!(cli.build_mode);
    }

    #[test]
    fn test_into_engine_options_defaults_to_cwd_config_game_ini() {
        // Arrange
        let cli = Cli {
            gameconf: None,
            build_mode: false,
        };

        // Act
        let options = cli.into_engine_options().unwrap();

        // Assert
        let path = options.gameconf.expect("path resolved");
        assert!(path.is_absolute());
        assert!(path.ends_with("config/game.ini"));
        assert_eq!(options.enable_logger, Some(toml::Value::Boolean(false)));
    }

    #[test]
    fn test_invalid_flag_is_reported_with_its_own_message() {
        let err = Engine::from_options(EngineOptions {
            gameconf: None,
            enable_logger: Some(toml::Value::Integer(1)),
        })
        .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Enable-Logger-Type error"));
    }

    #[test]
    fn test_build_mode_forces_logger_on() {
        let cli = Cli {
            gameconf: Some(PathBuf::from("game.ini")),
            build_mode: true,
        };

        let options = cli.into_engine_options().unwrap();

        assert_eq!(options.gameconf, Some(PathBuf::from("game.ini")));
        assert_eq!(options.enable_logger, Some(toml::Value::Boolean(true)));
    }
}
