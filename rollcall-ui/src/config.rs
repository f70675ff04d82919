//! Service configuration with layered resolution
//!
//! Each field resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `rollcall.toml` in the working directory
//! 4. Compiled default (fallback)

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use tracing::warn;

use rollcall_core::engine::DEFAULT_LOCK_WAIT;

/// Default service port
pub const DEFAULT_PORT: u16 = 31009;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "rollcall-ui", about = "QR code attendance check-in service")]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "ROLLCALL_PORT")]
    pub port: Option<u16>,

    /// Roster source file (CSV with identifier and name columns)
    #[arg(long, env = "ROLLCALL_ROSTER")]
    pub roster: Option<PathBuf>,

    /// Durable record table file
    #[arg(long, env = "ROLLCALL_TABLE")]
    pub table: Option<PathBuf>,

    /// Do not open the operator page in a browser on startup
    #[arg(long, env = "ROLLCALL_NO_BROWSER")]
    pub no_browser: bool,

    /// Bound on waiting for the record lock, in milliseconds
    #[arg(long, env = "ROLLCALL_LOCK_WAIT_MS")]
    pub lock_wait_ms: Option<u64>,

    /// Configuration file
    #[arg(long, default_value = "rollcall.toml")]
    pub config: PathBuf,
}

/// Optional file-based configuration
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    roster: Option<PathBuf>,
    table: Option<PathBuf>,
    open_browser: Option<bool>,
    lock_wait_ms: Option<u64>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub roster: PathBuf,
    pub table: PathBuf,
    pub open_browser: bool,
    pub lock_wait: Duration,
}

impl Config {
    /// Resolve the configuration from CLI arguments (which clap has already
    /// merged with environment variables), the config file, and defaults.
    pub fn resolve(cli: Cli) -> Config {
        let file = load_file_config(&cli.config);

        Config {
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            roster: cli
                .roster
                .or(file.roster)
                .unwrap_or_else(|| PathBuf::from("input.csv")),
            table: cli
                .table
                .or(file.table)
                .unwrap_or_else(|| PathBuf::from("output.csv")),
            open_browser: if cli.no_browser {
                false
            } else {
                file.open_browser.unwrap_or(true)
            },
            lock_wait: cli
                .lock_wait_ms
                .or(file.lock_wait_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_LOCK_WAIT),
        }
    }
}

fn load_file_config(path: &Path) -> FileConfig {
    if !path.exists() {
        return FileConfig::default();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|contents| toml::from_str(&contents).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            FileConfig::default()
        }
    }
}
