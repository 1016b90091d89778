//! Command-line interface for baseshell.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// baseshell - headless driver for the desktop shell core
///
/// Reads one command per line from stdin: `resize h 20 60 20`, `click file`,
/// `hover edit`, `outside`, `select save`, `submenu saveAs`,
/// `shortcut CmdOrCtrl+Shift+N`, `collapse left`, `reset`, `layout`, `menu`,
/// `quit`.
#[derive(Debug, Parser)]
#[command(name = "baseshell")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (default: <config dir>/baseshell/settings.yaml)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Key-value store file (overrides `store_file` from settings)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Set log level (overrides settings and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Exit after the specified number of seconds
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = parse_seconds,
        allow_negative_numbers = true
    )]
    pub exit_after: Option<f64>,
}

/// Accept a non-negative, finite number of seconds that fits a `Duration`.
fn parse_seconds(s: &str) -> Result<f64, String> {
    let seconds: f64 = s.parse().map_err(|e| format!("invalid number '{}': {}", s, e))?;
    Duration::try_from_secs_f64(seconds)
        .map(|_| seconds)
        .map_err(|e| format!("invalid duration '{}': {}", s, e))
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the shell
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub settings_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
    /// Exit after this many seconds
    pub exit_after: Option<f64>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            settings_path: cli.settings,
            store_path: cli.store,
            log_level: cli.log_level.map(LogLevelArg::to_level_filter),
            exit_after: cli.exit_after,
        }
    }
}

/// Parse process arguments.
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
