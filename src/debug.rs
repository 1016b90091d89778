//! Log bridge for baseshell
//!
//! Routes every `log` record to `baseshell_debug.log` in the temp directory,
//! so diagnostics never mix with the command output on stdout. When
//! `RUST_LOG` is set, records are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` on the command line, then `RUST_LOG`, then
//! the `log_level` from the settings file (applied with [`set_log_level`]
//! after settings are loaded), then `info`.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

const LOG_FILE_NAME: &str = "baseshell_debug.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Set once the level came from the command line or `RUST_LOG`
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

static LOGGER: OnceLock<BridgeLogger> = OnceLock::new();

struct BridgeLogger {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl BridgeLogger {
    fn write_line(&self, line: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_stderr {
            eprint!("{}", line);
        }
    }
}

impl log::Log for BridgeLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&format_line(record.level(), record.target(), record.args()));
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn format_line(level: log::Level, target: &str, args: &std::fmt::Arguments<'_>) -> String {
    format!(
        "[{}] [{:<5}] [{}] {}\n",
        Local::now().format(TIMESTAMP_FORMAT),
        level,
        target,
        args
    )
}

fn rust_log_level() -> Option<log::LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Only the global level of an env_logger style filter is honoured
    value
        .split(',')
        .find(|part| !part.contains('='))
        .and_then(|level| level.trim().parse().ok())
}

/// Install the bridge as the global logger.
///
/// `cli_level` wins over `RUST_LOG`; either one pins the level so a later
/// [`set_log_level`] from the settings file is ignored. Calling this twice
/// keeps the first logger.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let env_level = rust_log_level();
    let mirror_stderr = std::env::var_os("RUST_LOG").is_some();

    let level = match (cli_level, env_level) {
        (Some(level), _) | (None, Some(level)) => {
            LEVEL_PINNED.store(true, Ordering::SeqCst);
            level
        }
        (None, None) => log::LevelFilter::Info,
    };

    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(log_path())
        .ok();

    let logger = LOGGER.get_or_init(|| BridgeLogger {
        file: Mutex::new(file),
        mirror_stderr,
    });
    logger.write_line(&format!(
        "{}\nbaseshell session started at {} (level={})\n{}\n",
        "=".repeat(80),
        Local::now().format(TIMESTAMP_FORMAT),
        level,
        "=".repeat(80)
    ));

    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

/// Apply the level from the settings file unless the command line or
/// `RUST_LOG` already chose one.
pub fn set_log_level(level: log::LevelFilter) {
    if LEVEL_PINNED.load(Ordering::SeqCst) {
        log::debug!("Keeping pinned log level, ignoring settings level {}", level);
        return;
    }
    log::set_max_level(level);
}
