//! Application settings file.
//!
//! Settings are read from `<config_dir>/baseshell/settings.yaml`. Every field
//! has a default, so a partial file (or no file at all) yields a usable
//! configuration.

use crate::error::ConfigError;
use crate::layout::DEFAULT_DEBOUNCE_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory.
pub const APP_DIR_NAME: &str = "baseshell";

/// File name of the key-value store holding layout and project state.
pub const STORE_FILE_NAME: &str = "baseshell.config";

/// File name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// A global shortcut entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Key combination string, e.g., "CmdOrCtrl+Shift+N"
    pub key: String,
    /// Menu item id dispatched when the combination fires, e.g., "new"
    pub action: String,
}

/// Log verbosity selectable in settings and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Shell settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Quiet period before layout changes are persisted, in milliseconds
    pub layout_debounce_ms: u64,
    /// Override for the key-value store location
    pub store_file: Option<PathBuf>,
    /// Global shortcuts registered while the shell is mounted
    pub global_shortcuts: Vec<KeyBinding>,
    /// Log verbosity
    pub log_level: LogLevel,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            layout_debounce_ms: DEFAULT_DEBOUNCE_MS,
            store_file: None,
            global_shortcuts: default_global_shortcuts(),
            log_level: LogLevel::default(),
        }
    }
}

/// Shortcuts bound when the settings file does not list any.
pub fn default_global_shortcuts() -> Vec<KeyBinding> {
    vec![KeyBinding {
        key: "CmdOrCtrl+Shift+N".to_string(),
        action: "new".to_string(),
    }]
}

impl ShellConfig {
    /// Directory holding the settings and store files.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    /// Default settings file path.
    pub fn settings_path() -> PathBuf {
        Self::config_dir().join(SETTINGS_FILE_NAME)
    }

    /// Store file in effect: the configured override or the default location.
    pub fn store_path(&self) -> PathBuf {
        self.store_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join(STORE_FILE_NAME))
    }

    /// Load settings from `path`, writing defaults there if it does not exist.
    ///
    /// A missing file is not an error. Failing to write the default file is
    /// logged and the defaults are still returned.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Settings path: {:?}", path);

        if !path.exists() {
            log::info!("Settings file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default settings: {}", e);
            }
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: ShellConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save settings to `path` atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.layout_debounce_ms == 0 {
            return Err(ConfigError::validation(
                "layout_debounce_ms must be greater than zero",
            ));
        }
        if let Some(binding) = self
            .global_shortcuts
            .iter()
            .find(|b| b.key.trim().is_empty() || b.action.trim().is_empty())
        {
            return Err(ConfigError::validation(format!(
                "global shortcut entry {:?} needs both a key and an action",
                binding
            )));
        }
        Ok(())
    }
}
