//! Typed error variants for the baseshell-config crate.
//!
//! Provides structured error types for store I/O, layout validation and
//! settings parsing. Callers that only want to log can rely on `Display`;
//! callers that recover (the layout controller falls back to defaults) can
//! match on the variant.

use thiserror::Error;

/// Errors that can occur when reading, writing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored JSON could not be parsed or did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The settings file contained invalid YAML.
    #[error("YAML parse error in settings: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A value failed semantic validation.
    ///
    /// The inner string describes which value is invalid and why.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required key is absent from the store.
    #[error("no value stored under '{0}'")]
    Missing(String),
}

/// Failure reading a persisted layout (absent, unparsable or out of shape).
pub type LayoutLoadError = ConfigError;

/// Failure writing the layout to the store.
pub type LayoutSaveError = ConfigError;

impl ConfigError {
    /// Shorthand for building a [`ConfigError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        ConfigError::Validation(msg.into())
    }
}
