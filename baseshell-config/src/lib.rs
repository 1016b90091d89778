//! Configuration and persistence for the baseshell desktop shell.
//!
//! This crate provides:
//!
//! - Pane layout proportions, pane constraints and their validation
//! - The asynchronous key-value store collaborator and two implementations
//! - Layout persistence on top of the key-value store
//! - The YAML settings file

pub mod error;
pub mod layout;
pub mod layout_store;
pub mod settings;
pub mod store;

pub use error::{ConfigError, LayoutLoadError, LayoutSaveError};
pub use layout::{
    Axis, COLLAPSE_TOLERANCE, DEFAULT_DEBOUNCE_MS, LayoutConfig, PaneId, PaneSpec, SUM_TOLERANCE, TOTAL_PERCENT,
    validate_axis,
};
pub use layout_store::LayoutStore;
pub use settings::{KeyBinding, LogLevel, ShellConfig};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
