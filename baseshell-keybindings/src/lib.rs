//! Keybinding system for baseshell.
//!
//! Global shortcuts are configured as human-readable combo strings
//! ("CmdOrCtrl+Shift+N") and handed to an OS-level shortcut host through a
//! single process-scoped [`ShortcutRegistry`].
//!
//! Features:
//! - Case- and order-insensitive combo parsing with a canonical display form
//! - Idempotent registration that survives repeated UI mounts
//! - Release that tolerates combos which are already gone

pub mod host;
pub mod parser;
mod registry;

pub use host::{InProcessHost, ShortcutCallback, ShortcutError, ShortcutHost};
pub use parser::{KeyCombo, Modifiers, NamedKey, ParseError, ParsedKey, parse_key_combo};
pub use registry::{ShortcutBinding, ShortcutRegistry};
