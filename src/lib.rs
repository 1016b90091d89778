// Library exports for testing and potential library use
//
// The interactive core of the baseshell desktop shell. State lives on one
// event thread (see `app::Shell`); background work is limited to the
// debounced layout writer and global shortcut callbacks, which only enqueue
// events.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod cli;
pub mod debug;
pub mod layout;
pub mod menu;

pub use app::{Outcome, Shell, ShellEvent};
pub use layout::LayoutController;
pub use menu::{MenuAction, MenuStateMachine};
