//! Events processed by the shell loop.

use crate::menu::{MenuAction, MenuEvent};
use baseshell_config::{Axis, PaneId};

/// What a `Report` event prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Current pane percentages
    Layout,
    /// Menu bar and the open popover
    Menu,
}

/// One unit of work for the shell loop, delivered in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// The panel surface finished mounting
    PanelsMounted,
    /// The panel surface went away (window hidden, hot reload)
    PanelsUnmounted,
    /// A resize handle moved
    Resize { axis: Axis, sizes: Vec<f32> },
    /// Collapse or expand a sidebar from its handle
    ToggleCollapse(PaneId),
    /// Pointer or selection input for the menu bar
    Menu(MenuEvent),
    /// A dispatched menu selection
    Action(MenuAction),
    /// A global shortcut fired; `action` is a menu item id
    Shortcut { action: String },
    Report(ReportKind),
    Exit,
}
