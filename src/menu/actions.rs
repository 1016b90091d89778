//! Menu action definitions for baseshell
//!
//! This module defines the `MenuAction` enum that represents every action a
//! menu leaf or a global shortcut can trigger.

/// Actions that can be triggered from the menu bar or a global shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    // File menu
    /// Start a new project
    NewProject,
    /// Open an existing project
    OpenProject,
    /// Save the current project
    Save,
    /// Export the project as SQL
    SaveAsSql,
    /// Export the project as VGS
    SaveAsVgs,
    /// Leave the shell
    Exit,

    // Edit menu
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,

    // View menu
    /// Restore the default pane proportions
    ResetLayout,
    /// Collapse or expand the left sidebar
    ToggleLeftPanel,
    /// Collapse or expand the right sidebar
    ToggleRightPanel,

    // Help menu
    /// Open the documentation
    ShowDocs,
    /// Show version information
    About,
}

impl MenuAction {
    pub const ALL: [MenuAction; 16] = [
        MenuAction::NewProject,
        MenuAction::OpenProject,
        MenuAction::Save,
        MenuAction::SaveAsSql,
        MenuAction::SaveAsVgs,
        MenuAction::Exit,
        MenuAction::Undo,
        MenuAction::Redo,
        MenuAction::Cut,
        MenuAction::Copy,
        MenuAction::Paste,
        MenuAction::ResetLayout,
        MenuAction::ToggleLeftPanel,
        MenuAction::ToggleRightPanel,
        MenuAction::ShowDocs,
        MenuAction::About,
    ];

    /// Menu leaf id of this action.
    pub fn id(self) -> &'static str {
        match self {
            MenuAction::NewProject => "new",
            MenuAction::OpenProject => "open",
            MenuAction::Save => "save",
            MenuAction::SaveAsSql => "saveAsSQL",
            MenuAction::SaveAsVgs => "saveAsVGS",
            MenuAction::Exit => "exit",
            MenuAction::Undo => "undo",
            MenuAction::Redo => "redo",
            MenuAction::Cut => "cut",
            MenuAction::Copy => "copy",
            MenuAction::Paste => "paste",
            MenuAction::ResetLayout => "resetLayout",
            MenuAction::ToggleLeftPanel => "toggleLeftPanel",
            MenuAction::ToggleRightPanel => "toggleRightPanel",
            MenuAction::ShowDocs => "docs",
            MenuAction::About => "about",
        }
    }

    /// Action for a menu leaf id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }
}
