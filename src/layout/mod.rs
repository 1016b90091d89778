//! Pane layout coordination: the panel surface, the debounced writer and the
//! controller tying them to the layout store.

mod controller;
mod debounce;
mod panels;

pub use controller::LayoutController;
pub use debounce::{Debouncer, PendingSave};
pub use panels::{PaneArena, PaneHandle, PanelSurface};
