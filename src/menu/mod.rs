//! Application menu bar for baseshell
//!
//! - `model`: the static File / Edit / View / Help menu trees
//! - `state`: the click / hover / dismiss state machine
//! - `render`: recursive rendering of a menu tree
//! - `actions`: mapping of leaf ids to application actions

mod actions;
mod model;
mod render;
mod state;

pub use actions::MenuAction;
pub use model::{MenuBarModel, MenuKey, MenuLeaf, MenuNode, MenuTree, TopLevelMenu};
pub use render::{MenuRenderer, TextMenuRenderer, render_tree};
pub use state::{
    ActionHandler, CloseReason, HitRegion, ListenerGuard, ListenerId, MenuEvent,
    MenuInteractionState, MenuStateMachine, PointerListeners, PointerPath, PointerSource,
    Transition,
};
