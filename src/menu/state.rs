//! Menu bar interaction state machine.
//!
//! At most one top-level menu is open. A click engages the bar, after which
//! hovering another button switches menus; selecting a leaf dispatches its id
//! and closes the bar; a pointer press outside the bar and its popovers
//! dismisses it. The outside-press listener is held only while a menu is open.

use super::model::{MenuBarModel, MenuKey};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Observable menu bar state. `Closed` is `{ open_menu: None, is_active: false }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuInteractionState {
    pub open_menu: Option<MenuKey>,
    /// The bar was engaged by a click; hover may switch menus
    pub is_active: bool,
}

/// Element a pointer press landed in, innermost first in a [`PointerPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitRegion {
    MenuBar,
    MenuButton(MenuKey),
    Popover(MenuKey),
    Submenu(String),
    /// Anything outside the menu system
    Content,
}

impl HitRegion {
    fn is_menu_region(&self) -> bool {
        !matches!(self, HitRegion::Content)
    }
}

/// Target path of a pointer press, from the hit element up to the window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerPath(Vec<HitRegion>);

impl PointerPath {
    pub fn new(regions: Vec<HitRegion>) -> Self {
        Self(regions)
    }

    /// A press on the application content.
    pub fn content() -> Self {
        Self(vec![HitRegion::Content])
    }

    /// Whether the press landed inside the bar, a popover or a nested submenu.
    pub fn is_within_menu(&self) -> bool {
        self.0.iter().any(HitRegion::is_menu_region)
    }
}

/// Input to [`MenuStateMachine::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Click(MenuKey),
    Hover(MenuKey),
    PointerDown(PointerPath),
    Select(String),
    SubmenuOpen(String),
}

/// Why the bar closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Toggled,
    OutsidePress,
    Selected,
    Teardown,
}

/// Result of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Opened(MenuKey),
    Switched { from: MenuKey, to: MenuKey },
    Closed(CloseReason),
    SubmenuOpened { menu: MenuKey, id: String },
    /// The event did not change state
    Ignored,
}

/// Receives selected leaf ids.
pub trait ActionHandler {
    fn on_menu_action(&mut self, item_id: &str) -> anyhow::Result<()>;
}

impl<F> ActionHandler for F
where
    F: FnMut(&str) -> anyhow::Result<()>,
{
    fn on_menu_action(&mut self, item_id: &str) -> anyhow::Result<()> {
        self(item_id)
    }
}

/// Handle of a registered pointer listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Source of pointer-pressed events.
pub trait PointerSource: Send + Sync {
    fn add_listener(&self) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// In-process pointer source that tracks its listeners.
#[derive(Debug, Default)]
pub struct PointerListeners {
    active: Mutex<HashSet<ListenerId>>,
    next_id: AtomicU64,
}

impl PointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }
}

impl PointerSource for PointerListeners {
    fn add_listener(&self) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.active.lock().insert(id);
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.active.lock().remove(&id);
    }
}

/// Outside-press subscription, released on drop.
pub struct ListenerGuard {
    source: Arc<dyn PointerSource>,
    id: ListenerId,
}

impl ListenerGuard {
    pub fn acquire(source: &Arc<dyn PointerSource>) -> Self {
        let id = source.add_listener();
        log::trace!("Acquired outside-press listener {:?}", id);
        Self {
            source: Arc::clone(source),
            id,
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.source.remove_listener(self.id);
        log::trace!("Released outside-press listener {:?}", self.id);
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ListenerGuard").field(&self.id).finish()
    }
}

/// Owner of [`MenuInteractionState`].
pub struct MenuStateMachine<H> {
    model: Arc<MenuBarModel>,
    state: MenuInteractionState,
    /// Nested popovers currently open, outermost first
    open_submenus: Vec<String>,
    handler: H,
    pointer: Arc<dyn PointerSource>,
    listener: Option<ListenerGuard>,
}

impl<H> std::fmt::Debug for MenuStateMachine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuStateMachine")
            .field("state", &self.state)
            .field("open_submenus", &self.open_submenus)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

impl<H: ActionHandler> MenuStateMachine<H> {
    pub fn new(model: Arc<MenuBarModel>, handler: H, pointer: Arc<dyn PointerSource>) -> Self {
        Self {
            model,
            state: MenuInteractionState::default(),
            open_submenus: Vec::new(),
            handler,
            pointer,
            listener: None,
        }
    }

    pub fn state(&self) -> MenuInteractionState {
        self.state
    }

    pub fn model(&self) -> &MenuBarModel {
        &self.model
    }

    pub fn open_submenus(&self) -> &[String] {
        &self.open_submenus
    }

    /// Whether the outside-press listener is held.
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    pub fn handle(&mut self, event: MenuEvent) -> Transition {
        let transition = match event {
            MenuEvent::Click(key) => self.on_click(key),
            MenuEvent::Hover(key) => self.on_hover(key),
            MenuEvent::PointerDown(path) => self.on_pointer_down(&path),
            MenuEvent::Select(id) => self.on_select(&id),
            MenuEvent::SubmenuOpen(id) => self.on_submenu(id),
        };
        if transition != Transition::Ignored {
            log::debug!("Menu transition: {:?} -> {:?}", transition, self.state);
        }
        transition
    }

    /// Close without dispatch and release the listener.
    pub fn teardown(&mut self) {
        if self.state.open_menu.is_some() {
            self.close(CloseReason::Teardown);
        }
        self.listener = None;
    }

    fn on_click(&mut self, key: MenuKey) -> Transition {
        match self.state.open_menu {
            None => self.open(key),
            Some(open) if open == key => self.close(CloseReason::Toggled),
            Some(open) => self.switch(open, key),
        }
    }

    fn on_hover(&mut self, key: MenuKey) -> Transition {
        match self.state.open_menu {
            Some(open) if open != key && self.state.is_active => self.switch(open, key),
            _ => Transition::Ignored,
        }
    }

    fn on_pointer_down(&mut self, path: &PointerPath) -> Transition {
        if self.state.open_menu.is_none() || path.is_within_menu() {
            return Transition::Ignored;
        }
        self.close(CloseReason::OutsidePress)
    }

    fn on_select(&mut self, id: &str) -> Transition {
        let Some(open) = self.state.open_menu else {
            log::debug!("Ignoring selection of {} while the menu bar is closed", id);
            return Transition::Ignored;
        };
        let owned = self
            .model
            .menu(open)
            .is_some_and(|menu| menu.tree.find_leaf(id).is_some());
        if !owned {
            log::warn!("Ignoring selection of {}: not an item of the {} menu", id, open);
            return Transition::Ignored;
        }

        log::debug!("Menu item selected: {}", id);
        if let Err(e) = self.handler.on_menu_action(id) {
            log::error!("Menu action {} failed: {:#}", id, e);
        }
        self.close(CloseReason::Selected)
    }

    fn on_submenu(&mut self, id: String) -> Transition {
        let Some(open) = self.state.open_menu else {
            return Transition::Ignored;
        };
        let exists = self
            .model
            .menu(open)
            .is_some_and(|menu| menu.tree.find_submenu(&id).is_some());
        if !exists {
            log::warn!("No submenu {} in the {} menu", id, open);
            return Transition::Ignored;
        }
        if !self.open_submenus.contains(&id) {
            self.open_submenus.push(id.clone());
        }
        Transition::SubmenuOpened { menu: open, id }
    }

    fn open(&mut self, key: MenuKey) -> Transition {
        self.state = MenuInteractionState {
            open_menu: Some(key),
            is_active: true,
        };
        if self.listener.is_none() {
            self.listener = Some(ListenerGuard::acquire(&self.pointer));
        }
        Transition::Opened(key)
    }

    fn switch(&mut self, from: MenuKey, to: MenuKey) -> Transition {
        self.state.open_menu = Some(to);
        self.open_submenus.clear();
        Transition::Switched { from, to }
    }

    fn close(&mut self, reason: CloseReason) -> Transition {
        self.state = MenuInteractionState::default();
        self.open_submenus.clear();
        self.listener = None;
        Transition::Closed(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    type Selections = Arc<Mutex<Vec<String>>>;

    fn machine() -> (
        MenuStateMachine<impl ActionHandler>,
        Selections,
        Arc<PointerListeners>,
    ) {
        let selections: Selections = Arc::default();
        let sink = Arc::clone(&selections);
        let listeners = Arc::new(PointerListeners::new());
        let pointer: Arc<dyn PointerSource> = listeners.clone();
        let menu = MenuStateMachine::new(
            Arc::new(MenuBarModel::default_menu_bar()),
            move |id: &str| -> anyhow::Result<()> {
                sink.lock().push(id.to_string());
                Ok(())
            },
            pointer,
        );
        (menu, selections, listeners)
    }

    fn open(key: MenuKey) -> MenuInteractionState {
        MenuInteractionState {
            open_menu: Some(key),
            is_active: true,
        }
    }

    #[test]
    fn test_click_opens_and_toggles_off() {
        let (mut menu, _, listeners) = machine();

        assert_eq!(
            menu.handle(MenuEvent::Click(MenuKey::File)),
            Transition::Opened(MenuKey::File)
        );
        assert_eq!(menu.state(), open(MenuKey::File));
        assert_eq!(listeners.active_count(), 1);

        assert_eq!(
            menu.handle(MenuEvent::Click(MenuKey::File)),
            Transition::Closed(CloseReason::Toggled)
        );
        assert_eq!(menu.state(), MenuInteractionState::default());
        assert_eq!(listeners.active_count(), 0);
    }

    #[test]
    fn test_click_other_switches_exclusively() {
        let (mut menu, _, listeners) = machine();
        menu.handle(MenuEvent::Click(MenuKey::File));

        assert_eq!(
            menu.handle(MenuEvent::Click(MenuKey::Edit)),
            Transition::Switched {
                from: MenuKey::File,
                to: MenuKey::Edit
            }
        );
        assert_eq!(menu.state(), open(MenuKey::Edit));
        // The listener survives the switch
        assert_eq!(listeners.active_count(), 1);
    }

    #[test]
    fn test_hover_ignored_while_closed() {
        let (mut menu, _, _) = machine();
        assert_eq!(menu.handle(MenuEvent::Hover(MenuKey::Edit)), Transition::Ignored);
        assert_eq!(menu.state(), MenuInteractionState::default());
    }

    #[test]
    fn test_hover_switches_while_active() {
        let (mut menu, _, _) = machine();
        menu.handle(MenuEvent::Click(MenuKey::File));
        menu.handle(MenuEvent::Hover(MenuKey::Edit));
        assert_eq!(menu.state(), open(MenuKey::Edit));

        // Hovering the open menu changes nothing
        assert_eq!(menu.handle(MenuEvent::Hover(MenuKey::Edit)), Transition::Ignored);
    }

    #[test]
    fn test_outside_press_closes() {
        let (mut menu, _, listeners) = machine();
        menu.handle(MenuEvent::Click(MenuKey::Help));

        assert_eq!(
            menu.handle(MenuEvent::PointerDown(PointerPath::content())),
            Transition::Closed(CloseReason::OutsidePress)
        );
        assert_eq!(menu.state(), MenuInteractionState::default());
        assert_eq!(listeners.active_count(), 0);
    }

    #[test]
    fn test_press_inside_menu_regions_keeps_open() {
        let (mut menu, _, _) = machine();
        menu.handle(MenuEvent::Click(MenuKey::File));

        for path in [
            PointerPath::new(vec![HitRegion::MenuBar]),
            PointerPath::new(vec![HitRegion::MenuButton(MenuKey::Edit), HitRegion::MenuBar]),
            PointerPath::new(vec![HitRegion::Popover(MenuKey::File)]),
            PointerPath::new(vec![
                HitRegion::Submenu("saveAs".to_string()),
                HitRegion::Popover(MenuKey::File),
            ]),
        ] {
            assert_eq!(menu.handle(MenuEvent::PointerDown(path)), Transition::Ignored);
        }
        assert_eq!(menu.state(), open(MenuKey::File));
    }

    #[test]
    fn test_select_dispatches_once_and_closes() {
        let (mut menu, selections, listeners) = machine();
        menu.handle(MenuEvent::Click(MenuKey::File));

        assert_eq!(
            menu.handle(MenuEvent::Select("save".to_string())),
            Transition::Closed(CloseReason::Selected)
        );
        assert_eq!(*selections.lock(), vec!["save".to_string()]);
        assert_eq!(menu.state(), MenuInteractionState::default());
        assert_eq!(listeners.active_count(), 0);
    }

    #[test]
    fn test_select_closes_even_when_handler_fails() {
        let listeners: Arc<dyn PointerSource> = Arc::new(PointerListeners::new());
        let mut menu = MenuStateMachine::new(
            Arc::new(MenuBarModel::default_menu_bar()),
            |id: &str| -> anyhow::Result<()> { bail!("no handler for {}", id) },
            listeners,
        );
        menu.handle(MenuEvent::Click(MenuKey::Edit));

        assert_eq!(
            menu.handle(MenuEvent::Select("undo".to_string())),
            Transition::Closed(CloseReason::Selected)
        );
        assert!(!menu.is_listening());
    }

    #[test]
    fn test_select_of_foreign_item_is_ignored() {
        let (mut menu, selections, _) = machine();
        menu.handle(MenuEvent::Click(MenuKey::Help));
        assert_eq!(
            menu.handle(MenuEvent::Select("save".to_string())),
            Transition::Ignored
        );
        assert!(selections.lock().is_empty());
        assert_eq!(menu.state(), open(MenuKey::Help));
    }

    #[test]
    fn test_submenu_keeps_top_level_state() {
        let (mut menu, selections, _) = machine();
        menu.handle(MenuEvent::Click(MenuKey::File));

        assert_eq!(
            menu.handle(MenuEvent::SubmenuOpen("saveAs".to_string())),
            Transition::SubmenuOpened {
                menu: MenuKey::File,
                id: "saveAs".to_string()
            }
        );
        assert_eq!(menu.state(), open(MenuKey::File));
        assert_eq!(menu.open_submenus(), ["saveAs".to_string()]);

        menu.handle(MenuEvent::Select("saveAsSQL".to_string()));
        assert_eq!(*selections.lock(), vec!["saveAsSQL".to_string()]);
        assert!(menu.open_submenus().is_empty());
    }

    #[test]
    fn test_teardown_releases_listener() {
        let (mut menu, selections, listeners) = machine();
        menu.handle(MenuEvent::Click(MenuKey::View));
        menu.teardown();

        assert_eq!(menu.state(), MenuInteractionState::default());
        assert_eq!(listeners.active_count(), 0);
        assert!(selections.lock().is_empty());
    }

    #[test]
    fn test_drop_releases_listener() {
        let (mut menu, _, listeners) = machine();
        menu.handle(MenuEvent::Click(MenuKey::View));
        drop(menu);
        assert_eq!(listeners.active_count(), 0);
    }
}
