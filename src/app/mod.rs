//! Shell coordinator for baseshell
//!
//! This module contains the single event loop that owns the interactive
//! core:
//! - `LayoutController`: pane proportions and debounced persistence
//! - `MenuStateMachine`: the menu bar
//! - `ShortcutRegistry`: global shortcuts from the settings file
//!
//! Everything reaches the shell as a [`ShellEvent`] on one channel, so state
//! is only ever touched from the loop, in arrival order.

mod commands;
mod events;

pub use commands::{ShellCommand, parse_command};
pub use events::{ReportKind, ShellEvent};

use crate::layout::{LayoutController, PaneArena};
use crate::menu::{
    ActionHandler, MenuAction, MenuBarModel, MenuStateMachine, PointerListeners, PointerSource,
    TextMenuRenderer, Transition,
};
use anyhow::{Context, Result, bail};
use baseshell_config::{KeyValueStore, PaneId, ShellConfig};
use baseshell_keybindings::{ShortcutError, ShortcutHost, ShortcutRegistry};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Text for the user
    Output(String),
    Exit,
}

/// Menu action handler that queues the action for the next loop turn.
pub struct MenuDispatcher {
    events: UnboundedSender<ShellEvent>,
}

impl ActionHandler for MenuDispatcher {
    fn on_menu_action(&mut self, item_id: &str) -> Result<()> {
        let Some(action) = MenuAction::from_id(item_id) else {
            bail!("unknown menu item '{}'", item_id);
        };
        self.events
            .send(ShellEvent::Action(action))
            .context("shell event loop is gone")
    }
}

/// The shell window's interactive core.
pub struct Shell<S, H> {
    config: ShellConfig,
    layout: LayoutController<S>,
    menu: MenuStateMachine<MenuDispatcher>,
    shortcuts: ShortcutRegistry<H>,
    pointer: Arc<PointerListeners>,
    events_tx: UnboundedSender<ShellEvent>,
    events_rx: UnboundedReceiver<ShellEvent>,
    /// Actions performed so far, in order
    performed: Vec<MenuAction>,
    mounted: bool,
    /// The stored layout is read once; remounts keep the in-memory one
    layout_loaded: bool,
}

impl<S: KeyValueStore, H: ShortcutHost> Shell<S, H> {
    pub fn new(config: ShellConfig, store: Arc<S>, host: Arc<H>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let pointer = Arc::new(PointerListeners::new());
        let pointer_source: Arc<dyn PointerSource> = pointer.clone();
        let menu = MenuStateMachine::new(
            Arc::new(MenuBarModel::default_menu_bar()),
            MenuDispatcher {
                events: events_tx.clone(),
            },
            pointer_source,
        );
        let layout = LayoutController::new(
            store,
            PaneArena::new(),
            Duration::from_millis(config.layout_debounce_ms),
        );

        Self {
            config,
            layout,
            menu,
            shortcuts: ShortcutRegistry::new(host),
            pointer,
            events_tx,
            events_rx,
            performed: Vec::new(),
            mounted: false,
            layout_loaded: false,
        }
    }

    /// Sender for events raised outside the loop (input, host callbacks).
    pub fn sender(&self) -> UnboundedSender<ShellEvent> {
        self.events_tx.clone()
    }

    pub fn layout(&self) -> &LayoutController<S> {
        &self.layout
    }

    pub fn menu(&self) -> &MenuStateMachine<MenuDispatcher> {
        &self.menu
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry<H> {
        &self.shortcuts
    }

    pub fn pointer_listeners(&self) -> &PointerListeners {
        &self.pointer
    }

    pub fn performed(&self) -> &[MenuAction] {
        &self.performed
    }

    /// Restore the layout, bind the configured shortcuts and mount panels.
    ///
    /// Only the first mount reads the store. A later mount resyncs the panels
    /// to the in-memory layout, which may be ahead of the stored one.
    pub async fn mount(&mut self) {
        if !self.layout_loaded {
            self.layout.load().await;
            self.layout_loaded = true;
        }

        for binding in &self.config.global_shortcuts {
            let events = self.events_tx.clone();
            let action = binding.action.clone();
            let handler = Arc::new(move || {
                // Host threads only enqueue; the loop dispatches
                let _ = events.send(ShellEvent::Shortcut {
                    action: action.clone(),
                });
            });
            match self.shortcuts.register(&binding.key, handler).await {
                Ok(_) => {}
                Err(e @ ShortcutError::Parse { .. }) => {
                    log::warn!("Skipping shortcut for '{}': {}", binding.action, e);
                }
                // The registry already reported host refusals
                Err(_) => {}
            }
        }

        self.layout.surface_mut().mount_all();
        self.layout.on_panels_mounted();
        self.mounted = true;
        log::info!(
            "Shell mounted with {} active global shortcut(s)",
            self.shortcuts.active_count()
        );
    }

    /// Flush the layout and release timers, listeners and shortcuts.
    pub async fn shutdown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.layout.flush().await;
        self.layout.teardown();
        self.menu.teardown();
        self.shortcuts.teardown().await;
        log::info!("Shell shut down");
    }

    /// Apply one event.
    pub fn handle_event(&mut self, event: ShellEvent) -> Result<Outcome> {
        log::trace!("Shell event: {:?}", event);
        let outcome = match event {
            ShellEvent::PanelsMounted => {
                self.layout.surface_mut().mount_all();
                self.layout.on_panels_mounted();
                Outcome::Continue
            }
            ShellEvent::PanelsUnmounted => {
                self.layout.surface_mut().unmount_all();
                self.layout.on_panels_unmounted();
                Outcome::Continue
            }
            ShellEvent::Resize { axis, sizes } => {
                self.layout.on_resize(axis, &sizes);
                Outcome::Continue
            }
            ShellEvent::ToggleCollapse(pane) => {
                if let Err(e) = self.layout.toggle_collapse(pane) {
                    log::warn!("Cannot toggle {:?} pane: {}", pane, e);
                }
                Outcome::Continue
            }
            ShellEvent::Menu(event) => match self.menu.handle(event) {
                Transition::Ignored => Outcome::Continue,
                _ => Outcome::Output(self.menu_report()),
            },
            ShellEvent::Action(action) => self.perform(action),
            ShellEvent::Shortcut { action } => match MenuAction::from_id(&action) {
                Some(action) => {
                    log::info!("Global shortcut fired: {}", action.id());
                    self.perform(action)
                }
                None => {
                    log::warn!("Global shortcut bound to unknown action '{}'", action);
                    Outcome::Continue
                }
            },
            ShellEvent::Report(ReportKind::Layout) => Outcome::Output(self.layout_report()),
            ShellEvent::Report(ReportKind::Menu) => Outcome::Output(self.menu_report()),
            ShellEvent::Exit => Outcome::Exit,
        };
        Ok(outcome)
    }

    /// Handle every event already queued, without waiting.
    pub fn process_pending(&mut self) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            let outcome = self.handle_event(event)?;
            let exit = outcome == Outcome::Exit;
            outcomes.push(outcome);
            if exit {
                break;
            }
        }
        Ok(outcomes)
    }

    /// Run the loop until `Exit`, the channel closes or `exit_after` passes,
    /// then shut down.
    pub async fn run<W: Write>(&mut self, out: &mut W, exit_after: Option<Duration>) -> Result<()> {
        let deadline = exit_after.map(|after| Instant::now() + after);

        loop {
            let next = tokio::select! {
                event = self.events_rx.recv() => event,
                _ = wait_until(deadline) => {
                    log::info!("Exit timer elapsed");
                    None
                }
            };
            let Some(event) = next else { break };

            match self.handle_event(event)? {
                Outcome::Continue => {}
                Outcome::Output(text) => {
                    writeln!(out, "{}", text).context("failed to write output")?;
                }
                Outcome::Exit => break,
            }
        }

        self.shutdown().await;
        Ok(())
    }

    fn perform(&mut self, action: MenuAction) -> Outcome {
        self.performed.push(action);
        match action {
            MenuAction::Exit => return Outcome::Exit,
            MenuAction::ResetLayout => self.layout.reset_to_default(),
            MenuAction::ToggleLeftPanel => self.toggle(PaneId::Left),
            MenuAction::ToggleRightPanel => self.toggle(PaneId::Right),
            other => log::info!("Menu action {} has no handler in this shell", other.id()),
        }
        Outcome::Output(format!("action: {}", action.id()))
    }

    fn toggle(&mut self, pane: PaneId) {
        if let Err(e) = self.layout.toggle_collapse(pane) {
            log::warn!("Cannot toggle {:?} pane: {}", pane, e);
        }
    }

    fn layout_report(&self) -> String {
        let labels = |panes: &[PaneId]| {
            panes
                .iter()
                .map(|&pane| self.layout.size_label(pane))
                .collect::<Vec<_>>()
                .join(" ")
        };
        format!(
            "H=[{}] V=[{}]",
            labels(baseshell_config::Axis::Horizontal.panes()),
            labels(baseshell_config::Axis::Vertical.panes())
        )
    }

    fn menu_report(&self) -> String {
        TextMenuRenderer::render_bar(self.menu.model(), &self.menu.state())
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
