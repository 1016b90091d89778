//! Layout controller.
//!
//! Owns the in-memory pane proportions for the shell window. Resize events
//! replace an axis, resync the panel surface and schedule a debounced write;
//! startup restores the stored layout or falls back to the default.

use super::debounce::Debouncer;
use super::panels::{PaneArena, PanelSurface};
use baseshell_config::{Axis, ConfigError, KeyValueStore, LayoutConfig, LayoutStore, PaneId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Authoritative owner of the pane layout.
pub struct LayoutController<S, P = PaneArena> {
    layout: LayoutConfig,
    store: LayoutStore<S>,
    surface: P,
    debouncer: Debouncer,
    /// Set when sizes could not be applied because panels were not mounted
    apply_pending: bool,
    /// Last expanded size of each collapsible pane
    expanded_sizes: HashMap<PaneId, f32>,
}

impl<S, P> std::fmt::Debug for LayoutController<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutController")
            .field("layout", &self.layout)
            .field("apply_pending", &self.apply_pending)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore, P: PanelSurface> LayoutController<S, P> {
    /// Create a controller holding the default layout.
    pub fn new(store: Arc<S>, surface: P, debounce: Duration) -> Self {
        let mut controller = Self {
            layout: LayoutConfig::default(),
            store: LayoutStore::new(store),
            surface,
            debouncer: Debouncer::new(debounce),
            apply_pending: false,
            expanded_sizes: HashMap::new(),
        };
        controller.remember_expanded_sizes();
        controller
    }

    /// Current proportions.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Percentage label of one pane, e.g. `"80.00%"`.
    pub fn size_label(&self, pane: PaneId) -> String {
        format!("{:.2}%", self.layout.size(pane))
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    /// Whether a write is waiting for the debounce timer.
    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Restore the stored layout.
    ///
    /// An absent, unparsable or out-of-shape record is not fatal: the default
    /// layout is used and a diagnostic is logged. The result is applied to
    /// the panels now, or on the first render that has them.
    pub async fn load(&mut self) -> &LayoutConfig {
        self.layout = match self.store.load().await {
            Ok(layout) => {
                log::info!(
                    "Restored pane layout: H=[{}] V=[{}]",
                    format_sizes(&layout.horizontal),
                    format_sizes(&layout.vertical)
                );
                layout
            }
            Err(ConfigError::Missing(key)) => {
                log::info!("No stored layout ({} missing), using default", key);
                LayoutConfig::default()
            }
            Err(e) => {
                log::warn!("Stored layout unusable, using default: {}", e);
                LayoutConfig::default()
            }
        };
        self.remember_expanded_sizes();
        self.apply_to_panels();
        &self.layout
    }

    /// Replace one axis with sizes reported by the resize widget.
    ///
    /// Sizes that fail validation are dropped and the previous layout kept.
    /// Returns whether the sizes were taken.
    pub fn on_resize(&mut self, axis: Axis, sizes: &[f32]) -> bool {
        match self.layout.set_axis(axis, sizes) {
            Ok(()) => {
                log::trace!("{:?} resized to [{}]", axis, format_sizes(sizes));
                self.commit();
                true
            }
            Err(e) => {
                log::warn!("Ignoring {:?} resize [{}]: {}", axis, format_sizes(sizes), e);
                false
            }
        }
    }

    /// Collapse an expanded pane or expand a collapsed one.
    ///
    /// Space moves between the pane and the center column. Returns whether
    /// the pane is collapsed afterwards.
    pub fn toggle_collapse(&mut self, pane: PaneId) -> Result<bool, ConfigError> {
        let spec = pane.spec();
        let Some(collapsed_size) = spec.collapsed_size else {
            return Err(ConfigError::validation(format!(
                "{:?} pane cannot collapse",
                pane
            )));
        };

        let axis = pane.axis();
        let center = PaneId::Center.index();
        let mut sizes = self.layout.sizes(axis).to_vec();
        let current = sizes[pane.index()];
        let collapsing = !spec.is_collapsed(current);

        let target = if collapsing {
            self.expanded_sizes.insert(pane, current);
            collapsed_size
        } else {
            let wanted = self
                .expanded_sizes
                .get(&pane)
                .copied()
                .unwrap_or(spec.min_size)
                .max(spec.min_size);
            wanted.min(current + sizes[center])
        };

        sizes[center] += current - target;
        sizes[pane.index()] = target;
        self.layout.set_axis(axis, &sizes)?;

        log::info!(
            "{} {:?} pane",
            if collapsing { "Collapsed" } else { "Expanded" },
            pane
        );
        self.commit();
        Ok(collapsing)
    }

    /// Go back to the built-in proportions.
    pub fn reset_to_default(&mut self) {
        self.layout = LayoutConfig::default();
        self.remember_expanded_sizes();
        log::info!("Pane layout reset to default");
        self.commit();
    }

    /// Call after the panel surface (re)mounts. Applies sizes that were
    /// deferred because panels did not exist yet.
    /// The widgets forget their sizes; the next mount gets them again.
    pub fn on_panels_unmounted(&mut self) {
        self.apply_pending = true;
    }

    pub fn on_panels_mounted(&mut self) {
        if self.apply_pending {
            log::debug!("Panels mounted, applying deferred layout");
            self.apply_to_panels();
        }
    }

    /// Write any waiting change immediately instead of at the timer.
    pub async fn flush(&mut self) {
        if self.debouncer.cancel() {
            self.persist_now().await;
        }
    }

    /// Release the persist timer. A waiting write is dropped.
    pub fn teardown(&mut self) {
        if self.debouncer.cancel() {
            log::debug!("Dropped pending layout write on teardown");
        }
    }

    fn commit(&mut self) {
        self.remember_expanded_sizes();
        self.apply_to_panels();
        self.schedule_persist();
    }

    fn remember_expanded_sizes(&mut self) {
        for pane in PaneId::ALL {
            let spec = pane.spec();
            let size = self.layout.size(pane);
            if spec.is_collapsible() && !spec.is_collapsed(size) {
                self.expanded_sizes.insert(pane, size);
            }
        }
    }

    /// Push the authoritative sizes to the widget, which otherwise keeps its
    /// own transient layout after collapse and expand gestures.
    fn apply_to_panels(&mut self) {
        if !self.surface.is_mounted() {
            self.apply_pending = true;
            log::debug!("Panels not mounted yet, deferring layout apply");
            return;
        }
        for pane in PaneId::ALL {
            self.surface.set_size(pane, self.layout.size(pane));
        }
        self.apply_pending = false;
    }

    fn schedule_persist(&mut self) {
        let store = self.store.clone();
        let snapshot = self.layout;
        self.debouncer.schedule(async move {
            save(&store, &snapshot).await;
        });
    }

    async fn persist_now(&self) {
        save(&self.store, &self.layout).await;
    }
}

async fn save<S: KeyValueStore>(store: &LayoutStore<S>, layout: &LayoutConfig) {
    match store.save(layout).await {
        Ok(()) => log::info!(
            "Saved pane layout: H=[{}] V=[{}]",
            format_sizes(&layout.horizontal),
            format_sizes(&layout.vertical)
        ),
        Err(e) => log::error!("Failed to save pane layout: {}", e),
    }
}

fn format_sizes(sizes: &[f32]) -> String {
    sizes
        .iter()
        .map(|s| format!("{:.2}", s))
        .collect::<Vec<_>>()
        .join(", ")
}
