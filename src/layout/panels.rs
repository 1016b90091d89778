//! Panel-resize surface.
//!
//! The rendering side owns one handle per pane in a fixed arena indexed by
//! [`PaneId`]. The layout controller never holds references into the widget
//! tree; it issues "set size" commands by pane id, and commands for panes
//! that are not mounted are dropped.

use baseshell_config::{Axis, PaneId};

/// Imperative side of the pane-resize widget.
pub trait PanelSurface {
    /// Whether every pane exists and can accept size commands.
    fn is_mounted(&self) -> bool;

    /// Resize one pane to `percent` of its group.
    fn set_size(&mut self, pane: PaneId, percent: f32);
}

/// One slot of the pane arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneHandle {
    pub id: PaneId,
    pub mounted: bool,
    /// Size the widget currently shows, `None` until first sized
    pub size: Option<f32>,
}

/// Arena of pane handles addressed by stable pane id.
#[derive(Debug, Clone)]
pub struct PaneArena {
    handles: [PaneHandle; 5],
    commands: usize,
}

impl Default for PaneArena {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneArena {
    /// All panes, none mounted.
    pub fn new() -> Self {
        Self {
            handles: PaneId::ALL.map(|id| PaneHandle {
                id,
                mounted: false,
                size: None,
            }),
            commands: 0,
        }
    }

    fn slot(pane: PaneId) -> usize {
        match pane {
            PaneId::Left => 0,
            PaneId::Center => 1,
            PaneId::Right => 2,
            PaneId::Editor => 3,
            PaneId::Log => 4,
        }
    }

    pub fn handle(&self, pane: PaneId) -> &PaneHandle {
        &self.handles[Self::slot(pane)]
    }

    /// Size the widget currently shows for `pane`.
    pub fn size(&self, pane: PaneId) -> Option<f32> {
        self.handle(pane).size
    }

    /// Sizes of one axis, `None` if any pane on it is unsized.
    pub fn axis_sizes(&self, axis: Axis) -> Option<Vec<f32>> {
        axis.panes().iter().map(|&pane| self.size(pane)).collect()
    }

    pub fn mount(&mut self, pane: PaneId) {
        self.handles[Self::slot(pane)].mounted = true;
    }

    pub fn mount_all(&mut self) {
        for handle in &mut self.handles {
            handle.mounted = true;
        }
    }

    /// Unmounting forgets the widget's size; a remount starts unsized.
    pub fn unmount(&mut self, pane: PaneId) {
        let handle = &mut self.handles[Self::slot(pane)];
        handle.mounted = false;
        handle.size = None;
    }

    pub fn unmount_all(&mut self) {
        for pane in PaneId::ALL {
            self.unmount(pane);
        }
    }

    /// Let the widget move panes on its own, as a drag or collapse gesture
    /// does before the controller has resynced it.
    pub fn drift(&mut self, axis: Axis, sizes: &[f32]) {
        for (&pane, &size) in axis.panes().iter().zip(sizes) {
            let handle = &mut self.handles[Self::slot(pane)];
            if handle.mounted {
                handle.size = Some(size);
            }
        }
    }

    /// Number of size commands that reached a mounted pane.
    pub fn command_count(&self) -> usize {
        self.commands
    }
}

impl PanelSurface for PaneArena {
    fn is_mounted(&self) -> bool {
        self.handles.iter().all(|handle| handle.mounted)
    }

    fn set_size(&mut self, pane: PaneId, percent: f32) {
        let handle = &mut self.handles[Self::slot(pane)];
        if handle.mounted {
            handle.size = Some(percent);
            self.commands += 1;
        } else {
            log::trace!("Dropping size command for unmounted pane {:?}", pane);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena_is_unmounted() {
        let arena = PaneArena::new();
        assert!(!arena.is_mounted());
        for pane in PaneId::ALL {
            assert_eq!(arena.handle(pane).id, pane);
            assert_eq!(arena.size(pane), None);
        }
    }

    #[test]
    fn test_commands_to_unmounted_panes_are_dropped() {
        let mut arena = PaneArena::new();
        arena.set_size(PaneId::Left, 20.0);
        assert_eq!(arena.size(PaneId::Left), None);
        assert_eq!(arena.command_count(), 0);

        arena.mount(PaneId::Left);
        arena.set_size(PaneId::Left, 20.0);
        assert_eq!(arena.size(PaneId::Left), Some(20.0));
        assert!(!arena.is_mounted());
    }

    #[test]
    fn test_unmount_forgets_size() {
        let mut arena = PaneArena::new();
        arena.mount_all();
        arena.set_size(PaneId::Log, 60.0);
        arena.unmount(PaneId::Log);
        arena.mount(PaneId::Log);
        assert_eq!(arena.size(PaneId::Log), None);
    }

    #[test]
    fn test_axis_sizes() {
        let mut arena = PaneArena::new();
        arena.mount_all();
        assert_eq!(arena.axis_sizes(Axis::Vertical), None);
        arena.drift(Axis::Vertical, &[35.0, 65.0]);
        assert_eq!(arena.axis_sizes(Axis::Vertical), Some(vec![35.0, 65.0]));
    }
}
