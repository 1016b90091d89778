//! Pane layout proportions.
//!
//! The shell content area is a three-column horizontal split (left sidebar,
//! center, right sidebar) whose center column is itself split vertically into
//! an editor area and a log pane. Every size is a percentage of its parent
//! group, so each axis sums to 100.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Sum every axis must reach.
pub const TOTAL_PERCENT: f32 = 100.0;

/// Allowed drift of an axis sum away from [`TOTAL_PERCENT`] before a record
/// is rejected. Drag resampling in the resize widget produces small float
/// errors; anything further away than this is treated as corrupt.
pub const SUM_TOLERANCE: f32 = 1.0;

/// Comparison slack for individual sizes.
pub const EPSILON: f32 = 1e-3;

/// How far a pane may sit from its collapsed size and still count as
/// collapsed. Renormalizing within [`SUM_TOLERANCE`] moves a size by at most
/// 1% of itself.
pub const COLLAPSE_TOLERANCE: f32 = 0.05;

/// Horizontal proportions used when nothing valid is stored.
pub const DEFAULT_HORIZONTAL: [f32; 3] = [10.0, 80.0, 10.0];

/// Vertical proportions used when nothing valid is stored.
pub const DEFAULT_VERTICAL: [f32; 2] = [40.0, 60.0];

/// Quiet period before a burst of resize events is written to the store.
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Direction of a pane group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Panes side by side (left | center | right)
    Horizontal,
    /// Panes stacked inside the center column (editor / log)
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Key under which this axis is persisted.
    pub fn store_key(self) -> &'static str {
        match self {
            Axis::Horizontal => "layout.horizontal",
            Axis::Vertical => "layout.vertical",
        }
    }

    /// Panes of this axis in index order.
    pub fn panes(self) -> &'static [PaneId] {
        match self {
            Axis::Horizontal => &[PaneId::Left, PaneId::Center, PaneId::Right],
            Axis::Vertical => &[PaneId::Editor, PaneId::Log],
        }
    }

    /// Number of panes on this axis.
    pub fn len(self) -> usize {
        self.panes().len()
    }

    /// Parse the short names used by the command line (`h`, `horizontal`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Some(Axis::Horizontal),
            "v" | "vertical" => Some(Axis::Vertical),
            _ => None,
        }
    }
}

/// Stable identifier of one resizable pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneId {
    Left,
    Center,
    Right,
    Editor,
    Log,
}

impl PaneId {
    /// All panes, horizontal axis first.
    pub const ALL: [PaneId; 5] = [
        PaneId::Left,
        PaneId::Center,
        PaneId::Right,
        PaneId::Editor,
        PaneId::Log,
    ];

    /// Axis this pane belongs to.
    pub fn axis(self) -> Axis {
        match self {
            PaneId::Left | PaneId::Center | PaneId::Right => Axis::Horizontal,
            PaneId::Editor | PaneId::Log => Axis::Vertical,
        }
    }

    /// Position of this pane within its axis.
    pub fn index(self) -> usize {
        match self {
            PaneId::Left | PaneId::Editor => 0,
            PaneId::Center | PaneId::Log => 1,
            PaneId::Right => 2,
        }
    }

    /// Size constraints of this pane.
    pub fn spec(self) -> PaneSpec {
        match self {
            PaneId::Left => PaneSpec {
                min_size: 10.0,
                collapsed_size: Some(3.0),
            },
            PaneId::Right => PaneSpec {
                min_size: 10.0,
                collapsed_size: Some(0.0),
            },
            PaneId::Log => PaneSpec {
                min_size: 10.0,
                collapsed_size: None,
            },
            PaneId::Center | PaneId::Editor => PaneSpec {
                min_size: 0.0,
                collapsed_size: None,
            },
        }
    }

    /// Parse a pane name as typed on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(PaneId::Left),
            "center" => Some(PaneId::Center),
            "right" => Some(PaneId::Right),
            "editor" => Some(PaneId::Editor),
            "log" => Some(PaneId::Log),
            _ => None,
        }
    }
}

/// Size constraints for a single pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneSpec {
    /// Smallest size the pane may have while expanded
    pub min_size: f32,
    /// Size of the pane while collapsed, `None` if it cannot collapse
    pub collapsed_size: Option<f32>,
}

impl PaneSpec {
    pub fn is_collapsible(&self) -> bool {
        self.collapsed_size.is_some()
    }

    /// Whether `size` is the collapsed size of this pane.
    pub fn is_collapsed(&self, size: f32) -> bool {
        self.collapsed_size
            .is_some_and(|collapsed| (size - collapsed).abs() <= COLLAPSE_TOLERANCE)
    }

    /// Whether `size` satisfies the minimum (or is the collapsed size).
    pub fn accepts(&self, size: f32) -> bool {
        size + EPSILON >= self.min_size || self.is_collapsed(size)
    }
}

/// Percentages of every pane, grouped by axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// left, center, right
    pub horizontal: [f32; 3],
    /// editor, log
    pub vertical: [f32; 2],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_HORIZONTAL,
            vertical: DEFAULT_VERTICAL,
        }
    }
}

impl LayoutConfig {
    /// Build a layout from raw slices, validating and renormalizing both axes.
    pub fn from_axes(horizontal: &[f32], vertical: &[f32]) -> Result<Self, ConfigError> {
        let mut layout = Self::default();
        layout.set_axis(Axis::Horizontal, horizontal)?;
        layout.set_axis(Axis::Vertical, vertical)?;
        Ok(layout)
    }

    /// Sizes of one axis in pane index order.
    pub fn sizes(&self, axis: Axis) -> &[f32] {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    /// Size of one pane.
    pub fn size(&self, pane: PaneId) -> f32 {
        self.sizes(pane.axis())[pane.index()]
    }

    /// Replace one axis after validation. On error the layout is untouched.
    pub fn set_axis(&mut self, axis: Axis, sizes: &[f32]) -> Result<(), ConfigError> {
        let normalized = validate_axis(axis, sizes)?;
        match axis {
            Axis::Horizontal => self.horizontal.copy_from_slice(&normalized),
            Axis::Vertical => self.vertical.copy_from_slice(&normalized),
        }
        Ok(())
    }

    /// Validate both axes, returning a renormalized copy.
    pub fn validated(&self) -> Result<Self, ConfigError> {
        Self::from_axes(&self.horizontal, &self.vertical)
    }

    /// Whether both axes sum to 100 within [`SUM_TOLERANCE`].
    pub fn is_balanced(&self) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| (sum(self.sizes(axis)) - TOTAL_PERCENT).abs() <= SUM_TOLERANCE)
    }
}

fn sum(sizes: &[f32]) -> f32 {
    sizes.iter().sum()
}

/// Check the shape and constraints of one axis and renormalize it.
///
/// Rejects the wrong number of entries, non-finite or negative values, sums
/// outside `100 ± SUM_TOLERANCE` and values under a pane minimum that are not
/// the pane's collapsed size. Accepted values are scaled proportionally so
/// they sum to exactly 100.
pub fn validate_axis(axis: Axis, sizes: &[f32]) -> Result<Vec<f32>, ConfigError> {
    if sizes.len() != axis.len() {
        return Err(ConfigError::validation(format!(
            "{:?} layout needs {} sizes, got {}",
            axis,
            axis.len(),
            sizes.len()
        )));
    }

    if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(ConfigError::validation(format!(
            "{:?} layout contains invalid size {}",
            axis, bad
        )));
    }

    let total = sum(sizes);
    if (total - TOTAL_PERCENT).abs() > SUM_TOLERANCE {
        return Err(ConfigError::validation(format!(
            "{:?} layout sums to {:.3}, expected {} ± {}",
            axis, total, TOTAL_PERCENT, SUM_TOLERANCE
        )));
    }

    for (pane, &size) in axis.panes().iter().zip(sizes) {
        if !pane.spec().accepts(size) {
            return Err(ConfigError::validation(format!(
                "{:?} pane size {:.3} is below its minimum {}",
                pane,
                size,
                pane.spec().min_size
            )));
        }
    }

    Ok(renormalize(sizes))
}

/// Scale sizes proportionally so they sum to [`TOTAL_PERCENT`].
pub fn renormalize(sizes: &[f32]) -> Vec<f32> {
    let total = sum(sizes);
    if total <= 0.0 {
        return sizes.to_vec();
    }
    let scale = TOTAL_PERCENT / total;
    sizes.iter().map(|s| s * scale).collect()
}
