//! Recursive menu rendering.
//!
//! [`render_tree`] walks a [`MenuTree`] and hands each node to a
//! [`MenuRenderer`]. Leaves and submenu headers receive the event they raise
//! when pressed; separators receive none.

use super::model::{MenuBarModel, MenuLeaf, MenuNode, MenuTree};
use super::state::{MenuEvent, MenuInteractionState};

/// Visitor over a menu tree.
pub trait MenuRenderer {
    /// A selectable entry. `on_press` is the event a press raises.
    fn leaf(&mut self, leaf: &MenuLeaf, depth: usize, on_press: MenuEvent);

    /// A non-interactive divider.
    fn separator(&mut self, id: &str, depth: usize);

    /// Header of a nested popover, followed by its children one level deeper.
    fn begin_submenu(&mut self, id: &str, label: &str, depth: usize, on_open: MenuEvent);

    fn end_submenu(&mut self, _id: &str, _depth: usize) {}
}

/// Render `tree` starting at `depth`.
pub fn render_tree<R: MenuRenderer + ?Sized>(tree: &MenuTree, renderer: &mut R, depth: usize) {
    for node in tree.nodes() {
        match node {
            MenuNode::Leaf(leaf) => {
                renderer.leaf(leaf, depth, MenuEvent::Select(leaf.id.clone()));
            }
            MenuNode::Separator { id } => renderer.separator(id, depth),
            MenuNode::Submenu {
                id,
                label,
                children,
            } => {
                renderer.begin_submenu(id, label, depth, MenuEvent::SubmenuOpen(id.clone()));
                render_tree(children, renderer, depth + 1);
                renderer.end_submenu(id, depth);
            }
        }
    }
}

const SEPARATOR: &str = "────────────────";
const LABEL_WIDTH: usize = 20;

/// Plain-text renderer used by the headless binary.
#[derive(Debug, Default)]
pub struct TextMenuRenderer {
    lines: Vec<String>,
}

impl TextMenuRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// The bar with the open menu bracketed, followed by the open popover.
    pub fn render_bar(model: &MenuBarModel, state: &MenuInteractionState) -> String {
        let bar = model
            .menus()
            .iter()
            .map(|menu| {
                if state.open_menu == Some(menu.key) {
                    format!("[{}]", menu.label)
                } else {
                    format!(" {} ", menu.label)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = bar;
        if let Some(menu) = state.open_menu.and_then(|key| model.menu(key)) {
            let mut renderer = Self::new();
            render_tree(&menu.tree, &mut renderer, 1);
            for line in renderer.into_lines() {
                out.push('\n');
                out.push_str(&line);
            }
        }
        out
    }

    fn indent(depth: usize) -> String {
        "  ".repeat(depth)
    }
}

impl MenuRenderer for TextMenuRenderer {
    fn leaf(&mut self, leaf: &MenuLeaf, depth: usize, on_press: MenuEvent) {
        let hint = leaf.shortcut_hint.as_deref().unwrap_or("");
        log::trace!("Rendered {} ({:?})", leaf.id, on_press);
        self.lines.push(
            format!(
                "{}{:<width$} {}",
                Self::indent(depth),
                leaf.label,
                hint,
                width = LABEL_WIDTH
            )
            .trim_end()
            .to_string(),
        );
    }

    fn separator(&mut self, _id: &str, depth: usize) {
        self.lines.push(format!("{}{}", Self::indent(depth), SEPARATOR));
    }

    fn begin_submenu(&mut self, _id: &str, label: &str, depth: usize, _on_open: MenuEvent) {
        self.lines
            .push(format!("{}{:<width$} ▸", Self::indent(depth), label, width = LABEL_WIDTH));
    }
}
