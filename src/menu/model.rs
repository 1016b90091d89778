//! Static description of the menu bar.
//!
//! Each top-level menu owns a [`MenuTree`]: an ordered list of leaves,
//! separators and submenus. The tree is built once at startup and never
//! edited afterwards.

use std::fmt;

/// A selectable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLeaf {
    pub id: String,
    pub label: String,
    /// Key combo shown next to the label, e.g. `CmdOrCtrl+Shift+N`
    pub shortcut_hint: Option<String>,
}

/// One node of a menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Leaf(MenuLeaf),
    Separator { id: String },
    Submenu {
        id: String,
        label: String,
        children: MenuTree,
    },
}

impl MenuNode {
    pub fn leaf(id: &str, label: &str) -> Self {
        MenuNode::Leaf(MenuLeaf {
            id: id.to_string(),
            label: label.to_string(),
            shortcut_hint: None,
        })
    }

    pub fn leaf_with_hint(id: &str, label: &str, hint: &str) -> Self {
        MenuNode::Leaf(MenuLeaf {
            id: id.to_string(),
            label: label.to_string(),
            shortcut_hint: Some(hint.to_string()),
        })
    }

    pub fn separator(id: &str) -> Self {
        MenuNode::Separator { id: id.to_string() }
    }

    pub fn submenu(id: &str, label: &str, children: Vec<MenuNode>) -> Self {
        MenuNode::Submenu {
            id: id.to_string(),
            label: label.to_string(),
            children: MenuTree::new(children),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MenuNode::Leaf(leaf) => &leaf.id,
            MenuNode::Separator { id } | MenuNode::Submenu { id, .. } => id,
        }
    }
}

/// Ordered sequence of menu nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    pub fn new(nodes: Vec<MenuNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    /// Depth-first search for a leaf, descending into submenus.
    pub fn find_leaf(&self, id: &str) -> Option<&MenuLeaf> {
        self.nodes.iter().find_map(|node| match node {
            MenuNode::Leaf(leaf) if leaf.id == id => Some(leaf),
            MenuNode::Submenu { children, .. } => children.find_leaf(id),
            _ => None,
        })
    }

    /// Children of the submenu `id`, searched at any depth.
    pub fn find_submenu(&self, id: &str) -> Option<&MenuTree> {
        self.nodes.iter().find_map(|node| match node {
            MenuNode::Submenu {
                id: sub_id,
                children,
                ..
            } => {
                if sub_id == id {
                    Some(children)
                } else {
                    children.find_submenu(id)
                }
            }
            _ => None,
        })
    }

    /// Ids of every leaf in display order.
    pub fn leaf_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_leaf_ids(&mut ids);
        ids
    }

    fn collect_leaf_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        for node in &self.nodes {
            match node {
                MenuNode::Leaf(leaf) => ids.push(&leaf.id),
                MenuNode::Submenu { children, .. } => children.collect_leaf_ids(ids),
                MenuNode::Separator { .. } => {}
            }
        }
    }
}

/// Identifier of a top-level menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKey {
    File,
    Edit,
    View,
    Help,
}

impl MenuKey {
    pub const ALL: [MenuKey; 4] = [MenuKey::File, MenuKey::Edit, MenuKey::View, MenuKey::Help];

    pub fn as_str(self) -> &'static str {
        match self {
            MenuKey::File => "file",
            MenuKey::Edit => "edit",
            MenuKey::View => "view",
            MenuKey::Help => "help",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for MenuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A menu bar button and the popover it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelMenu {
    pub key: MenuKey,
    pub label: String,
    pub tree: MenuTree,
}

/// Every top-level menu in bar order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuBarModel {
    menus: Vec<TopLevelMenu>,
}

impl Default for MenuBarModel {
    fn default() -> Self {
        Self::default_menu_bar()
    }
}

impl MenuBarModel {
    pub fn new(menus: Vec<TopLevelMenu>) -> Self {
        Self { menus }
    }

    /// The shell's standard File / Edit / View / Help menus.
    pub fn default_menu_bar() -> Self {
        let file = vec![
            MenuNode::leaf_with_hint("new", "New Project", "CmdOrCtrl+Shift+N"),
            MenuNode::leaf_with_hint("open", "Open Project...", "CmdOrCtrl+O"),
            MenuNode::separator("file-sep-1"),
            MenuNode::leaf_with_hint("save", "Save Project", "CmdOrCtrl+S"),
            MenuNode::submenu(
                "saveAs",
                "Save As...",
                vec![
                    MenuNode::leaf("saveAsSQL", "SQL File"),
                    MenuNode::leaf("saveAsVGS", "VGS File"),
                ],
            ),
            MenuNode::separator("file-sep-2"),
            MenuNode::leaf("exit", "Exit"),
        ];

        let edit = vec![
            MenuNode::leaf_with_hint("undo", "Undo", "CmdOrCtrl+Z"),
            MenuNode::leaf_with_hint("redo", "Redo", "CmdOrCtrl+Shift+Z"),
            MenuNode::separator("edit-sep-1"),
            MenuNode::leaf_with_hint("cut", "Cut", "CmdOrCtrl+X"),
            MenuNode::leaf_with_hint("copy", "Copy", "CmdOrCtrl+C"),
            MenuNode::leaf_with_hint("paste", "Paste", "CmdOrCtrl+V"),
        ];

        let view = vec![
            MenuNode::leaf("resetLayout", "Reset Layout"),
            MenuNode::separator("view-sep-1"),
            MenuNode::leaf("toggleLeftPanel", "Toggle Left Panel"),
            MenuNode::leaf("toggleRightPanel", "Toggle Right Panel"),
        ];

        let help = vec![
            MenuNode::leaf_with_hint("docs", "Documentation", "F1"),
            MenuNode::leaf("about", "About"),
        ];

        let menu = |key, label: &str, nodes| TopLevelMenu {
            key,
            label: label.to_string(),
            tree: MenuTree::new(nodes),
        };

        Self::new(vec![
            menu(MenuKey::File, "File", file),
            menu(MenuKey::Edit, "Edit", edit),
            menu(MenuKey::View, "View", view),
            menu(MenuKey::Help, "Help", help),
        ])
    }

    pub fn menus(&self) -> &[TopLevelMenu] {
        &self.menus
    }

    pub fn menu(&self, key: MenuKey) -> Option<&TopLevelMenu> {
        self.menus.iter().find(|menu| menu.key == key)
    }

    /// Find a leaf anywhere in the bar, with the menu that owns it.
    pub fn find_leaf(&self, id: &str) -> Option<(MenuKey, &MenuLeaf)> {
        self.menus
            .iter()
            .find_map(|menu| menu.tree.find_leaf(id).map(|leaf| (menu.key, leaf)))
    }
}
