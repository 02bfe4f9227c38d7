//! Data-source contracts for the ready-made menus.
//!
//! A menu never owns domain data. It asks its source for labels, detail
//! lines and buttons every time it needs them, so the source stays the
//! single owner of whatever the host shows. Every call is fallible; a menu
//! that gets an error from its source disables itself for the session.

use earshot_core::{ActionOutcome, ButtonDescriptor, NavError};

/// A flat list of items a [`ListMenu`](crate::list_menu::ListMenu) navigates.
pub trait MenuSource {
    fn item_count(&self) -> Result<usize, NavError>;

    /// Spoken label of the item at `index`. Typeahead matches against it.
    fn label(&self, index: usize) -> Result<String, NavError>;

    /// Lines shown between the header and the buttons of the detail view.
    fn content_lines(&self, _index: usize) -> Result<Vec<String>, NavError> {
        Ok(Vec::new())
    }

    /// Build the buttons for the item at `index`. Called each time the
    /// detail view is entered or refreshed.
    fn populate_buttons(&mut self, _index: usize) -> Result<Vec<ButtonDescriptor>, NavError> {
        Ok(Vec::new())
    }

    /// Direct activation from the list.
    ///
    /// `Ok(None)` means the item has no direct action and Enter opens its
    /// detail view instead.
    fn activate(&mut self, _index: usize) -> Result<Option<ActionOutcome>, NavError> {
        Ok(None)
    }

    /// Whether typed digits set a quantity on the item at `index`.
    fn accepts_quantity(&self, _index: usize) -> bool {
        false
    }

    /// Apply a typed quantity to the item at `index`.
    fn set_quantity(&mut self, _index: usize, _quantity: u32) -> Result<(), NavError> {
        Err(NavError::State("quantity entry is not supported here".into()))
    }
}

/// A source whose items form an indented tree, flattened to the rows
/// currently visible.
///
/// Row indices shift when a node expands or collapses; the menu re-reads
/// [`MenuSource::item_count`] after every [`set_expanded`](Self::set_expanded).
pub trait TreeSource: MenuSource {
    fn indent_level(&self, index: usize) -> Result<usize, NavError>;
    fn is_expanded(&self, index: usize) -> Result<bool, NavError>;
    fn has_children(&self, index: usize) -> Result<bool, NavError>;
    fn set_expanded(&mut self, index: usize, expanded: bool) -> Result<(), NavError>;
}

/// A plain item for [`VecSource`] and [`NodeTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub lines: Vec<String>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_lines<I, L>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for MenuItem {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for MenuItem {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

/// An in-memory list with no buttons.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    items: Vec<MenuItem>,
}

impl VecSource {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<MenuItem>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<MenuItem>) {
        self.items = items;
    }

    fn item(&self, index: usize) -> Result<&MenuItem, NavError> {
        self.items
            .get(index)
            .ok_or_else(|| NavError::State(format!("no item at index {index}")))
    }
}

impl MenuSource for VecSource {
    fn item_count(&self) -> Result<usize, NavError> {
        Ok(self.items.len())
    }

    fn label(&self, index: usize) -> Result<String, NavError> {
        Ok(self.item(index)?.label.clone())
    }

    fn content_lines(&self, index: usize) -> Result<Vec<String>, NavError> {
        Ok(self.item(index)?.lines.clone())
    }
}

/// One node of a [`NodeTree`], stored in depth-first order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub item: MenuItem,
    pub level: usize,
    pub expanded: bool,
}

impl TreeNode {
    pub fn new(level: usize, item: impl Into<MenuItem>) -> Self {
        Self {
            item: item.into(),
            level,
            expanded: false,
        }
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }
}

/// An in-memory tree. Nodes are given depth-first with their indent
/// level; a node is visible when every ancestor is expanded.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<TreeNode>,
}

impl NodeTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Node indices of the visible rows, in display order.
    fn visible(&self) -> Vec<usize> {
        let mut rows = Vec::new();
        // Nodes deeper than this are hidden under a collapsed ancestor.
        let mut hidden_below: Option<usize> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(level) = hidden_below {
                if node.level > level {
                    continue;
                }
                hidden_below = None;
            }
            rows.push(i);
            if !node.expanded {
                hidden_below = Some(node.level);
            }
        }
        rows
    }

    fn node_at(&self, row: usize) -> Result<usize, NavError> {
        self.visible()
            .get(row)
            .copied()
            .ok_or_else(|| NavError::State(format!("no tree row {row}")))
    }

    fn node(&self, row: usize) -> Result<&TreeNode, NavError> {
        Ok(&self.nodes[self.node_at(row)?])
    }
}

impl MenuSource for NodeTree {
    fn item_count(&self) -> Result<usize, NavError> {
        Ok(self.visible().len())
    }

    fn label(&self, index: usize) -> Result<String, NavError> {
        Ok(self.node(index)?.item.label.clone())
    }

    fn content_lines(&self, index: usize) -> Result<Vec<String>, NavError> {
        Ok(self.node(index)?.item.lines.clone())
    }
}

impl TreeSource for NodeTree {
    fn indent_level(&self, index: usize) -> Result<usize, NavError> {
        Ok(self.node(index)?.level)
    }

    fn is_expanded(&self, index: usize) -> Result<bool, NavError> {
        Ok(self.node(index)?.expanded)
    }

    fn has_children(&self, index: usize) -> Result<bool, NavError> {
        let node = self.node_at(index)?;
        let level = self.nodes[node].level;
        Ok(self
            .nodes
            .get(node + 1)
            .is_some_and(|next| next.level > level))
    }

    fn set_expanded(&mut self, index: usize, expanded: bool) -> Result<(), NavError> {
        let node = self.node_at(index)?;
        self.nodes[node].expanded = expanded;
        Ok(())
    }
}
