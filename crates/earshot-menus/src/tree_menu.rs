//! An indented tree menu: categories that expand and collapse in place.

use crate::common::{self, Typed};
use crate::key::{KeyMap, MenuKeyBindings};
use crate::source::TreeSource;
use earshot_core::selection::{
    clamp_index, find_parent_index, first_sibling, position_suffix, select_next, select_previous,
    sibling_position, tree_end,
};
use earshot_core::{
    ActionOutcome, HostDefault, KeyInput, NavContext, NavError, NavigationState, TypeaheadSearch,
};

/// Snapshot of one visible row, taken per key.
#[derive(Debug, Clone, Copy)]
struct Row {
    level: usize,
    has_children: bool,
    expanded: bool,
}

impl Row {
    fn open_parent(&self) -> bool {
        self.has_children && self.expanded
    }
}

/// Keyboard navigation over a [`TreeSource`].
///
/// | Key | Action |
/// |-----|--------|
/// | Up / Down | Previous / next visible row |
/// | Right | Expand, or move to the first child when already expanded |
/// | Left | Collapse, or move to the parent |
/// | Home / End | First / last sibling; End enters an expanded node's subtree |
/// | Ctrl+Home / Ctrl+End | Top / bottom of the whole tree |
/// | Enter | Activate the row, or toggle it when it has no action |
/// | letters | Typeahead over visible labels |
pub struct TreeMenu<S> {
    title: String,
    source: S,
    open: bool,
    inert: bool,
    selected: usize,
    search: TypeaheadSearch,
    bindings: MenuKeyBindings,
}

impl<S: TreeSource + 'static> TreeMenu<S> {
    pub fn new(title: impl Into<String>, source: S) -> Self {
        Self {
            title: title.into(),
            source,
            open: false,
            inert: false,
            selected: 0,
            search: TypeaheadSearch::new(),
            bindings: MenuKeyBindings::default(),
        }
    }

    pub fn with_bindings(mut self, bindings: MenuKeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn open(&mut self, cx: &mut NavContext<'_>) {
        if self.inert {
            return;
        }
        self.search.set_timeout(cx.config().typeahead_timeout());
        self.search.clear();
        self.selected = 0;
        self.open = true;
        cx.interrupt(&self.title);
        match self.row_text(cx) {
            Ok(text) => cx.queue(&text),
            Err(err) => self.disable(&err, cx),
        }
    }

    fn disable(&mut self, err: &NavError, cx: &mut NavContext<'_>) {
        self.inert = true;
        self.open = false;
        self.search.clear();
        common::announce_disabled(&self.title, err, cx);
    }

    fn rows(&self) -> Result<Vec<Row>, NavError> {
        (0..self.source.item_count()?)
            .map(|i| {
                Ok(Row {
                    level: self.source.indent_level(i)?,
                    has_children: self.source.has_children(i)?,
                    expanded: self.source.is_expanded(i)?,
                })
            })
            .collect()
    }

    fn labels(&self) -> Result<Vec<String>, NavError> {
        (0..self.source.item_count()?)
            .map(|i| self.source.label(i))
            .collect()
    }

    /// "Meals, collapsed, 1 of 2, level 2"
    fn row_text(&self, cx: &NavContext<'_>) -> Result<String, NavError> {
        let rows = self.rows()?;
        let Some(row) = rows.get(self.selected) else {
            return Ok(common::item_announcement(None, 0, 0, cx.config()));
        };
        let mut text = self.source.label(self.selected)?;
        if row.has_children {
            text.push_str(if row.expanded { ", expanded" } else { ", collapsed" });
        }
        if let Some((position, total)) = sibling_position(&rows, self.selected, |r| r.level) {
            text.push_str(&position_suffix(position - 1, total, cx.config()));
        }
        if row.level > 0 {
            text.push_str(&format!(", level {}", row.level + 1));
        }
        Ok(text)
    }

    fn announce(&self, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        let text = self.row_text(cx)?;
        cx.interrupt(&text);
        Ok(true)
    }

    fn select(&mut self, index: usize, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        self.selected = index;
        self.announce(cx)
    }

    fn set_expanded(&mut self, expanded: bool, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        self.source.set_expanded(self.selected, expanded)?;
        tracing::debug!(menu = %self.title, row = self.selected, expanded, "tree toggled");
        self.announce(cx)
    }

    fn route(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        if self.bindings.help.matches(key) {
            cx.interrupt(&self.bindings.help_announcement());
            return Ok(true);
        }
        if self.bindings.back.matches(key) {
            if self.search.is_active() {
                self.search.clear();
                cx.interrupt("Search cleared");
            } else {
                self.close(cx);
            }
            return Ok(true);
        }

        let rows = self.rows()?;
        let count = rows.len();
        self.selected = clamp_index(self.selected, count).unwrap_or(0);
        let Some(row) = rows.get(self.selected).copied() else {
            // Empty tree: swallow navigation and say so.
            if key.typed_char().is_some() || self.is_navigation(key) {
                return self.announce(cx);
            }
            return Ok(false);
        };
        let wrap = cx.wrap();
        let b = &self.bindings;

        if b.next.matches(key) || b.previous.matches(key) {
            let forward = b.next.matches(key);
            let target = if self.search.is_active() {
                let found = if forward {
                    self.search.next_match(self.selected)
                } else {
                    self.search.previous_match(self.selected)
                };
                found.unwrap_or(self.selected)
            } else if forward {
                select_next(self.selected, count, wrap)
            } else {
                select_previous(self.selected, count, wrap)
            };
            return self.select(target, cx);
        }
        if b.next_button.matches(key) {
            self.search.clear();
            return match (row.has_children, row.expanded) {
                (true, false) => self.set_expanded(true, cx),
                (true, true) => self.select(self.selected + 1, cx),
                _ => self.announce(cx),
            };
        }
        if b.previous_button.matches(key) {
            self.search.clear();
            if row.open_parent() {
                return self.set_expanded(false, cx);
            }
            return match find_parent_index(&rows, self.selected, |r| r.level) {
                Some(parent) => self.select(parent, cx),
                None => self.announce(cx),
            };
        }
        if b.top.matches(key) {
            self.search.clear();
            return self.select(0, cx);
        }
        if b.bottom.matches(key) {
            self.search.clear();
            return self.select(count - 1, cx);
        }
        if b.first.matches(key) {
            self.search.clear();
            let target = first_sibling(&rows, self.selected, |r| r.level).unwrap_or(self.selected);
            return self.select(target, cx);
        }
        if b.last.matches(key) {
            self.search.clear();
            let target = tree_end(&rows, self.selected, |r| r.level, Row::open_parent)
                .unwrap_or(self.selected);
            return self.select(target, cx);
        }
        if b.activate.matches(key) {
            return match self.source.activate(self.selected) {
                Ok(Some(ActionOutcome::CloseMenu)) => {
                    self.close(cx);
                    Ok(true)
                }
                Ok(Some(_)) => self.announce(cx),
                Ok(None) if row.has_children => self.set_expanded(!row.expanded, cx),
                Ok(None) => self.announce(cx),
                Err(err) => {
                    common::announce_action_failure(&self.title, &err, cx);
                    Ok(true)
                }
            };
        }
        if b.erase.matches(key) {
            if !self.search.is_active() {
                return Ok(false);
            }
            let labels = self.labels()?;
            match self.search.process_backspace(&labels, self.selected) {
                Some(index) => return self.select(index, cx),
                None => cx.interrupt("Search cleared"),
            }
            return Ok(true);
        }

        let Some(c) = key.typed_char() else {
            return Ok(false);
        };
        let labels = self.labels()?;
        match common::type_char(&mut self.search, c, &labels, self.selected) {
            Typed::Jump(index) => self.select(index, cx),
            Typed::NoMatch(attempt) => {
                cx.interrupt(&format!("No matches for {attempt}"));
                Ok(true)
            }
        }
    }

    fn is_navigation(&self, key: &KeyInput) -> bool {
        let b = &self.bindings;
        [
            &b.next,
            &b.previous,
            &b.first,
            &b.last,
            &b.top,
            &b.bottom,
            &b.next_button,
            &b.previous_button,
            &b.activate,
        ]
        .iter()
        .any(|binding| binding.matches(key))
    }
}

impl<S: TreeSource + 'static> NavigationState for TreeMenu<S> {
    fn name(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.open && !self.inert
    }

    fn handle_input(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        match self.route(key, cx) {
            Ok(consumed) => Ok(consumed),
            Err(err) => {
                self.disable(&err, cx);
                Ok(true)
            }
        }
    }

    fn close(&mut self, cx: &mut NavContext<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.search.clear();
        cx.queue(&format!("{} closed", self.title));
    }

    fn claims_host_default(&self, kind: HostDefault) -> bool {
        match kind {
            HostDefault::Cancel => self.search.is_active(),
            HostDefault::Accept => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MenuSource, NodeTree, TreeNode};
    use earshot_core::testing::TestEngine;
    use earshot_core::{StateHandle, StatePriority};
    use crossterm::event::KeyCode;
    use std::cell::Cell;
    use std::rc::Rc;

    fn stockpile() -> NodeTree {
        NodeTree::new(vec![
            TreeNode::new(0, "Food").expanded(),
            TreeNode::new(1, "Meals").expanded(),
            TreeNode::new(2, "Fine meal"),
            TreeNode::new(2, "Simple meal"),
            TreeNode::new(1, "Raw food"),
            TreeNode::new(0, "Weapons"),
            TreeNode::new(1, "Knife"),
            TreeNode::new(0, "Apparel"),
        ])
    }

    fn opened(t: &mut TestEngine) -> StateHandle<TreeMenu<NodeTree>> {
        let handle = t.register(StatePriority::overlay(0), TreeMenu::new("Stockpile", stockpile()));
        t.with_state(handle, |m, cx| m.open(cx));
        t.clear_spoken();
        handle
    }

    fn selected(t: &TestEngine, h: StateHandle<TreeMenu<NodeTree>>) -> usize {
        t.state(h).unwrap().selected()
    }

    #[test]
    fn announces_state_position_and_level() {
        let mut t = TestEngine::new();
        let h = t.register(StatePriority::overlay(0), TreeMenu::new("Stockpile", stockpile()));
        t.with_state(h, |m, cx| m.open(cx));
        assert_eq!(t.spoken(), vec!["Stockpile", "Food, expanded, 1 of 3"]);
        t.press(KeyCode::Down);
        assert_eq!(t.last_spoken().as_deref(), Some("Meals, expanded, 1 of 2, level 2"));
    }

    #[test]
    fn left_goes_to_parent_then_collapses() {
        let mut t = TestEngine::new();
        let h = opened(&mut t);
        t.press(KeyCode::Down);
        t.press(KeyCode::Down);
        assert_eq!(selected(&t, h), 2);
        t.press(KeyCode::Left);
        assert_eq!(selected(&t, h), 1);
        t.press(KeyCode::Left);
        assert_eq!(t.last_spoken().as_deref(), Some("Meals, collapsed, 1 of 2, level 2"));
        assert_eq!(t.state(h).unwrap().source().item_count().unwrap(), 5);
    }

    #[test]
    fn right_expands_then_enters() {
        let mut t = TestEngine::new();
        let h = opened(&mut t);
        t.press_key(KeyInput::ctrl(KeyCode::End));
        t.press(KeyCode::Up);
        assert_eq!(t.last_spoken().as_deref(), Some("Weapons, collapsed, 2 of 3"));
        t.press(KeyCode::Right);
        assert_eq!(t.last_spoken().as_deref(), Some("Weapons, expanded, 2 of 3"));
        t.press(KeyCode::Right);
        assert_eq!(t.last_spoken().as_deref(), Some("Knife, 1 of 1, level 2"));
        assert_eq!(selected(&t, h), 6);
    }

    #[test]
    fn home_and_end_stay_among_siblings() {
        let mut t = TestEngine::new();
        let h = opened(&mut t);
        t.press(KeyCode::Down);
        t.press(KeyCode::Down);
        t.press(KeyCode::End);
        assert_eq!(selected(&t, h), 3);
        t.press(KeyCode::Home);
        assert_eq!(selected(&t, h), 2);

        // End on an expanded node dives to its last visible descendant.
        t.press_key(KeyInput::ctrl(KeyCode::Home));
        t.press(KeyCode::End);
        assert_eq!(selected(&t, h), 4);
    }

    #[test]
    fn enter_toggles_rows_without_actions() {
        let mut t = TestEngine::new();
        let h = opened(&mut t);
        t.press(KeyCode::Enter);
        assert_eq!(t.last_spoken().as_deref(), Some("Food, collapsed, 1 of 3"));
        assert_eq!(t.state(h).unwrap().source().item_count().unwrap(), 3);
    }

    /// A flat two-row tree whose backing store can go missing.
    struct Zones {
        lost: Rc<Cell<bool>>,
    }

    impl MenuSource for Zones {
        fn item_count(&self) -> Result<usize, NavError> {
            if self.lost.get() {
                return Err(NavError::source("Zones", "zone map unloaded"));
            }
            Ok(2)
        }

        fn label(&self, index: usize) -> Result<String, NavError> {
            Ok(format!("Zone {}", index + 1))
        }
    }

    impl TreeSource for Zones {
        fn indent_level(&self, _index: usize) -> Result<usize, NavError> {
            Ok(0)
        }

        fn is_expanded(&self, _index: usize) -> Result<bool, NavError> {
            Ok(false)
        }

        fn has_children(&self, _index: usize) -> Result<bool, NavError> {
            Ok(false)
        }

        fn set_expanded(&mut self, _index: usize, _expanded: bool) -> Result<(), NavError> {
            Ok(())
        }
    }

    #[test]
    fn source_failure_disables_tree() {
        let lost = Rc::new(Cell::new(false));
        let mut t = TestEngine::new();
        let h = t.register(
            StatePriority::overlay(0),
            TreeMenu::new("Zones", Zones { lost: lost.clone() }),
        );
        t.with_state(h, |m, cx| m.open(cx));
        assert_eq!(t.last_spoken().as_deref(), Some("Zone 1, 1 of 2"));

        lost.set(true);
        assert!(t.press(KeyCode::Down).is_consumed());
        assert_eq!(
            t.last_spoken().as_deref(),
            Some("Zones unavailable, feature disabled for this session")
        );
        assert!(t.state(h).unwrap().is_inert());
        assert_eq!(t.press(KeyCode::Down), earshot_core::Dispatch::PassThrough);

        lost.set(false);
        t.clear_spoken();
        t.with_state(h, |m, cx| m.open(cx));
        assert!(t.spoken().is_empty());
        assert!(!t.state(h).unwrap().is_open());
    }

    #[test]
    fn typeahead_finds_visible_rows() {
        let mut t = TestEngine::new();
        let h = opened(&mut t);
        t.type_text("ra");
        assert_eq!(selected(&t, h), 4);
        assert!(t.suppresses(HostDefault::Cancel));
        t.press(KeyCode::Esc);
        assert!(t.state(h).unwrap().is_open());
        t.press(KeyCode::Esc);
        assert!(!t.state(h).unwrap().is_open());
    }
}
