//! A generic list menu with typeahead, quantity entry and a detail view.
//!
//! Up/Down move through the items, typing letters searches their labels,
//! Enter opens the detail view (header, content lines, then a row of action
//! buttons) and Escape backs out one level at a time: first the search, then
//! the detail view, then the menu itself.

use crate::common::{self, Typed};
use crate::key::{KeyMap, MenuKeyBindings};
use crate::source::MenuSource;
use earshot_core::selection::{clamp_index, select_next, select_previous};
use earshot_core::{
    ActionOutcome, Activation, HostDefault, HostWindow, KeyInput, MenuPosition, NavContext, NavError,
    NavigationState, NumericEntry, Step, TwoLevelNavigator, TypeaheadSearch,
};

/// A keyboard-navigable list over a [`MenuSource`].
///
/// # Example
///
/// ```ignore
/// let trade = engine.register(
///     StatePriority::overlay(10),
///     ListMenu::new("Trade", TradeSource::new(colony)),
/// );
/// engine.with_state(trade, |menu, cx| menu.open(cx));
/// ```
pub struct ListMenu<S> {
    title: String,
    source: S,
    open: bool,
    inert: bool,
    selected: usize,
    search: TypeaheadSearch,
    quantity: NumericEntry,
    detail: Option<TwoLevelNavigator>,
    header: String,
    lines: Vec<String>,
    bindings: MenuKeyBindings,
    window: Option<Box<dyn HostWindow>>,
}

impl<S: MenuSource + 'static> ListMenu<S> {
    pub fn new(title: impl Into<String>, source: S) -> Self {
        Self {
            title: title.into(),
            source,
            open: false,
            inert: false,
            selected: 0,
            search: TypeaheadSearch::new(),
            quantity: NumericEntry::new(),
            detail: Some(TwoLevelNavigator::new()),
            header: String::new(),
            lines: Vec::new(),
            bindings: MenuKeyBindings::default(),
            window: None,
        }
    }

    /// A menu whose items have no detail view. Enter only activates.
    pub fn without_detail(mut self) -> Self {
        self.detail = None;
        self
    }

    pub fn with_bindings(mut self, bindings: MenuKeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Tie the menu to a host window: it stops handling keys once the
    /// window closes, and closes the window when an action asks to.
    pub fn with_window(mut self, window: impl HostWindow + 'static) -> Self {
        self.window = Some(Box::new(window));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a source failure disabled the menu for the session.
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn search(&self) -> &TypeaheadSearch {
        &self.search
    }

    pub fn in_detail_view(&self) -> bool {
        self.detail
            .as_ref()
            .is_some_and(TwoLevelNavigator::is_in_detail_view)
    }

    pub fn position(&self) -> MenuPosition {
        match &self.detail {
            Some(detail) => detail.position(self.selected),
            None => MenuPosition {
                selection_index: self.selected,
                ..MenuPosition::default()
            },
        }
    }

    /// Open at the first item and announce the menu.
    pub fn open(&mut self, cx: &mut NavContext<'_>) {
        if self.inert {
            tracing::debug!(menu = %self.title, "open ignored, menu disabled");
            return;
        }
        self.search.set_timeout(cx.config().typeahead_timeout());
        self.quantity.set_timeout(cx.config().numeric_timeout());
        self.reset_transient();
        self.selected = 0;
        self.open = true;
        tracing::debug!(menu = %self.title, "menu opened");
        cx.interrupt(&self.title);
        match self.item_text(cx) {
            Ok(text) => cx.queue(&text),
            Err(err) => self.disable(&err, cx),
        }
    }

    /// Re-read the source after the host changed the data.
    ///
    /// Keeps the selection (clamped) and, in the detail view, the cursor.
    /// If the selected item is gone the detail view closes and the new
    /// selection is announced.
    pub fn refresh(&mut self, cx: &mut NavContext<'_>) {
        if !self.open {
            return;
        }
        let result = match self.reload() {
            Ok(true) => self.announce_item(cx).map(|_| ()),
            Ok(false) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            self.disable(&err, cx);
        }
    }

    fn reset_transient(&mut self) {
        self.search.clear();
        self.quantity.clear();
        self.leave_detail();
    }

    fn leave_detail(&mut self) {
        self.header.clear();
        self.lines.clear();
        if let Some(detail) = &mut self.detail {
            detail.reset();
        }
    }

    /// Clamp the selection to the current item count. Returns true when that
    /// moved the selection out from under an open detail view, which is then
    /// closed.
    fn clamp_selection(&mut self) -> Result<bool, NavError> {
        let count = self.source.item_count()?;
        let previous = self.selected;
        self.selected = clamp_index(self.selected, count).unwrap_or(0);
        if (self.selected != previous || count == 0) && self.in_detail_view() {
            tracing::debug!(menu = %self.title, previous, selected = self.selected, "selected item gone, leaving detail view");
            self.leave_detail();
            return Ok(true);
        }
        Ok(false)
    }

    fn disable(&mut self, err: &NavError, cx: &mut NavContext<'_>) {
        self.inert = true;
        self.open = false;
        self.reset_transient();
        common::announce_disabled(&self.title, err, cx);
    }

    fn labels(&self) -> Result<Vec<String>, NavError> {
        (0..self.source.item_count()?)
            .map(|i| self.source.label(i))
            .collect()
    }

    fn item_text(&self, cx: &NavContext<'_>) -> Result<String, NavError> {
        let count = self.source.item_count()?;
        let index = clamp_index(self.selected, count).unwrap_or(0);
        let label = match count {
            0 => None,
            _ => Some(self.source.label(index)?),
        };
        Ok(common::item_announcement(label.as_deref(), index, count, cx.config()))
    }

    fn announce_item(&self, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        let text = self.item_text(cx)?;
        cx.interrupt(&text);
        Ok(true)
    }

    fn announce_detail(&self, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        let text = self
            .detail
            .as_ref()
            .and_then(|d| d.describe(&self.header, &self.lines, cx.config()));
        match text {
            Some(text) => cx.interrupt(&text),
            None => return self.announce_item(cx),
        }
        Ok(true)
    }

    fn select(&mut self, index: usize, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        self.selected = index;
        self.quantity.clear();
        self.announce_item(cx)
    }

    /// Re-read the source. Returns true when the detail view had to close
    /// because its item is gone.
    fn reload(&mut self) -> Result<bool, NavError> {
        let left_detail = self.clamp_selection()?;
        self.search.clear();
        if !self.in_detail_view() {
            return Ok(left_detail);
        }
        self.header = self.source.label(self.selected)?;
        self.lines = self.source.content_lines(self.selected)?;
        let buttons = self.source.populate_buttons(self.selected)?;
        if let Some(detail) = &mut self.detail {
            detail.refresh_buttons(buttons, self.lines.len());
        }
        Ok(false)
    }

    /// Close the menu and ask the host to close the window it shadows.
    fn dismiss(&mut self, cx: &mut NavContext<'_>) {
        if let Some(window) = &mut self.window {
            if let Err(err) = window.request_close() {
                tracing::warn!(menu = %self.title, error = %err, "host window refused to close");
            }
        }
        self.close(cx);
    }

    fn apply_outcome(&mut self, outcome: ActionOutcome, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        tracing::debug!(menu = %self.title, ?outcome, "action finished");
        match outcome {
            ActionOutcome::Stay => {}
            ActionOutcome::Refresh => {
                self.reload()?;
            }
            ActionOutcome::CloseMenu => {
                self.dismiss(cx);
                return Ok(true);
            }
        }
        if self.in_detail_view() {
            self.announce_detail(cx)
        } else {
            self.announce_item(cx)
        }
    }

    fn enter_detail(&mut self, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        self.header = self.source.label(self.selected)?;
        self.lines = self.source.content_lines(self.selected)?;
        let buttons = self.source.populate_buttons(self.selected)?;
        self.search.clear();
        self.quantity.clear();
        let Some(detail) = &mut self.detail else {
            return self.announce_item(cx);
        };
        detail.enter_detail_view(buttons);
        self.announce_detail(cx)
    }

    fn route(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        if self.bindings.help.matches(key) {
            cx.interrupt(&self.bindings.help_announcement());
            return Ok(true);
        }
        if self.clamp_selection()? {
            // The key was meant for an item that no longer exists.
            return self.announce_item(cx);
        }
        if self.in_detail_view() {
            self.handle_detail(key, cx)
        } else {
            self.handle_list(key, cx)
        }
    }

    fn handle_detail(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        let line_count = self.lines.len();
        let wrap = cx.wrap();
        let b = &self.bindings;
        let Some(detail) = self.detail.as_mut() else {
            return Ok(false);
        };

        if b.back.matches(key) {
            detail.go_back_to_list();
            self.lines.clear();
            return self.announce_item(cx);
        }
        if b.activate.matches(key) {
            return match detail.activate_current_button(line_count) {
                Activation::Ready(index) => self.run_button(index, cx),
                Activation::Disabled(message) => {
                    cx.interrupt(&message);
                    Ok(true)
                }
                Activation::NotOnButton => self.announce_detail(cx),
            };
        }

        let step = if b.next.matches(key) {
            detail.select_next_detail_position(line_count)
        } else if b.previous.matches(key) {
            detail.select_previous_detail_position(line_count)
        } else if b.next_button.matches(key) {
            detail.select_next_button(line_count, wrap)
        } else if b.previous_button.matches(key) {
            detail.select_previous_button(line_count, wrap)
        } else if b.first.matches(key) || b.top.matches(key) {
            detail.jump_to_detail_start()
        } else if b.last.matches(key) || b.bottom.matches(key) {
            detail.jump_to_detail_end(line_count)
        } else {
            return Ok(false);
        };
        if step == Step::Stayed {
            tracing::trace!(menu = %self.title, "detail boundary");
        }
        self.announce_detail(cx)
    }

    fn run_button(&mut self, index: usize, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        let Some(detail) = self.detail.as_mut() else {
            return Ok(false);
        };
        match detail.invoke_button(index) {
            Ok(outcome) => self.apply_outcome(outcome, cx),
            Err(err) => {
                common::announce_action_failure(&self.title, &err, cx);
                Ok(true)
            }
        }
    }

    fn handle_list(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        if self.bindings.back.matches(key) {
            if self.search.is_active() {
                self.search.clear();
                cx.interrupt("Search cleared");
            } else if self.quantity.is_active() {
                self.quantity.clear();
                cx.interrupt("Quantity entry cleared");
            } else {
                self.close(cx);
            }
            return Ok(true);
        }

        let count = self.source.item_count()?;
        let wrap = cx.wrap();
        let b = &self.bindings;

        if b.next.matches(key) || b.previous.matches(key) {
            let forward = b.next.matches(key);
            if count == 0 {
                return self.announce_item(cx);
            }
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
        if b.first.matches(key) || b.top.matches(key) {
            self.search.clear();
            return self.select(0, cx);
        }
        if b.last.matches(key) || b.bottom.matches(key) {
            self.search.clear();
            return self.select(count.saturating_sub(1), cx);
        }
        if b.activate.matches(key) {
            if count == 0 {
                return self.announce_item(cx);
            }
            return match self.source.activate(self.selected) {
                Ok(Some(outcome)) => self.apply_outcome(outcome, cx),
                Ok(None) => self.enter_detail(cx),
                Err(err) => {
                    common::announce_action_failure(&self.title, &err, cx);
                    Ok(true)
                }
            };
        }
        if b.erase.matches(key) {
            return self.erase(cx);
        }

        let Some(c) = key.typed_char() else {
            return Ok(false);
        };
        if count == 0 {
            return self.announce_item(cx);
        }
        if c.is_ascii_digit() && !self.search.is_active() && self.source.accepts_quantity(self.selected) {
            return self.enter_digit(c, cx);
        }
        let labels = self.labels()?;
        match common::type_char(&mut self.search, c, &labels, self.selected) {
            Typed::Jump(index) => self.select(index, cx),
            Typed::NoMatch(attempt) => {
                cx.interrupt(&format!("No matches for {attempt}"));
                Ok(true)
            }
        }
    }

    fn erase(&mut self, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        if self.quantity.is_active() {
            match self.quantity.backspace() {
                Some(value) => self.apply_quantity(value, cx),
                None => cx.interrupt("Quantity entry cleared"),
            }
            return Ok(true);
        }
        if !self.search.is_active() {
            return Ok(false);
        }
        let labels = self.labels()?;
        match self.search.process_backspace(&labels, self.selected) {
            Some(index) => {
                self.selected = index;
                let text = self.item_text(cx)?;
                cx.interrupt(&format!("Search {}, {}", self.search.buffer(), text));
            }
            None => cx.interrupt("Search cleared"),
        }
        Ok(true)
    }

    fn enter_digit(&mut self, digit: char, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        if let Some(value) = self.quantity.push_digit(digit) {
            self.apply_quantity(value, cx);
        }
        Ok(true)
    }

    fn apply_quantity(&mut self, value: u32, cx: &mut NavContext<'_>) {
        match self.source.set_quantity(self.selected, value) {
            Ok(()) => cx.interrupt(&format!("Quantity {value}")),
            Err(err) => common::announce_action_failure(&self.title, &err, cx),
        }
    }
}

impl<S: MenuSource + 'static> NavigationState for ListMenu<S> {
    fn name(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.open && !self.inert && self.window.as_ref().is_none_or(|w| w.is_open())
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
        self.reset_transient();
        tracing::debug!(menu = %self.title, "menu closed");
        cx.queue(&format!("{} closed", self.title));
    }

    fn claims_host_default(&self, kind: HostDefault) -> bool {
        match kind {
            HostDefault::Cancel => {
                self.search.is_active() || self.quantity.is_active() || self.in_detail_view()
            }
            HostDefault::Accept => true,
        }
    }
}
