//! Two-level navigation: a list item's detail view.
//!
//! Any list item can be opened into a detail view laid out as
//!
//! ```text
//! position 0        header
//! position 1..=N    content lines
//! position N+1      button row (left/right moves between buttons)
//! ```
//!
//! N is the content-line count of the *current* item and is passed into
//! every call rather than cached, since items differ in length and the
//! underlying data may change between keystrokes.
//!
//! The navigator never runs side effects on its own. Buttons are command
//! objects ([`ButtonDescriptor`]) that the owning menu invokes after
//! [`TwoLevelNavigator::activate_current_button`] says it may.

use crate::config::NavConfig;
use crate::error::NavError;
use crate::selection::{self, position_suffix};
use std::fmt;

/// What a button action asks of its menu once it has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Keep the current position.
    #[default]
    Stay,
    /// Repopulate the buttons and re-announce; the item's state changed.
    Refresh,
    /// Close the whole menu.
    CloseMenu,
}

/// The side effect behind a button.
pub trait ButtonAction {
    fn invoke(&mut self) -> Result<ActionOutcome, NavError>;
}

impl<F: FnMut() -> Result<ActionOutcome, NavError>> ButtonAction for F {
    fn invoke(&mut self) -> Result<ActionOutcome, NavError> {
        self()
    }
}

/// A labelled action in a detail view's button row.
///
/// Built fresh by the menu's population callback every time a detail view is
/// entered, so it can be inspected in tests without running the action.
pub struct ButtonDescriptor {
    label: String,
    action: Box<dyn ButtonAction>,
    disabled: bool,
    disabled_reason: Option<String>,
}

impl ButtonDescriptor {
    /// An enabled button running a closure.
    pub fn new(
        label: impl Into<String>,
        action: impl FnMut() -> Result<ActionOutcome, NavError> + 'static,
    ) -> Self {
        Self::from_action(label, action)
    }

    /// An enabled button running any [`ButtonAction`].
    pub fn from_action(label: impl Into<String>, action: impl ButtonAction + 'static) -> Self {
        Self {
            label: label.into(),
            action: Box::new(action),
            disabled: false,
            disabled_reason: None,
        }
    }

    /// Mark the button disabled, with the reason spoken on activation.
    pub fn disabled(mut self, reason: impl Into<String>) -> Self {
        self.disabled = true;
        self.disabled_reason = Some(reason.into());
        self
    }

    /// Disable the button unless `enabled` holds.
    pub fn enabled_if(self, enabled: bool, reason: impl Into<String>) -> Self {
        if enabled {
            self
        } else {
            self.disabled(reason)
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled_reason.as_deref()
    }

    /// Run the action. Disabled state is the caller's concern.
    pub fn invoke(&mut self) -> Result<ActionOutcome, NavError> {
        self.action.invoke()
    }
}

impl fmt::Debug for ButtonDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonDescriptor")
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("disabled_reason", &self.disabled_reason)
            .finish_non_exhaustive()
    }
}

/// Where the cursor sits in a menu: list selection plus detail position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuPosition {
    pub selection_index: usize,
    /// 0 = header, `1..=N` = content line, `> N` = button row.
    pub detail_position: usize,
    pub button_index: usize,
}

/// The resolved meaning of the current detail position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPosition {
    Header,
    /// Zero-based content line.
    ContentLine(usize),
    /// Zero-based button.
    Button(usize),
}

/// Result of a navigation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The position changed; announce the new one.
    Moved,
    /// At a boundary; re-announce the current position.
    Stayed,
    /// The call does not apply in the current view.
    Inactive,
}

/// Result of [`TwoLevelNavigator::activate_current_button`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The button at this index may be invoked.
    Ready(usize),
    /// The button is disabled; speak this message instead.
    Disabled(String),
    /// The cursor is not on a button.
    NotOnButton,
}

/// Detail-view state machine for a single list item.
#[derive(Debug, Default)]
pub struct TwoLevelNavigator {
    in_detail: bool,
    detail_position: usize,
    button_index: usize,
    buttons: Vec<ButtonDescriptor>,
}

impl TwoLevelNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_detail_view(&self) -> bool {
        self.in_detail
    }

    pub fn detail_position(&self) -> usize {
        self.detail_position
    }

    pub fn button_index(&self) -> usize {
        self.button_index
    }

    pub fn buttons(&self) -> &[ButtonDescriptor] {
        &self.buttons
    }

    /// Snapshot of the cursor, paired with the caller's list selection.
    pub fn position(&self, selection_index: usize) -> MenuPosition {
        MenuPosition {
            selection_index,
            detail_position: self.detail_position,
            button_index: self.button_index,
        }
    }

    /// Open the detail view at the header with freshly populated buttons.
    pub fn enter_detail_view(&mut self, buttons: Vec<ButtonDescriptor>) {
        self.in_detail = true;
        self.detail_position = 0;
        self.button_index = 0;
        self.buttons = buttons;
    }

    /// Return to the list. Returns `false` if no detail view was open.
    ///
    /// The caller's list selection is untouched.
    pub fn go_back_to_list(&mut self) -> bool {
        if !self.in_detail {
            return false;
        }
        self.reset();
        true
    }

    /// Drop all detail state. Called when the menu closes or the list
    /// selection changes.
    pub fn reset(&mut self) {
        self.in_detail = false;
        self.detail_position = 0;
        self.button_index = 0;
        self.buttons.clear();
    }

    /// Replace the buttons after an action changed the item.
    pub fn refresh_buttons(&mut self, buttons: Vec<ButtonDescriptor>, line_count: usize) {
        self.buttons = buttons;
        if self.buttons.is_empty() {
            self.button_index = 0;
            self.clamp(line_count);
        } else {
            self.button_index = self.button_index.min(self.buttons.len() - 1);
        }
    }

    pub fn in_button_row(&self, line_count: usize) -> bool {
        self.in_detail && !self.buttons.is_empty() && self.detail_position > line_count
    }

    /// Resolve the current position against the item's line count.
    pub fn current(&self, line_count: usize) -> Option<DetailPosition> {
        if !self.in_detail {
            return None;
        }
        Some(if self.detail_position == 0 {
            DetailPosition::Header
        } else if self.detail_position <= line_count {
            DetailPosition::ContentLine(self.detail_position - 1)
        } else if !self.buttons.is_empty() {
            DetailPosition::Button(self.button_index.min(self.buttons.len() - 1))
        } else if line_count > 0 {
            DetailPosition::ContentLine(line_count - 1)
        } else {
            DetailPosition::Header
        })
    }

    /// Pull a position that drifted past the end back into range.
    fn clamp(&mut self, line_count: usize) {
        if self.detail_position > line_count {
            if self.buttons.is_empty() {
                self.detail_position = line_count;
            } else {
                self.detail_position = line_count + 1;
                self.button_index = self.button_index.min(self.buttons.len() - 1);
            }
        }
    }

    /// Move down one position.
    ///
    /// In the button row this only re-announces; left/right move between
    /// buttons.
    pub fn select_next_detail_position(&mut self, line_count: usize) -> Step {
        if !self.in_detail {
            return Step::Inactive;
        }
        self.clamp(line_count);
        if self.in_button_row(line_count) {
            return Step::Stayed;
        }
        if self.detail_position < line_count {
            self.detail_position += 1;
            Step::Moved
        } else if !self.buttons.is_empty() {
            self.detail_position = line_count + 1;
            self.button_index = 0;
            Step::Moved
        } else {
            Step::Stayed
        }
    }

    /// Move up one position. From the button row, exit to the last content
    /// line.
    pub fn select_previous_detail_position(&mut self, line_count: usize) -> Step {
        if !self.in_detail {
            return Step::Inactive;
        }
        self.clamp(line_count);
        if self.in_button_row(line_count) {
            self.detail_position = line_count;
            return Step::Moved;
        }
        if self.detail_position == 0 {
            Step::Stayed
        } else {
            self.detail_position -= 1;
            Step::Moved
        }
    }

    pub fn select_next_button(&mut self, line_count: usize, wrap: bool) -> Step {
        if !self.in_button_row(line_count) {
            return Step::Inactive;
        }
        let next = selection::select_next(self.button_index, self.buttons.len(), wrap);
        self.move_button(next)
    }

    pub fn select_previous_button(&mut self, line_count: usize, wrap: bool) -> Step {
        if !self.in_button_row(line_count) {
            return Step::Inactive;
        }
        let previous = selection::select_previous(self.button_index, self.buttons.len(), wrap);
        self.move_button(previous)
    }

    fn move_button(&mut self, index: usize) -> Step {
        if index == self.button_index {
            Step::Stayed
        } else {
            self.button_index = index;
            Step::Moved
        }
    }

    /// Check whether the focused button may run.
    pub fn activate_current_button(&self, line_count: usize) -> Activation {
        let Some(DetailPosition::Button(index)) = self.current(line_count) else {
            return Activation::NotOnButton;
        };
        let button = &self.buttons[index];
        if button.is_disabled() {
            let message = match button.disabled_reason() {
                Some(reason) => format!("{} unavailable: {}", button.label(), reason),
                None => format!("{} unavailable", button.label()),
            };
            Activation::Disabled(message)
        } else {
            Activation::Ready(index)
        }
    }

    /// Run the button at `index`.
    pub fn invoke_button(&mut self, index: usize) -> Result<ActionOutcome, NavError> {
        let button = self
            .buttons
            .get_mut(index)
            .ok_or_else(|| NavError::State(format!("no button at index {index}")))?;
        tracing::debug!(label = %button.label(), "invoking detail button");
        button.invoke()
    }

    /// Jump to the header.
    pub fn jump_to_detail_start(&mut self) -> Step {
        if !self.in_detail {
            return Step::Inactive;
        }
        if self.detail_position == 0 {
            return Step::Stayed;
        }
        self.detail_position = 0;
        self.button_index = 0;
        Step::Moved
    }

    /// Jump to the first button, or the last content line when there are no
    /// buttons.
    pub fn jump_to_detail_end(&mut self, line_count: usize) -> Step {
        if !self.in_detail {
            return Step::Inactive;
        }
        let (position, button) = if self.buttons.is_empty() {
            (line_count, 0)
        } else {
            (line_count + 1, 0)
        };
        if (position, button) == (self.detail_position, self.button_index) {
            return Step::Stayed;
        }
        self.detail_position = position;
        self.button_index = button;
        Step::Moved
    }

    /// Announcement text for the current position.
    ///
    /// `header` is spoken as-is at position 0; content lines and buttons get
    /// an "X of Y" suffix when the config asks for it.
    pub fn describe(&self, header: &str, lines: &[String], config: &NavConfig) -> Option<String> {
        Some(match self.current(lines.len())? {
            DetailPosition::Header => header.to_string(),
            DetailPosition::ContentLine(i) => format!(
                "{}{}",
                lines[i],
                position_suffix(i, lines.len(), config)
            ),
            DetailPosition::Button(i) => {
                let button = &self.buttons[i];
                let mut text = format!(
                    "{} button{}",
                    button.label(),
                    position_suffix(i, self.buttons.len(), config)
                );
                if button.is_disabled() {
                    text.push_str(", unavailable");
                    if let Some(reason) = button.disabled_reason() {
                        text.push_str(": ");
                        text.push_str(reason);
                    }
                }
                text
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn noop(label: &str) -> ButtonDescriptor {
        ButtonDescriptor::new(label, || Ok(ActionOutcome::Stay))
    }

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    fn in_detail(buttons: usize) -> TwoLevelNavigator {
        let mut nav = TwoLevelNavigator::new();
        nav.enter_detail_view((0..buttons).map(|i| noop(&format!("b{i}"))).collect());
        nav
    }

    #[test]
    fn walks_header_lines_then_buttons() {
        let mut nav = in_detail(2);
        assert_eq!(nav.detail_position(), 0);
        for expected in 1..=4 {
            assert_eq!(nav.select_next_detail_position(3), Step::Moved);
            assert_eq!(nav.detail_position(), expected);
        }
        assert_eq!(nav.current(3), Some(DetailPosition::Button(0)));

        // A fifth step only re-announces.
        assert_eq!(nav.select_next_detail_position(3), Step::Stayed);
        assert_eq!(nav.detail_position(), 4);
        assert_eq!(nav.button_index(), 0);
    }

    #[test]
    fn no_buttons_stops_at_last_line() {
        let mut nav = in_detail(0);
        nav.select_next_detail_position(2);
        nav.select_next_detail_position(2);
        assert_eq!(nav.select_next_detail_position(2), Step::Stayed);
        assert_eq!(nav.current(2), Some(DetailPosition::ContentLine(1)));
    }

    #[test]
    fn entering_button_row_resets_button_index() {
        let mut nav = in_detail(3);
        nav.jump_to_detail_end(1);
        nav.select_next_button(1, false);
        assert_eq!(nav.button_index(), 1);
        nav.select_previous_detail_position(1);
        nav.select_next_detail_position(1);
        assert_eq!(nav.button_index(), 0);
    }

    #[test]
    fn previous_from_buttons_exits_to_last_line() {
        let mut nav = in_detail(2);
        nav.jump_to_detail_end(3);
        nav.select_next_button(3, false);
        assert_eq!(nav.select_previous_detail_position(3), Step::Moved);
        assert_eq!(nav.current(3), Some(DetailPosition::ContentLine(2)));
    }

    #[test]
    fn previous_from_buttons_without_lines_goes_to_header() {
        let mut nav = in_detail(1);
        nav.select_next_detail_position(0);
        assert!(nav.in_button_row(0));
        nav.select_previous_detail_position(0);
        assert_eq!(nav.current(0), Some(DetailPosition::Header));
    }

    #[test]
    fn previous_floors_at_header() {
        let mut nav = in_detail(0);
        assert_eq!(nav.select_previous_detail_position(3), Step::Stayed);
        assert_eq!(nav.detail_position(), 0);
    }

    #[test]
    fn button_row_without_wrap_stays_put() {
        let mut nav = in_detail(3);
        nav.jump_to_detail_end(2);
        assert_eq!(nav.select_previous_button(2, false), Step::Stayed);
        assert_eq!(nav.button_index(), 0);
    }

    #[test]
    fn button_row_with_wrap_moves_to_last() {
        let mut nav = in_detail(3);
        nav.jump_to_detail_end(2);
        assert_eq!(nav.select_previous_button(2, true), Step::Moved);
        assert_eq!(nav.button_index(), 2);
        assert_eq!(nav.select_next_button(2, true), Step::Moved);
        assert_eq!(nav.button_index(), 0);
    }

    #[test]
    fn button_moves_outside_row_are_inactive() {
        let mut nav = in_detail(2);
        assert_eq!(nav.select_next_button(3, true), Step::Inactive);
        let mut closed = TwoLevelNavigator::new();
        assert_eq!(closed.select_next_detail_position(3), Step::Inactive);
        assert!(!closed.go_back_to_list());
    }

    #[test]
    fn jumps() {
        let mut nav = in_detail(2);
        assert_eq!(nav.jump_to_detail_end(3), Step::Moved);
        assert_eq!(nav.detail_position(), 4);
        assert_eq!(nav.jump_to_detail_start(), Step::Moved);
        assert_eq!(nav.detail_position(), 0);

        let mut plain = in_detail(0);
        plain.jump_to_detail_end(3);
        assert_eq!(plain.current(3), Some(DetailPosition::ContentLine(2)));
        assert_eq!(plain.jump_to_detail_end(3), Step::Stayed);
    }

    #[test]
    fn disabled_button_reports_reason() {
        let mut nav = TwoLevelNavigator::new();
        nav.enter_detail_view(vec![noop("Sell").disabled("no buyer")]);
        nav.jump_to_detail_end(0);
        assert_eq!(
            nav.activate_current_button(0),
            Activation::Disabled("Sell unavailable: no buyer".into())
        );
    }

    #[test]
    fn ready_button_runs_its_action() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut nav = TwoLevelNavigator::new();
        nav.enter_detail_view(vec![ButtonDescriptor::new("Buy", move || {
            counter.set(counter.get() + 1);
            Ok(ActionOutcome::Refresh)
        })]);
        assert_eq!(nav.activate_current_button(0), Activation::NotOnButton);
        nav.jump_to_detail_end(0);
        let Activation::Ready(index) = nav.activate_current_button(0) else {
            panic!("expected a ready button");
        };
        assert_eq!(nav.invoke_button(index).unwrap(), ActionOutcome::Refresh);
        assert_eq!(count.get(), 1);
        assert!(nav.invoke_button(5).is_err());
    }

    #[test]
    fn go_back_clears_detail_state() {
        let mut nav = in_detail(2);
        nav.jump_to_detail_end(1);
        assert!(nav.go_back_to_list());
        assert!(!nav.is_in_detail_view());
        assert_eq!(nav.position(3), MenuPosition {
            selection_index: 3,
            detail_position: 0,
            button_index: 0,
        });
        assert!(nav.buttons().is_empty());
    }

    #[test]
    fn shrinking_content_is_clamped() {
        let mut nav = in_detail(0);
        for _ in 0..5 {
            nav.select_next_detail_position(5);
        }
        // The item now has only two lines.
        assert_eq!(nav.current(2), Some(DetailPosition::ContentLine(1)));
        assert_eq!(nav.select_previous_detail_position(2), Step::Moved);
        assert_eq!(nav.current(2), Some(DetailPosition::ContentLine(0)));
    }

    #[test]
    fn refresh_buttons_clamps_index() {
        let mut nav = in_detail(3);
        nav.jump_to_detail_end(1);
        nav.select_previous_button(1, true);
        assert_eq!(nav.button_index(), 2);
        nav.refresh_buttons(vec![noop("only")], 1);
        assert_eq!(nav.button_index(), 0);
        nav.refresh_buttons(Vec::new(), 1);
        assert_eq!(nav.current(1), Some(DetailPosition::ContentLine(0)));
    }

    #[test]
    fn describes_each_position() {
        let config = NavConfig::default();
        let lines = lines(2);
        let mut nav = TwoLevelNavigator::new();
        nav.enter_detail_view(vec![noop("Sell"), noop("Drop").disabled("forbidden")]);
        assert_eq!(nav.describe("Wood", &lines, &config).as_deref(), Some("Wood"));
        nav.select_next_detail_position(2);
        assert_eq!(
            nav.describe("Wood", &lines, &config).as_deref(),
            Some("line 1, 1 of 2")
        );
        nav.jump_to_detail_end(2);
        nav.select_next_button(2, false);
        assert_eq!(
            nav.describe("Wood", &lines, &config).as_deref(),
            Some("Drop button, 2 of 2, unavailable: forbidden")
        );
    }

    #[test]
    fn debug_omits_action() {
        let text = format!("{:?}", noop("Sell"));
        assert!(text.contains("Sell"));
    }
}
