//! A modal dialog for picking a number within a range.

use crate::common;
use crate::key::{Binding, KeyCombination, KeyMap};
use crossterm::event::KeyCode;
use earshot_core::{HostDefault, KeyInput, NavContext, NavError, NavigationState, NumericEntry};

type ConfirmFn = Box<dyn FnMut(u32) -> Result<(), NavError>>;

/// Bindings for [`QuantityMenu`].
#[derive(Debug, Clone)]
pub struct QuantityKeyBindings {
    /// Default: Up
    pub increment: Binding,
    /// Default: Down
    pub decrement: Binding,
    /// Default: Shift+Up, Page Up
    pub increment_large: Binding,
    /// Default: Shift+Down, Page Down
    pub decrement_large: Binding,
    /// Default: Home
    pub minimum: Binding,
    /// Default: End
    pub maximum: Binding,
    /// Default: Enter
    pub confirm: Binding,
    /// Default: Escape
    pub cancel: Binding,
    /// Default: Backspace
    pub erase: Binding,
    /// Default: F1
    pub help: Binding,
}

impl Default for QuantityKeyBindings {
    fn default() -> Self {
        Self {
            increment: Binding::new(KeyCombination::new(KeyCode::Up), "Increase by one"),
            decrement: Binding::new(KeyCombination::new(KeyCode::Down), "Decrease by one"),
            increment_large: Binding::with_keys(
                vec![
                    KeyCombination::shift(KeyCode::Up),
                    KeyCombination::new(KeyCode::PageUp),
                ],
                "Increase by ten",
            ),
            decrement_large: Binding::with_keys(
                vec![
                    KeyCombination::shift(KeyCode::Down),
                    KeyCombination::new(KeyCode::PageDown),
                ],
                "Decrease by ten",
            ),
            minimum: Binding::new(KeyCombination::new(KeyCode::Home), "Minimum"),
            maximum: Binding::new(KeyCombination::new(KeyCode::End), "Maximum"),
            confirm: Binding::new(KeyCombination::new(KeyCode::Enter), "Confirm"),
            cancel: Binding::new(KeyCombination::new(KeyCode::Esc), "Cancel"),
            erase: Binding::new(KeyCombination::new(KeyCode::Backspace), "Erase digit"),
            help: Binding::new(KeyCombination::new(KeyCode::F(1)), "Help"),
        }
    }
}

impl KeyMap for QuantityKeyBindings {
    fn help(&self) -> Vec<&Binding> {
        vec![
            &self.increment,
            &self.decrement,
            &self.increment_large,
            &self.decrement_large,
            &self.minimum,
            &self.maximum,
            &self.confirm,
            &self.cancel,
        ]
    }
}

/// Pick a count with arrows or by typing digits, then confirm with Enter.
///
/// While open the dialog owns both Escape and Enter, so the host's own
/// cancel/accept never fires underneath it.
///
/// ```ignore
/// let pod = engine.register(
///     StatePriority::blocking(10),
///     QuantityMenu::new("Load count", move |n| load.borrow_mut().set_count(n)),
/// );
/// engine.with_state(pod, |q, cx| q.open(1, 0, 75, cx));
/// ```
pub struct QuantityMenu {
    title: String,
    open: bool,
    value: u32,
    min: u32,
    max: u32,
    entry: NumericEntry,
    on_confirm: ConfirmFn,
    bindings: QuantityKeyBindings,
}

impl QuantityMenu {
    pub fn new(title: impl Into<String>, on_confirm: impl FnMut(u32) -> Result<(), NavError> + 'static) -> Self {
        Self {
            title: title.into(),
            open: false,
            value: 0,
            min: 0,
            max: u32::MAX,
            entry: NumericEntry::new(),
            on_confirm: Box::new(on_confirm),
            bindings: QuantityKeyBindings::default(),
        }
    }

    pub fn with_bindings(mut self, bindings: QuantityKeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn range(&self) -> (u32, u32) {
        (self.min, self.max)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open with `initial` clamped into `min..=max`.
    pub fn open(&mut self, initial: u32, min: u32, max: u32, cx: &mut NavContext<'_>) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = min;
        self.max = max;
        self.value = initial.clamp(min, max);
        self.entry.set_timeout(cx.config().numeric_timeout());
        self.entry.clear();
        self.open = true;
        cx.interrupt(&format!("{}, {}, range {} to {}", self.title, self.value, min, max));
    }

    fn set(&mut self, value: u32, cx: &mut NavContext<'_>) {
        let clamped = value.clamp(self.min, self.max);
        if clamped == self.value && clamped != value {
            tracing::trace!(value, "quantity at limit");
        }
        self.value = clamped;
        cx.interrupt(&self.value.to_string());
    }

    fn confirm(&mut self, cx: &mut NavContext<'_>) {
        let value = self.value;
        match (self.on_confirm)(value) {
            Ok(()) => {
                tracing::debug!(dialog = %self.title, value, "quantity confirmed");
                self.open = false;
                self.entry.clear();
                cx.interrupt(&format!("{} set to {}", self.title, value));
            }
            Err(err) => common::announce_action_failure(&self.title, &err, cx),
        }
    }
}

impl NavigationState for QuantityMenu {
    fn name(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.open
    }

    fn handle_input(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
        let b = &self.bindings;
        if b.help.matches(key) {
            cx.interrupt(&b.help_announcement());
            return Ok(true);
        }
        if b.cancel.matches(key) {
            self.close(cx);
            return Ok(true);
        }
        if b.confirm.matches(key) {
            self.confirm(cx);
            return Ok(true);
        }

        let step = if b.increment.matches(key) {
            Some(self.value.saturating_add(1))
        } else if b.decrement.matches(key) {
            Some(self.value.saturating_sub(1))
        } else if b.increment_large.matches(key) {
            Some(self.value.saturating_add(10))
        } else if b.decrement_large.matches(key) {
            Some(self.value.saturating_sub(10))
        } else if b.minimum.matches(key) {
            Some(self.min)
        } else if b.maximum.matches(key) {
            Some(self.max)
        } else {
            None
        };
        if let Some(value) = step {
            self.entry.clear();
            self.set(value, cx);
            return Ok(true);
        }

        if b.erase.matches(key) {
            // Without typed digits there is nothing to erase.
            let erased = if self.entry.is_active() { self.entry.backspace() } else { None };
            match erased {
                Some(value) => self.set(value, cx),
                None => cx.interrupt(&self.value.to_string()),
            }
            return Ok(true);
        }
        if let Some(digit) = key.typed_char().filter(char::is_ascii_digit) {
            if let Some(value) = self.entry.push_digit(digit) {
                self.set(value, cx);
            }
            return Ok(true);
        }
        // Modal: nothing leaks to the states and host underneath.
        Ok(true)
    }

    fn close(&mut self, cx: &mut NavContext<'_>) {
        if !self.open {
            return;
        }
        self.open = false;
        self.entry.clear();
        cx.queue(&format!("{} cancelled", self.title));
    }

    fn claims_host_default(&self, _kind: HostDefault) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earshot_core::testing::TestEngine;
    use earshot_core::{StateHandle, StatePriority};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn dialog(t: &mut TestEngine, confirmed: Rc<RefCell<Vec<u32>>>) -> StateHandle<QuantityMenu> {
        let handle = t.register(
            StatePriority::blocking(0),
            QuantityMenu::new("Load count", move |n| {
                if n == 13 {
                    return Err(NavError::action("Load", "pod is jammed"));
                }
                confirmed.borrow_mut().push(n);
                Ok(())
            }),
        );
        t.with_state(handle, |q, cx| q.open(5, 1, 40, cx));
        handle
    }

    #[test]
    fn opens_with_value_and_range() {
        let mut t = TestEngine::new();
        dialog(&mut t, Rc::default());
        assert_eq!(t.last_spoken().as_deref(), Some("Load count, 5, range 1 to 40"));
        assert!(t.suppresses(HostDefault::Cancel));
        assert!(t.suppresses(HostDefault::Accept));
    }

    #[test]
    fn arrows_step_and_clamp() {
        let mut t = TestEngine::new();
        let q = dialog(&mut t, Rc::default());
        t.press(KeyCode::Up);
        assert_eq!(t.last_spoken().as_deref(), Some("6"));
        t.press_key(KeyInput::shift(KeyCode::Up));
        assert_eq!(t.state(q).unwrap().value(), 16);
        t.press(KeyCode::End);
        t.press(KeyCode::Up);
        assert_eq!(t.state(q).unwrap().value(), 40);
        t.press(KeyCode::Home);
        t.press(KeyCode::PageDown);
        assert_eq!(t.state(q).unwrap().value(), 1);
    }

    #[test]
    fn typed_digits_replace_value() {
        let mut t = TestEngine::new();
        let confirmed = Rc::new(RefCell::new(Vec::new()));
        let q = dialog(&mut t, confirmed.clone());
        t.type_text("25");
        assert_eq!(t.state(q).unwrap().value(), 25);
        t.type_text("0");
        assert_eq!(t.state(q).unwrap().value(), 40);
        t.press(KeyCode::Backspace);
        assert_eq!(t.state(q).unwrap().value(), 25);
        t.press(KeyCode::Enter);
        assert_eq!(*confirmed.borrow(), vec![25]);
        assert_eq!(t.last_spoken().as_deref(), Some("Load count set to 25"));
        assert!(!t.state(q).unwrap().is_open());
    }

    #[test]
    fn backspace_without_digits_keeps_value() {
        let mut t = TestEngine::new();
        let q = dialog(&mut t, Rc::default());
        t.press(KeyCode::Up);
        t.press(KeyCode::Up);
        t.press(KeyCode::Backspace);
        assert_eq!(t.state(q).unwrap().value(), 7);
        assert_eq!(t.last_spoken().as_deref(), Some("7"));
    }

    #[test]
    fn failed_confirm_keeps_dialog_open() {
        let mut t = TestEngine::new();
        let q = dialog(&mut t, Rc::default());
        t.type_text("13");
        t.press(KeyCode::Enter);
        assert_eq!(
            t.last_spoken().as_deref(),
            Some("Action failed: Load failed: pod is jammed")
        );
        assert!(t.state(q).unwrap().is_open());
        t.press(KeyCode::Esc);
        assert_eq!(t.last_spoken().as_deref(), Some("Load count cancelled"));
        assert!(!t.suppresses(HostDefault::Accept));
    }

    #[test]
    fn swallows_unrelated_keys_while_open() {
        let mut t = TestEngine::new();
        dialog(&mut t, Rc::default());
        assert!(t.press(KeyCode::Char('x')).is_consumed());
        assert!(t.press(KeyCode::Tab).is_consumed());
    }
}
