//! Key events as the engine sees them.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// A single key-down delivered to the engine.
///
/// The engine never receives key-up. Modifier state is flattened into three
/// booleans so navigation states can match on `(code, shift, ctrl, alt)`
/// without caring which backend produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// The symbolic key code.
    pub code: KeyCode,
    /// Shift was held.
    pub shift: bool,
    /// Control was held.
    pub ctrl: bool,
    /// Alt was held.
    pub alt: bool,
}

impl KeyInput {
    /// A key with no modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    /// A key with an explicit modifier set.
    pub const fn with_modifiers(code: KeyCode, shift: bool, ctrl: bool, alt: bool) -> Self {
        Self {
            code,
            shift,
            ctrl,
            alt,
        }
    }

    /// A printable character with no modifiers.
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// The key with Shift held.
    pub const fn shift(code: KeyCode) -> Self {
        Self::with_modifiers(code, true, false, false)
    }

    /// The key with Control held.
    pub const fn ctrl(code: KeyCode) -> Self {
        Self::with_modifiers(code, false, true, false)
    }

    /// The key with Alt held.
    pub const fn alt(code: KeyCode) -> Self {
        Self::with_modifiers(code, false, false, true)
    }

    /// Convert a crossterm event. Release and repeat events yield `None`.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        Some(event.into())
    }

    /// Returns `true` if Control or Alt is held.
    ///
    /// Chorded keys are shortcuts, never typeahead input.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt
    }

    /// The character this key types, if it is a printable character without
    /// Control or Alt.
    pub fn typed_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.has_command_modifier() && !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// The digit this key types, if any.
    pub fn typed_digit(&self) -> Option<u32> {
        self.typed_char().and_then(|c| c.to_digit(10))
    }
}

impl From<&KeyEvent> for KeyInput {
    fn from(event: &KeyEvent) -> Self {
        let shift = event.modifiers.contains(KeyModifiers::SHIFT)
            || matches!(event.code, KeyCode::Char(c) if c.is_uppercase());
        Self {
            code: event.code,
            shift,
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        }
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(event: KeyEvent) -> Self {
        Self::from(&event)
    }
}

impl From<KeyCode> for KeyInput {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn event(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn flattens_modifiers() {
        let key = KeyInput::from(event(
            KeyCode::Home,
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
            KeyEventKind::Press,
        ));
        assert!(key.ctrl);
        assert!(key.shift);
        assert!(!key.alt);
    }

    #[test]
    fn release_events_are_dropped() {
        let release = event(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release);
        assert!(KeyInput::from_event(&release).is_none());
        let press = event(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(KeyInput::from_event(&press), Some(KeyInput::new(KeyCode::Esc)));
    }

    #[test]
    fn typed_char_ignores_chords() {
        assert_eq!(KeyInput::char('a').typed_char(), Some('a'));
        assert_eq!(KeyInput::ctrl(KeyCode::Char('a')).typed_char(), None);
        assert_eq!(KeyInput::new(KeyCode::Enter).typed_char(), None);
    }

    #[test]
    fn typed_digit() {
        assert_eq!(KeyInput::char('7').typed_digit(), Some(7));
        assert_eq!(KeyInput::char('x').typed_digit(), None);
    }
}
