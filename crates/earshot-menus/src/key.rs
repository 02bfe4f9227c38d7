//! Key bindings for the ready-made menus, and the spoken help built from them.

use crossterm::event::KeyCode;
use earshot_core::KeyInput;

/// A key binding that maps one or more key combinations to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// What the binding does, as spoken by the help key.
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

/// A single key with an exact modifier set.
///
/// Matching is exact: `Down` and `Shift+Down` are different combinations,
/// since menus give them different meanings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Binding {
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], description)
    }

    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `key` triggers this binding. Always `false` when disabled.
    pub fn matches(&self, key: &KeyInput) -> bool {
        self.enabled && self.keys.iter().any(|k| k.matches(key))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// "Up or K: Previous item"
    pub fn help_text(&self) -> String {
        let keys: Vec<String> = self.keys.iter().map(KeyCombination::name).collect();
        format!("{}: {}", keys.join(" or "), self.description)
    }
}

impl KeyCombination {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            ctrl: true,
            ..Self::new(code)
        }
    }

    pub const fn alt(code: KeyCode) -> Self {
        Self {
            alt: true,
            ..Self::new(code)
        }
    }

    pub const fn shift(code: KeyCode) -> Self {
        Self {
            shift: true,
            ..Self::new(code)
        }
    }

    pub fn matches(&self, key: &KeyInput) -> bool {
        self.code == key.code && self.shift == key.shift && self.ctrl == key.ctrl && self.alt == key.alt
    }

    /// Spoken name of the combination, e.g. "Control Home".
    pub fn name(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Control".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        parts.push(key_name(self.code));
        parts.join(" ")
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "Page Up".into(),
        KeyCode::PageDown => "Page Down".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Escape".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_uppercase().to_string(),
        other => format!("{other:?}"),
    }
}

/// Types that define key bindings, so a menu can speak its own help.
pub trait KeyMap {
    /// The bindings spoken when the user asks for help.
    fn help(&self) -> Vec<&Binding>;

    /// One announcement listing every enabled binding.
    fn help_announcement(&self) -> String {
        self.help()
            .into_iter()
            .filter(|b| b.enabled)
            .map(Binding::help_text)
            .collect::<Vec<_>>()
            .join(". ")
    }
}

/// Bindings shared by [`ListMenu`](crate::list_menu::ListMenu) and
/// [`TreeMenu`](crate::tree_menu::TreeMenu).
///
/// Override fields to rebind:
///
/// ```ignore
/// let mut bindings = MenuKeyBindings::default();
/// bindings.help = Binding::new(KeyCombination::new(KeyCode::Char('?')), "Help");
/// ```
#[derive(Debug, Clone)]
pub struct MenuKeyBindings {
    /// Default: Up
    pub previous: Binding,
    /// Default: Down
    pub next: Binding,
    /// Default: Home
    pub first: Binding,
    /// Default: End
    pub last: Binding,
    /// Default: Ctrl+Home
    pub top: Binding,
    /// Default: Ctrl+End
    pub bottom: Binding,
    /// Previous button in the detail view. Default: Left
    pub previous_button: Binding,
    /// Next button in the detail view. Default: Right
    pub next_button: Binding,
    /// Default: Enter
    pub activate: Binding,
    /// Clear search, leave detail view, close. Default: Escape
    pub back: Binding,
    /// Default: Backspace
    pub erase: Binding,
    /// Default: F1
    pub help: Binding,
}

impl Default for MenuKeyBindings {
    fn default() -> Self {
        Self {
            previous: Binding::new(KeyCombination::new(KeyCode::Up), "Previous"),
            next: Binding::new(KeyCombination::new(KeyCode::Down), "Next"),
            first: Binding::new(KeyCombination::new(KeyCode::Home), "First"),
            last: Binding::new(KeyCombination::new(KeyCode::End), "Last"),
            top: Binding::new(KeyCombination::ctrl(KeyCode::Home), "Top of list"),
            bottom: Binding::new(KeyCombination::ctrl(KeyCode::End), "Bottom of list"),
            previous_button: Binding::new(KeyCombination::new(KeyCode::Left), "Previous button"),
            next_button: Binding::new(KeyCombination::new(KeyCode::Right), "Next button"),
            activate: Binding::new(KeyCombination::new(KeyCode::Enter), "Open or activate"),
            back: Binding::new(KeyCombination::new(KeyCode::Esc), "Back"),
            erase: Binding::new(KeyCombination::new(KeyCode::Backspace), "Erase search"),
            help: Binding::new(KeyCombination::new(KeyCode::F(1)), "Help"),
        }
    }
}

impl KeyMap for MenuKeyBindings {
    fn help(&self) -> Vec<&Binding> {
        vec![
            &self.previous,
            &self.next,
            &self.first,
            &self.last,
            &self.activate,
            &self.back,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_exact_on_modifiers() {
        let down = KeyCombination::new(KeyCode::Down);
        assert!(down.matches(&KeyInput::new(KeyCode::Down)));
        assert!(!down.matches(&KeyInput::shift(KeyCode::Down)));
        assert!(KeyCombination::ctrl(KeyCode::Home).matches(&KeyInput::ctrl(KeyCode::Home)));
    }

    #[test]
    fn disabled_binding_never_matches() {
        let binding = Binding::new(KeyCombination::new(KeyCode::Enter), "Go").enabled(false);
        assert!(!binding.matches(&KeyInput::new(KeyCode::Enter)));
    }

    #[test]
    fn help_names_keys() {
        let binding = Binding::with_keys(
            vec![
                KeyCombination::ctrl(KeyCode::Home),
                KeyCombination::new(KeyCode::Char('g')),
            ],
            "Top",
        );
        assert_eq!(binding.help_text(), "Control Home or G: Top");

        let mut bindings = MenuKeyBindings::default();
        bindings.back = bindings.back.enabled(false);
        let help = bindings.help_announcement();
        assert!(help.starts_with("Up: Previous. Down: Next"));
        assert!(!help.contains("Escape"));
    }
}
