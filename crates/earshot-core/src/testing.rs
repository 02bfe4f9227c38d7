use crate::announce::RecordingSink;
use crate::config::NavConfig;
use crate::dispatcher::{Dispatch, StateHandle};
use crate::engine::NavigationEngine;
use crate::host::HostDefault;
use crate::key::KeyInput;
use crate::state::{NavContext, NavigationState, StatePriority};
use crossterm::event::KeyCode;

/// A headless harness that drives a [`NavigationEngine`] with a recording
/// sink, so menus can be exercised key by key in a plain `#[test]`.
///
/// # Example
///
/// ```rust,ignore
/// use earshot_core::testing::TestEngine;
///
/// let mut t = TestEngine::new();
/// let menu = t.register(StatePriority::overlay(0), ListMenu::new("Fruit", fruit()));
/// t.with_state(menu, |m, cx| m.open(cx));
/// t.press(KeyCode::Down);
/// assert_eq!(t.last_spoken().as_deref(), Some("Banana, 2 of 3"));
/// ```
pub struct TestEngine {
    engine: NavigationEngine,
    recorder: RecordingSink,
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEngine {
    /// A harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(NavConfig::default())
    }

    pub fn with_config(config: NavConfig) -> Self {
        let recorder = RecordingSink::new();
        Self {
            engine: NavigationEngine::new(config, recorder.clone()),
            recorder,
        }
    }

    pub fn register<S: NavigationState>(&mut self, priority: StatePriority, state: S) -> StateHandle<S> {
        self.engine.register(priority, state)
    }

    pub fn with_state<S: NavigationState, R>(
        &mut self,
        handle: StateHandle<S>,
        f: impl FnOnce(&mut S, &mut NavContext<'_>) -> R,
    ) -> Option<R> {
        self.engine.with_state(handle, f)
    }

    pub fn state<S: NavigationState>(&self, handle: StateHandle<S>) -> Option<&S> {
        self.engine.state(handle)
    }

    /// Press a key with no modifiers.
    pub fn press(&mut self, code: KeyCode) -> Dispatch {
        self.engine.dispatch(KeyInput::new(code))
    }

    /// Press a key with explicit modifiers.
    pub fn press_key(&mut self, key: KeyInput) -> Dispatch {
        self.engine.dispatch(key)
    }

    /// Type each character of `text` in turn.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.engine.dispatch(KeyInput::char(c));
        }
    }

    pub fn suppresses(&self, kind: HostDefault) -> bool {
        self.engine.should_suppress_host_default(kind)
    }

    /// Every announcement text so far.
    pub fn spoken(&self) -> Vec<String> {
        self.recorder.texts()
    }

    pub fn last_spoken(&self) -> Option<String> {
        self.recorder.last()
    }

    /// Forget what has been spoken so far.
    pub fn clear_spoken(&self) {
        self.recorder.clear();
    }

    pub fn recorder(&self) -> &RecordingSink {
        &self.recorder
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut NavigationEngine {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;

    struct Echo {
        active: bool,
    }

    impl NavigationState for Echo {
        fn name(&self) -> &str {
            "Echo"
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn handle_input(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError> {
            match key.typed_char() {
                Some(c) => {
                    cx.interrupt(&c.to_string());
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        fn close(&mut self, _cx: &mut NavContext<'_>) {
            self.active = false;
        }
    }

    #[test]
    fn records_what_states_say() {
        let mut t = TestEngine::new();
        t.register(StatePriority::overlay(0), Echo { active: true });
        t.type_text("hi");
        assert_eq!(t.spoken(), vec!["h", "i"]);
        assert_eq!(t.press(KeyCode::Up), Dispatch::PassThrough);
        t.clear_spoken();
        assert!(t.last_spoken().is_none());
    }

    #[test]
    fn with_state_reaches_registered_state() {
        let mut t = TestEngine::new();
        let echo = t.register(StatePriority::overlay(0), Echo { active: true });
        t.with_state(echo, |e, cx| e.close(cx));
        assert!(!t.state(echo).unwrap().active);
        assert!(!t.suppresses(HostDefault::Cancel));
    }
}
