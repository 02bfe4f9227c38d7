//! The per-session navigation engine.

use crate::announce::{AnnouncementSink, Priority};
use crate::config::NavConfig;
use crate::dispatcher::{Dispatch, InputDispatcher, StateHandle};
use crate::host::HostDefault;
use crate::key::KeyInput;
use crate::state::{NavContext, NavigationState, StatePriority};

/// Everything one session of keyboard navigation needs: the registered
/// states, the configuration, and the speech output.
///
/// Create one at application start, register each feature's state once, and
/// feed it every key-down:
///
/// ```ignore
/// let mut engine = NavigationEngine::new(NavConfig::default(), TracingSink);
/// let trade = engine.register(StatePriority::overlay(10), ListMenu::new("Trade", source));
///
/// // When the host opens the trade window:
/// engine.with_state(trade, |menu, cx| menu.open(cx));
///
/// // For every key-down:
/// if engine.dispatch(key).is_consumed() {
///     return; // the host must not see it
/// }
/// ```
pub struct NavigationEngine {
    dispatcher: InputDispatcher,
    config: NavConfig,
    sink: Box<dyn AnnouncementSink>,
}

impl NavigationEngine {
    pub fn new(config: NavConfig, sink: impl AnnouncementSink + 'static) -> Self {
        Self {
            dispatcher: InputDispatcher::new(),
            config,
            sink: Box::new(sink),
        }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next key.
    pub fn set_config(&mut self, config: NavConfig) {
        self.config = config;
    }

    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    pub fn register<S: NavigationState>(&mut self, priority: StatePriority, state: S) -> StateHandle<S> {
        self.dispatcher.register(priority, state)
    }

    pub fn state<S: NavigationState>(&self, handle: StateHandle<S>) -> Option<&S> {
        self.dispatcher.get(handle)
    }

    pub fn state_mut<S: NavigationState>(&mut self, handle: StateHandle<S>) -> Option<&mut S> {
        self.dispatcher.get_mut(handle)
    }

    /// Run `f` against a registered state with a live [`NavContext`], e.g.
    /// to open it when the host window it shadows opens.
    pub fn with_state<S: NavigationState, R>(
        &mut self,
        handle: StateHandle<S>,
        f: impl FnOnce(&mut S, &mut NavContext<'_>) -> R,
    ) -> Option<R> {
        let state = self.dispatcher.get_mut(handle)?;
        let mut cx = NavContext::new(&self.config, self.sink.as_mut());
        Some(f(state, &mut cx))
    }

    /// Route one key-down through the registered states.
    pub fn dispatch(&mut self, key: impl Into<KeyInput>) -> Dispatch {
        let key = key.into();
        let mut cx = NavContext::new(&self.config, self.sink.as_mut());
        self.dispatcher.dispatch(&key, &mut cx)
    }

    /// Answer the host's native cancel/accept hook.
    pub fn should_suppress_host_default(&self, kind: HostDefault) -> bool {
        let suppress = self.dispatcher.should_suppress_host_default(kind);
        if suppress {
            tracing::debug!(?kind, "suppressing host default");
        }
        suppress
    }

    /// Speak on behalf of the host.
    pub fn speak(&mut self, text: &str, priority: Priority) {
        self.sink.speak(text, priority);
    }

    /// Close every open state, e.g. when the host leaves the current screen.
    pub fn reset(&mut self) {
        let mut cx = NavContext::new(&self.config, self.sink.as_mut());
        self.dispatcher.close_all(&mut cx);
    }
}
