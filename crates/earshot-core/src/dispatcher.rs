//! Priority-ordered key routing across registered navigation states.
//!
//! The dispatcher holds every [`NavigationState`] of a session, sorted by
//! [`StatePriority`]. [`dispatch`](InputDispatcher::dispatch) offers a key to
//! each *active* state in order; the first one returning `true` consumes it
//! and nothing after it is consulted.
//!
//! The dispatcher is also the fault boundary: a state that returns an error
//! or panics is reported, closed, and the key is swallowed. A broken overlay
//! must never take the host down with it.

use crate::host::HostDefault;
use crate::key::KeyInput;
use crate::state::{NavContext, NavigationState, StatePriority};
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

/// Whether this thread is inside a state call the dispatcher guards.
///
/// A panic raised there is caught and reported by the dispatcher, so a
/// process-wide panic hook can check this to leave the terminal alone.
pub fn in_guarded_call() -> bool {
    GUARDED.with(Cell::get)
}

fn guarded<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    let outer = GUARDED.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|flag| flag.set(outer));
    result
}

/// Typed reference to a registered state.
///
/// Lets the host reach its own state (to call a feature-specific `open`)
/// without the dispatcher knowing any concrete state types.
pub struct StateHandle<S> {
    id: u64,
    _marker: PhantomData<fn() -> S>,
}

impl<S> Clone for StateHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StateHandle<S> {}

impl<S> fmt::Debug for StateHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateHandle").field(&self.id).finish()
    }
}

impl<S> PartialEq for StateHandle<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<S> Eq for StateHandle<S> {}

/// What happened to a dispatched key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A state consumed the key; the host must not process it further.
    Consumed {
        /// Name of the consuming state.
        by: String,
    },
    /// No state wanted the key.
    PassThrough,
}

impl Dispatch {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Dispatch::Consumed { .. })
    }
}

struct Entry {
    id: u64,
    priority: StatePriority,
    state: Box<dyn NavigationState>,
}

/// The registry of navigation states and the key router over it.
#[derive(Default)]
pub struct InputDispatcher {
    entries: Vec<Entry>,
    next_id: u64,
}

impl fmt::Debug for InputDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|e| (e.priority.value(), e.state.name().to_string())),
            )
            .finish()
    }
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. States with equal priority keep registration order.
    pub fn register<S: NavigationState>(&mut self, priority: StatePriority, state: S) -> StateHandle<S> {
        let id = self.next_id;
        self.next_id += 1;
        let position = self.entries.partition_point(|e| e.priority <= priority);
        tracing::debug!(
            state = state.name(),
            priority = priority.value(),
            position,
            "registered navigation state"
        );
        self.entries.insert(
            position,
            Entry {
                id,
                priority,
                state: Box::new(state),
            },
        );
        StateHandle {
            id,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow a registered state by handle.
    pub fn get<S: NavigationState>(&self, handle: StateHandle<S>) -> Option<&S> {
        let entry = self.entries.iter().find(|e| e.id == handle.id)?;
        let state: &dyn Any = &*entry.state;
        state.downcast_ref::<S>()
    }

    /// Mutably borrow a registered state by handle.
    pub fn get_mut<S: NavigationState>(&mut self, handle: StateHandle<S>) -> Option<&mut S> {
        let entry = self.entries.iter_mut().find(|e| e.id == handle.id)?;
        let state: &mut dyn Any = &mut *entry.state;
        state.downcast_mut::<S>()
    }

    /// Names of the active states, in dispatch order.
    pub fn active_states(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.state.is_active())
            .map(|e| e.state.name())
            .collect()
    }

    /// Offer `key` to active states in priority order.
    pub fn dispatch(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Dispatch {
        for entry in &mut self.entries {
            if !entry.state.is_active() {
                continue;
            }
            let outcome = guarded(|| entry.state.handle_input(key, cx));
            match outcome {
                Ok(Ok(true)) => {
                    let by = entry.state.name().to_string();
                    tracing::debug!(state = %by, key = ?key.code, "key consumed");
                    return Dispatch::Consumed { by };
                }
                Ok(Ok(false)) => {}
                Ok(Err(err)) => return Self::fault(entry, cx, &err.to_string()),
                Err(payload) => return Self::fault(entry, cx, &panic_message(payload.as_ref())),
            }
        }
        tracing::trace!(key = ?key.code, "key passed through");
        Dispatch::PassThrough
    }

    fn fault(entry: &mut Entry, cx: &mut NavContext<'_>, reason: &str) -> Dispatch {
        let name = entry.state.name().to_string();
        tracing::error!(state = %name, reason, "navigation state failed; closing it");
        let closed = guarded(|| entry.state.close(cx));
        if closed.is_err() {
            tracing::error!(state = %name, "navigation state panicked while closing");
        }
        cx.interrupt(&format!("Navigation error in {name}"));
        Dispatch::Consumed { by: name }
    }

    /// Whether the host's native `kind` handling must be suppressed.
    ///
    /// This is a yes/no gate over active states, not a priority walk: the
    /// host's native path carries no routing information.
    pub fn should_suppress_host_default(&self, kind: HostDefault) -> bool {
        self.entries
            .iter()
            .any(|e| e.state.is_active() && e.state.claims_host_default(kind))
    }

    /// Close every active state.
    pub fn close_all(&mut self, cx: &mut NavContext<'_>) {
        for entry in &mut self.entries {
            if entry.state.is_active() {
                entry.state.close(cx);
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
