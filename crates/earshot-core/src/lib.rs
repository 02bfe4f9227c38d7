//! Core engine for **earshot** — keyboard-first navigation overlays for
//! screen-reader users.
//!
//! `earshot-core` intercepts every key-down before the host application sees
//! it, decides which of many independently opened navigation states should
//! consume it, and provides the building blocks those states are made of.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`NavigationEngine`] | Per-session context: states, config, speech output |
//! | [`InputDispatcher`] | Priority-ordered routing with a fault boundary |
//! | [`NavigationState`] | One feature's overlay (`is_active` / `handle_input` / `close`) |
//! | [`TwoLevelNavigator`] | Header -> content lines -> buttons detail view |
//! | [`TypeaheadSearch`] | Incremental search over labels, with [`NumericEntry`] beside it |
//! | [`selection`] | Stateless next/previous, "X of Y" and tree arithmetic |
//! | [`AnnouncementSink`] | Where spoken text goes |
//! | [`TestEngine`](testing::TestEngine) | Headless harness for driving states key by key |
//!
//! # Flow
//!
//! 1. **register** -- each feature registers its state once with a
//!    [`StatePriority`] from one of the reserved bands.
//! 2. **open** -- when the host window a state shadows opens, the host calls
//!    the state's own `open` through its [`StateHandle`].
//! 3. **dispatch** -- every key-down goes to [`NavigationEngine::dispatch`];
//!    a consumed key must not reach the host.
//! 4. **suppress** -- the host's native Escape/Enter hook asks
//!    [`NavigationEngine::should_suppress_host_default`] before acting.
//! 5. **speak** -- states announce through the [`NavContext`] they are handed.

pub mod announce;
pub mod config;
pub mod detail;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod host;
pub mod key;
pub mod selection;
pub mod state;
pub mod testing;
pub mod typeahead;

pub use announce::{Announcement, AnnouncementSink, Priority, RecordingSink, TracingSink};
pub use config::NavConfig;
pub use detail::{
    ActionOutcome, Activation, ButtonAction, ButtonDescriptor, DetailPosition, MenuPosition, Step,
    TwoLevelNavigator,
};
pub use dispatcher::{in_guarded_call, Dispatch, InputDispatcher, StateHandle};
pub use engine::NavigationEngine;
pub use error::{ConfigError, NavError};
pub use host::{HostDefault, HostWindow};
pub use key::KeyInput;
pub use state::{NavContext, NavigationState, PriorityBand, StatePriority};
pub use typeahead::{NumericEntry, SearchOutcome, TypeaheadSearch};
