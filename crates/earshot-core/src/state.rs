//! Navigation states and the context they run in.
//!
//! A [`NavigationState`] is one feature's keyboard-navigable overlay: a trade
//! menu, a history tab, a quantity dialog. Every state gets a
//! [`StatePriority`] at registration; the dispatcher offers each key to active
//! states in ascending priority order.
//!
//! Priorities are grouped into bands so a new feature can pick a slot without
//! renumbering anything else:
//!
//! | Band | Range | Use for |
//! |------|-------|---------|
//! | [`Blocking`](PriorityBand::Blocking) | `0..100` | Modal dialogs that must see every key |
//! | [`Overlay`](PriorityBand::Overlay) | `100..200` | Menus layered over a window |
//! | [`Tab`](PriorityBand::Tab) | `200..300` | Per-tab navigation inside a window |
//! | [`Fallback`](PriorityBand::Fallback) | `300..` | Global shortcuts |
//!
//! A feature with sub-views (a list with a detail view) registers *once* and
//! checks its sub-views in code order inside `handle_input`, so its single
//! priority decides where the whole feature sits.

use crate::announce::{AnnouncementSink, Priority};
use crate::config::NavConfig;
use crate::error::NavError;
use crate::host::HostDefault;
use crate::key::KeyInput;
use std::any::Any;

/// Reserved priority ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityBand {
    /// Modal dialogs; checked first.
    Blocking,
    /// Overlays such as menus and pickers.
    Overlay,
    /// Tab-level navigation.
    Tab,
    /// Global fallback shortcuts; checked last.
    Fallback,
}

impl PriorityBand {
    const WIDTH: u16 = 100;

    /// First priority value in the band.
    pub const fn base(self) -> u16 {
        match self {
            PriorityBand::Blocking => 0,
            PriorityBand::Overlay => Self::WIDTH,
            PriorityBand::Tab => 2 * Self::WIDTH,
            PriorityBand::Fallback => 3 * Self::WIDTH,
        }
    }
}

/// Dispatch order of a navigation state. Lower is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatePriority(u16);

impl StatePriority {
    /// A raw priority value.
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Slot `offset` within `band`. Offsets past the band width are capped so
    /// a state never leaks into the next band.
    pub const fn in_band(band: PriorityBand, offset: u16) -> Self {
        let capped = if offset >= PriorityBand::WIDTH {
            PriorityBand::WIDTH - 1
        } else {
            offset
        };
        Self(band.base() + capped)
    }

    pub const fn blocking(offset: u16) -> Self {
        Self::in_band(PriorityBand::Blocking, offset)
    }

    pub const fn overlay(offset: u16) -> Self {
        Self::in_band(PriorityBand::Overlay, offset)
    }

    pub const fn tab(offset: u16) -> Self {
        Self::in_band(PriorityBand::Tab, offset)
    }

    pub const fn fallback(offset: u16) -> Self {
        Self(PriorityBand::Fallback.base().saturating_add(offset))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// The band this priority falls in.
    pub const fn band(self) -> PriorityBand {
        match self.0 / PriorityBand::WIDTH {
            0 => PriorityBand::Blocking,
            1 => PriorityBand::Overlay,
            2 => PriorityBand::Tab,
            _ => PriorityBand::Fallback,
        }
    }
}

/// Per-call access to the session's configuration and speech output.
///
/// Created by the [`NavigationEngine`](crate::NavigationEngine) for each
/// dispatch and handed to the state handling the key.
pub struct NavContext<'a> {
    config: &'a NavConfig,
    sink: &'a mut dyn AnnouncementSink,
}

impl<'a> NavContext<'a> {
    pub fn new(config: &'a NavConfig, sink: &'a mut dyn AnnouncementSink) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &NavConfig {
        self.config
    }

    /// Shorthand for `config().wrap_navigation`.
    pub fn wrap(&self) -> bool {
        self.config.wrap_navigation
    }

    pub fn speak(&mut self, text: &str, priority: Priority) {
        tracing::trace!(?priority, text, "announce");
        self.sink.speak(text, priority);
    }

    /// Speak, interrupting anything in progress.
    pub fn interrupt(&mut self, text: &str) {
        self.speak(text, Priority::High);
    }

    /// Speak after anything in progress.
    pub fn queue(&mut self, text: &str) {
        self.speak(text, Priority::Normal);
    }
}

/// One feature's keyboard-navigable overlay.
///
/// Opening is feature-specific, so it is not part of this trait: each state
/// exposes its own `open(...)`, and the host reaches it through the typed
/// [`StateHandle`](crate::dispatcher::StateHandle) returned at registration.
pub trait NavigationState: Any {
    /// Name used in logs and failure messages.
    fn name(&self) -> &str;

    /// Inactive states are skipped by the dispatcher.
    fn is_active(&self) -> bool;

    /// Offer a key. `Ok(true)` consumes it; `Ok(false)` lets the next state
    /// (and eventually the host) see it.
    fn handle_input(&mut self, key: &KeyInput, cx: &mut NavContext<'_>) -> Result<bool, NavError>;

    /// Close the state and drop its transient navigation data.
    fn close(&mut self, cx: &mut NavContext<'_>);

    /// Whether the host's native handling of `kind` must be suppressed,
    /// because this state still has something to do with that key (an open
    /// search buffer, an open detail view, a modal).
    fn claims_host_default(&self, _kind: HostDefault) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::RecordingSink;

    #[test]
    fn bands_are_ordered() {
        assert!(StatePriority::blocking(99) < StatePriority::overlay(0));
        assert!(StatePriority::overlay(99) < StatePriority::tab(0));
        assert!(StatePriority::tab(99) < StatePriority::fallback(0));
    }

    #[test]
    fn offsets_stay_inside_their_band() {
        assert_eq!(StatePriority::overlay(500).band(), PriorityBand::Overlay);
        assert_eq!(StatePriority::overlay(500).value(), 199);
        assert_eq!(StatePriority::new(250).band(), PriorityBand::Tab);
        assert_eq!(StatePriority::fallback(1000).band(), PriorityBand::Fallback);
    }

    #[test]
    fn context_forwards_to_sink() {
        let config = NavConfig::default();
        let recorder = RecordingSink::new();
        let mut sink = recorder.clone();
        let mut cx = NavContext::new(&config, &mut sink);
        cx.interrupt("first");
        cx.queue("second");
        assert!(cx.wrap());
        let heard = recorder.announcements();
        assert_eq!(heard[0].priority, Priority::High);
        assert_eq!(heard[1].text, "second");
    }
}
