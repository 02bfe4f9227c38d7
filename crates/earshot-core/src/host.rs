//! The seam between the engine and the host application.
//!
//! Hosts usually have a second, independent path for Escape and Enter (a
//! window's own "cancel" and "accept" handling) that fires whether or not
//! the key event was consumed. The host integration asks
//! [`NavigationEngine::should_suppress_host_default`](crate::NavigationEngine::should_suppress_host_default)
//! from that native hook, separately from normal dispatch.
//!
//! [`HostWindow`] is the adapter a menu uses to keep its lifecycle tied to
//! the host element it shadows. The host implements it against its own
//! internals; the engine never reaches into host state any other way.

use crate::error::NavError;
use crate::key::KeyInput;
use crossterm::event::KeyCode;

/// A native default behavior of the host bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostDefault {
    /// Close or cancel the focused window (Escape).
    Cancel,
    /// Confirm the focused window (Enter).
    Accept,
}

impl HostDefault {
    /// The default behavior a key triggers, if any.
    pub fn from_key(key: &KeyInput) -> Option<Self> {
        if key.has_command_modifier() {
            return None;
        }
        match key.code {
            KeyCode::Esc => Some(HostDefault::Cancel),
            KeyCode::Enter => Some(HostDefault::Accept),
            _ => None,
        }
    }
}

/// Host-side view of the window a menu shadows.
pub trait HostWindow {
    /// Whether the window is still open on the host side.
    fn is_open(&self) -> bool;

    /// Ask the host to close the window.
    fn request_close(&mut self) -> Result<(), NavError>;
}
