//! Spoken output.
//!
//! The engine never talks to a speech backend directly. Everything it has to
//! say goes through an [`AnnouncementSink`], which the host wires to a screen
//! reader, a transcript pane, or a test recorder.

use std::cell::RefCell;
use std::rc::Rc;

/// How urgently an announcement should be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Queued behind whatever is currently being spoken.
    #[default]
    Normal,
    /// Interrupts any in-progress lower-priority announcement.
    High,
}

/// A unit of text handed to the speech channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// The text to speak.
    pub text: String,
    /// Delivery priority.
    pub priority: Priority,
}

/// Receives announcements. Fire-and-forget: implementations must not block.
pub trait AnnouncementSink {
    /// Speak `text` with the given priority.
    fn speak(&mut self, text: &str, priority: Priority);
}

impl<F: FnMut(&str, Priority)> AnnouncementSink for F {
    fn speak(&mut self, text: &str, priority: Priority) {
        self(text, priority)
    }
}

/// A sink that records every announcement in memory.
///
/// Clones share the same log, so a test can hand one clone to the engine and
/// keep another for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<Announcement>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All announcements so far, oldest first.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.log.borrow().clone()
    }

    /// The text of every announcement, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.log.borrow().iter().map(|a| a.text.clone()).collect()
    }

    /// The most recent announcement text, if any.
    pub fn last(&self) -> Option<String> {
        self.log.borrow().last().map(|a| a.text.clone())
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl AnnouncementSink for RecordingSink {
    fn speak(&mut self, text: &str, priority: Priority) {
        self.log.borrow_mut().push(Announcement {
            text: text.to_string(),
            priority,
        });
    }
}

/// A sink that writes announcements to the `tracing` log.
///
/// Useful as a fallback when no speech backend is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnnouncementSink for TracingSink {
    fn speak(&mut self, text: &str, priority: Priority) {
        tracing::info!(target: "earshot::speech", ?priority, "{text}");
    }
}
