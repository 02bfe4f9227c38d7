//! An on-screen speech transcript.
//!
//! Terminal hosts have no speech backend of their own. [`TranscriptSink`]
//! keeps the most recent announcements so the host can draw them, and logs
//! each one the way [`TracingSink`](earshot_core::TracingSink) does.

use earshot_core::{Announcement, AnnouncementSink, Priority};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A bounded, shareable log of announcements.
///
/// Clones share the same log: hand one clone to the engine and keep another
/// for drawing.
#[derive(Debug, Clone)]
pub struct TranscriptSink {
    entries: Rc<RefCell<VecDeque<Announcement>>>,
    capacity: usize,
}

impl TranscriptSink {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Rc::new(RefCell::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> Vec<Announcement> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<Announcement> {
        self.entries.borrow().back().cloned()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Draw the transcript in a bordered pane, newest at the bottom.
    ///
    /// Interrupting announcements are drawn bold.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let entries = self.entries.borrow();
        let visible = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = entries
            .iter()
            .skip(entries.len().saturating_sub(visible))
            .map(|entry| match entry.priority {
                Priority::High => Line::styled(entry.text.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Priority::Normal => Line::raw(entry.text.clone()),
            })
            .collect();
        let block = Block::default().borders(Borders::ALL).title(" Speech ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl AnnouncementSink for TranscriptSink {
    fn speak(&mut self, text: &str, priority: Priority) {
        tracing::info!(target: "earshot::speech", ?priority, "{text}");
        let mut entries = self.entries.borrow_mut();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(Announcement {
            text: text.to_string(),
            priority,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_entries() {
        let transcript = TranscriptSink::new(2);
        let mut sink = transcript.clone();
        sink.speak("one", Priority::Normal);
        sink.speak("two", Priority::High);
        sink.speak("three", Priority::Normal);
        let texts: Vec<String> = transcript.entries().into_iter().map(|a| a.text).collect();
        assert_eq!(texts, ["two", "three"]);
        assert_eq!(transcript.latest().map(|a| a.text).as_deref(), Some("three"));
    }

    #[test]
    fn zero_capacity_still_keeps_one() {
        let transcript = TranscriptSink::new(0);
        assert_eq!(transcript.capacity(), 1);
    }
}
