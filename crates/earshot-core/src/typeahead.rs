//! Incremental search-as-you-type over a list of labels.
//!
//! A [`TypeaheadSearch`] buffers typed characters and jumps the caller's
//! selection to the nearest matching label. The buffer only ever grows by a
//! character that still matches something: a character that would leave
//! zero matches is rejected, and the attempt is remembered so the caller can
//! say "no matches for …" with the text the user actually typed.
//!
//! A label matches when, ignoring case, the label itself or any of its words
//! starts with the buffer. Among matches, the first one at or after the
//! current selection wins, wrapping to the top of the list.
//!
//! Quantity menus also accept typed numbers. That entry lives in a separate
//! [`NumericEntry`] with its own buffer and timeout, so digits and letters
//! never bleed into each other on the same menu.

use std::time::{Duration, Instant};

/// Result of feeding one character to a [`TypeaheadSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Whether the character was appended to the buffer.
    pub accepted: bool,
    /// The index the caller should select, when the character was accepted.
    pub index: Option<usize>,
}

impl SearchOutcome {
    fn accepted(index: usize) -> Self {
        Self {
            accepted: true,
            index: Some(index),
        }
    }

    fn rejected() -> Self {
        Self {
            accepted: false,
            index: None,
        }
    }
}

/// An incremental typeahead session.
#[derive(Debug, Clone)]
pub struct TypeaheadSearch {
    buffer: String,
    matches: Vec<usize>,
    last_failed: String,
    last_input: Option<Instant>,
    timeout: Duration,
}

impl Default for TypeaheadSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeaheadSearch {
    /// Create a session with the default 1 s inactivity timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(1000))
    }

    /// Create a session with a custom inactivity timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            buffer: String::new(),
            matches: Vec::new(),
            last_failed: String::new(),
            last_input: None,
            timeout,
        }
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// The committed search text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Indices of every label matching the buffer, in collection order.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The text of the most recent rejected attempt, buffer plus the
    /// character that failed.
    pub fn last_failed(&self) -> &str {
        &self.last_failed
    }

    /// Returns `true` while there is a non-empty buffer.
    pub fn is_active(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Drop the buffer and all match state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.matches.clear();
        self.last_failed.clear();
        self.last_input = None;
    }

    fn expire_if_stale(&mut self) {
        if let Some(last) = self.last_input {
            if last.elapsed() >= self.timeout {
                self.clear();
            }
        }
    }

    /// Feed one typed character.
    ///
    /// `current` is the caller's selection; it biases which match is chosen.
    pub fn process_char<S: AsRef<str>>(
        &mut self,
        c: char,
        labels: &[S],
        current: usize,
    ) -> SearchOutcome {
        self.expire_if_stale();
        self.last_input = Some(Instant::now());

        let mut candidate = self.buffer.clone();
        candidate.push(c);
        let matches = find_matches(&candidate, labels);
        if matches.is_empty() {
            self.last_failed = candidate;
            return SearchOutcome::rejected();
        }

        let index = nearest_forward(&matches, current);
        self.buffer = candidate;
        self.matches = matches;
        self.last_failed.clear();
        SearchOutcome::accepted(index)
    }

    /// Remove the last buffered character and search again from scratch.
    ///
    /// Returns `None` when the buffer ends up empty; the caller keeps its
    /// prior selection in that case.
    pub fn process_backspace<S: AsRef<str>>(&mut self, labels: &[S], current: usize) -> Option<usize> {
        self.expire_if_stale();
        if self.buffer.pop().is_none() || self.buffer.is_empty() {
            self.clear();
            return None;
        }
        self.last_input = Some(Instant::now());
        self.last_failed.clear();
        self.matches = find_matches(&self.buffer, labels);
        if self.matches.is_empty() {
            // Labels changed underneath us and nothing matches any more.
            self.clear();
            return None;
        }
        Some(nearest_forward(&self.matches, current))
    }

    /// Next matching index after `from`, wrapping to the first match.
    pub fn next_match(&self, from: usize) -> Option<usize> {
        self.matches
            .iter()
            .copied()
            .find(|&m| m > from)
            .or_else(|| self.matches.first().copied())
    }

    /// Previous matching index before `from`, wrapping to the last match.
    pub fn previous_match(&self, from: usize) -> Option<usize> {
        self.matches
            .iter()
            .rev()
            .copied()
            .find(|&m| m < from)
            .or_else(|| self.matches.last().copied())
    }

    /// 1-based position of `index` among the matches.
    pub fn match_position(&self, index: usize) -> Option<usize> {
        self.matches.iter().position(|&m| m == index).map(|p| p + 1)
    }
}

/// Whether `label` matches the lowercase `needle`.
fn label_matches(label: &str, needle: &str) -> bool {
    let label = label.to_lowercase();
    label.starts_with(needle) || label.split_whitespace().any(|word| word.starts_with(needle))
}

fn find_matches<S: AsRef<str>>(buffer: &str, labels: &[S]) -> Vec<usize> {
    let needle = buffer.to_lowercase();
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label_matches(label.as_ref(), &needle))
        .map(|(i, _)| i)
        .collect()
}

/// First match at or after `current`, else the first match overall.
fn nearest_forward(matches: &[usize], current: usize) -> usize {
    matches
        .iter()
        .copied()
        .find(|&m| m >= current)
        .unwrap_or(matches[0])
}

const MAX_DIGITS: usize = 9;

/// Typed-number entry for quantity menus.
///
/// Digits accumulate into one number until the inactivity timeout passes,
/// after which the next digit starts a fresh number.
#[derive(Debug, Clone)]
pub struct NumericEntry {
    buffer: String,
    last_input: Option<Instant>,
    timeout: Duration,
}

impl Default for NumericEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl NumericEntry {
    /// Create an entry with the default 1.5 s inactivity timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_millis(1500))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            buffer: String::new(),
            last_input: None,
            timeout,
        }
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_active(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// The number typed so far.
    pub fn value(&self) -> Option<u32> {
        self.buffer.parse().ok()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_input = None;
    }

    /// Append a digit and return the resulting number.
    ///
    /// Non-digits are ignored. Input beyond nine digits is dropped.
    pub fn push_digit(&mut self, digit: char) -> Option<u32> {
        if !digit.is_ascii_digit() {
            return None;
        }
        if let Some(last) = self.last_input {
            if last.elapsed() >= self.timeout {
                self.buffer.clear();
            }
        }
        self.last_input = Some(Instant::now());
        if self.buffer.len() < MAX_DIGITS {
            self.buffer.push(digit);
        }
        self.value()
    }

    /// Remove the last digit. `None` once the entry is empty.
    pub fn backspace(&mut self) -> Option<u32> {
        self.buffer.pop();
        if self.buffer.is_empty() {
            self.clear();
            return None;
        }
        self.last_input = Some(Instant::now());
        self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRUIT: &[&str] = &["Apple", "Banana", "Apricot"];

    #[test]
    fn single_char_matches_first_label() {
        let mut search = TypeaheadSearch::new();
        let outcome = search.process_char('a', FRUIT, 0);
        assert_eq!(outcome, SearchOutcome::accepted(0));
        assert_eq!(search.matches(), &[0, 2]);
    }

    #[test]
    fn narrowing_and_rejection() {
        let mut search = TypeaheadSearch::new();
        search.process_char('a', FRUIT, 0);
        let outcome = search.process_char('p', FRUIT, 0);
        assert!(outcome.accepted);
        assert_eq!(search.matches(), &[0, 2]);

        let outcome = search.process_char('x', FRUIT, 0);
        assert!(!outcome.accepted);
        assert_eq!(outcome.index, None);
        assert_eq!(search.buffer(), "ap");
        assert_eq!(search.last_failed(), "apx");
        assert_eq!(search.matches(), &[0, 2]);
    }

    #[test]
    fn accepted_characters_concatenate() {
        let mut search = TypeaheadSearch::new();
        for c in "apr".chars() {
            assert!(search.process_char(c, FRUIT, 0).accepted);
        }
        assert_eq!(search.buffer(), "apr");
        assert_eq!(search.matches(), &[2]);
        assert!(!search.process_char('z', FRUIT, 2).accepted);
        assert_eq!(search.buffer(), "apr");
    }

    #[test]
    fn prefers_match_at_or_after_current() {
        let mut search = TypeaheadSearch::new();
        assert_eq!(search.process_char('a', FRUIT, 1).index, Some(2));
        search.clear();
        // Nothing after index 2 matches 'b', so it wraps.
        assert_eq!(search.process_char('b', FRUIT, 2).index, Some(1));
    }

    #[test]
    fn matching_is_case_insensitive_and_word_aware() {
        let labels = ["Simple meal", "Fine meal", "Wood"];
        let mut search = TypeaheadSearch::new();
        assert_eq!(search.process_char('M', &labels, 0).index, Some(0));
        assert_eq!(search.matches(), &[0, 1]);
    }

    #[test]
    fn next_and_previous_cycle_through_matches() {
        let mut search = TypeaheadSearch::new();
        search.process_char('a', FRUIT, 0);
        assert_eq!(search.next_match(0), Some(2));
        assert_eq!(search.next_match(2), Some(0));
        assert_eq!(search.previous_match(0), Some(2));
        assert_eq!(search.previous_match(2), Some(0));
        assert_eq!(search.match_position(2), Some(2));
    }

    #[test]
    fn no_matches_means_no_cycling() {
        let search = TypeaheadSearch::new();
        assert_eq!(search.next_match(0), None);
        assert_eq!(search.previous_match(0), None);
    }

    #[test]
    fn backspace_on_single_char_empties_buffer() {
        let mut search = TypeaheadSearch::new();
        search.process_char('b', FRUIT, 0);
        assert_eq!(search.process_backspace(FRUIT, 1), None);
        assert_eq!(search.buffer(), "");
        assert!(!search.is_active());
    }

    #[test]
    fn backspace_researches_against_current_labels() {
        let mut search = TypeaheadSearch::new();
        search.process_char('a', FRUIT, 0);
        search.process_char('p', FRUIT, 0);
        search.process_char('r', FRUIT, 0);
        // The list changed: Apricot moved to the front.
        let reordered = ["Apricot", "Banana", "Apple"];
        assert_eq!(search.process_backspace(&reordered, 1), Some(2));
        assert_eq!(search.buffer(), "ap");
        assert_eq!(search.matches(), &[0, 2]);
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut search = TypeaheadSearch::new();
        assert_eq!(search.process_backspace(FRUIT, 0), None);
    }

    #[test]
    fn stale_buffer_expires_on_next_keystroke() {
        let mut search = TypeaheadSearch::with_timeout(Duration::from_millis(1));
        search.process_char('b', FRUIT, 0);
        std::thread::sleep(Duration::from_millis(5));
        let outcome = search.process_char('a', FRUIT, 0);
        assert_eq!(outcome.index, Some(0));
        assert_eq!(search.buffer(), "a");
    }

    #[test]
    fn numeric_entry_accumulates() {
        let mut entry = NumericEntry::new();
        assert_eq!(entry.push_digit('1'), Some(1));
        assert_eq!(entry.push_digit('2'), Some(12));
        assert_eq!(entry.push_digit('x'), None);
        assert_eq!(entry.buffer(), "12");
        assert_eq!(entry.backspace(), Some(1));
        assert_eq!(entry.backspace(), None);
        assert!(!entry.is_active());
    }

    #[test]
    fn numeric_entry_restarts_after_timeout() {
        let mut entry = NumericEntry::with_timeout(Duration::from_millis(1));
        entry.push_digit('4');
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(entry.push_digit('7'), Some(7));
    }

    #[test]
    fn numeric_entry_is_bounded() {
        let mut entry = NumericEntry::new();
        for _ in 0..12 {
            entry.push_digit('9');
        }
        assert_eq!(entry.value(), Some(999_999_999));
    }

    #[test]
    fn numeric_and_label_buffers_are_independent() {
        let mut search = TypeaheadSearch::new();
        let mut entry = NumericEntry::new();
        search.process_char('a', FRUIT, 0);
        entry.push_digit('5');
        assert_eq!(search.buffer(), "a");
        assert_eq!(entry.buffer(), "5");
        search.clear();
        assert_eq!(entry.value(), Some(5));
    }
}
