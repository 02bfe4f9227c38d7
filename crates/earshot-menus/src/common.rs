//! Pieces shared by the list and tree menus.

use earshot_core::selection::position_suffix;
use earshot_core::{NavConfig, NavContext, NavError, TypeaheadSearch};

/// What a typed character did to the search.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Typed {
    /// Select this row.
    Jump(usize),
    /// Nothing matched; the attempted text is attached.
    NoMatch(String),
}

/// Feed `c` to the search.
///
/// Repeating the only buffered letter (typing "a" then "a" again) cycles to
/// the next match when the doubled text matches nothing.
pub(crate) fn type_char(search: &mut TypeaheadSearch, c: char, labels: &[String], selected: usize) -> Typed {
    let outcome = search.process_char(c, labels, selected);
    if let Some(index) = outcome.index {
        return Typed::Jump(index);
    }
    if repeats_buffer(search.buffer(), c) {
        if let Some(index) = search.next_match(selected) {
            return Typed::Jump(index);
        }
    }
    Typed::NoMatch(search.last_failed().to_string())
}

fn repeats_buffer(buffer: &str, c: char) -> bool {
    let mut chars = buffer.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => only.to_lowercase().eq(c.to_lowercase()),
        _ => false,
    }
}

/// "Banana, 2 of 3", or "No items" for an empty list.
pub(crate) fn item_announcement(label: Option<&str>, index: usize, count: usize, config: &NavConfig) -> String {
    match label {
        Some(label) if count > 0 => format!("{label}{}", position_suffix(index, count, config)),
        _ => "No items".to_string(),
    }
}

/// Log a data-source failure and tell the user the menu is gone for good.
pub(crate) fn announce_disabled(title: &str, err: &NavError, cx: &mut NavContext<'_>) {
    tracing::error!(menu = %title, error = %err, "menu source failed, disabling");
    cx.interrupt(&format!("{title} unavailable, feature disabled for this session"));
}

/// Log an action failure and report it. The menu stays usable.
pub(crate) fn announce_action_failure(title: &str, err: &NavError, cx: &mut NavContext<'_>) {
    tracing::warn!(menu = %title, error = %err, "menu action failed");
    cx.interrupt(&format!("Action failed: {err}"));
}
