//! Stateless navigation arithmetic.
//!
//! Every function here is pure: it takes an index, a count or a slice, and
//! returns a new index. Menus own their cursor; these helpers only decide
//! where it moves.
//!
//! The tree helpers work over a *flattened* hierarchy, where each entry
//! carries an indent level and children directly follow their parent with a
//! deeper level:
//!
//! ```text
//! 0  Food            (0)
//! 1    Meals         (1)
//! 2      Simple meal (2)
//! 3    Raw food      (1)
//! 4  Weapons         (0)
//! ```
//!
//! The indent level is supplied by a projection closure, so the helpers do
//! not care what the tree represents.

use crate::config::NavConfig;

/// Move one step forward. Clamps at the last index, or wraps to 0 if `wrap`.
///
/// An empty collection always yields 0.
pub fn select_next(index: usize, count: usize, wrap: bool) -> usize {
    if count == 0 {
        return 0;
    }
    if index + 1 >= count {
        if wrap {
            0
        } else {
            count - 1
        }
    } else {
        index + 1
    }
}

/// Move one step back. Clamps at 0, or wraps to the last index if `wrap`.
pub fn select_previous(index: usize, count: usize, wrap: bool) -> usize {
    if count == 0 {
        return 0;
    }
    if index == 0 || index >= count {
        if wrap || index >= count {
            count - 1
        } else {
            0
        }
    } else {
        index - 1
    }
}

/// Clamp a possibly stale index into `0..count`. `None` for an empty
/// collection.
pub fn clamp_index(index: usize, count: usize) -> Option<usize> {
    if count == 0 {
        None
    } else {
        Some(index.min(count - 1))
    }
}

/// Format a zero-based index as "X of Y".
pub fn format_position(index: usize, count: usize) -> String {
    format!("{} of {}", index + 1, count)
}

/// The `", X of Y"` suffix for an announcement, or an empty string when
/// position announcements are turned off.
pub fn position_suffix(index: usize, count: usize, config: &NavConfig) -> String {
    if config.announce_position && count > 0 {
        format!(", {}", format_position(index, count))
    } else {
        String::new()
    }
}

/// Nearest entry before `index` with a strictly lower indent level.
///
/// `None` at indent 0, or when no such entry exists.
pub fn find_parent_index<T>(
    items: &[T],
    index: usize,
    level_of: impl Fn(&T) -> usize,
) -> Option<usize> {
    let level = level_of(items.get(index)?);
    if level == 0 {
        return None;
    }
    items[..index]
        .iter()
        .rposition(|item| level_of(item) < level)
}

/// Bounds `(start, end)` of the span holding `index` and its siblings.
///
/// The span runs until an entry with a lower indent level (or a list edge)
/// on each side. Deeper entries inside the span are descendants of siblings.
fn sibling_span<T>(items: &[T], index: usize, level_of: &impl Fn(&T) -> usize) -> (usize, usize) {
    let level = level_of(&items[index]);
    let start = items[..index]
        .iter()
        .rposition(|item| level_of(item) < level)
        .map_or(0, |parent| parent + 1);
    let end = items[index + 1..]
        .iter()
        .position(|item| level_of(item) < level)
        .map_or(items.len() - 1, |offset| index + offset);
    (start, end)
}

/// 1-based position of `index` among its siblings, and the sibling count.
pub fn sibling_position<T>(
    items: &[T],
    index: usize,
    level_of: impl Fn(&T) -> usize,
) -> Option<(usize, usize)> {
    let level = level_of(items.get(index)?);
    let (start, end) = sibling_span(items, index, &level_of);
    let siblings = &items[start..=end];
    let position = siblings[..=index - start]
        .iter()
        .filter(|item| level_of(item) == level)
        .count();
    let total = siblings
        .iter()
        .filter(|item| level_of(item) == level)
        .count();
    Some((position, total))
}

/// Index of the first sibling of `index`.
pub fn first_sibling<T>(items: &[T], index: usize, level_of: impl Fn(&T) -> usize) -> Option<usize> {
    let level = level_of(items.get(index)?);
    let (start, end) = sibling_span(items, index, &level_of);
    (start..=end).find(|&i| level_of(&items[i]) == level)
}

/// Index of the last sibling of `index`.
pub fn last_sibling<T>(items: &[T], index: usize, level_of: impl Fn(&T) -> usize) -> Option<usize> {
    let level = level_of(items.get(index)?);
    let (start, end) = sibling_span(items, index, &level_of);
    (start..=end).rev().find(|&i| level_of(&items[i]) == level)
}

/// Expand-aware End key.
///
/// If the entry at `index` is expanded and has children, jump to its last
/// visible descendant. Otherwise jump to its last sibling.
pub fn tree_end<T>(
    items: &[T],
    index: usize,
    level_of: impl Fn(&T) -> usize,
    expanded_with_children: impl Fn(&T) -> bool,
) -> Option<usize> {
    let item = items.get(index)?;
    if expanded_with_children(item) {
        let level = level_of(item);
        let descendants = items[index + 1..]
            .iter()
            .take_while(|child| level_of(child) > level)
            .count();
        if descendants > 0 {
            return Some(index + descendants);
        }
    }
    last_sibling(items, index, level_of)
}
