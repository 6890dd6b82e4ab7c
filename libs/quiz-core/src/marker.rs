//! Section marker lines: `#` and `# Correct`.
//!
//! A body line that would read as a marker is written with one extra
//! leading backslash and read back with one removed, so `#` in prompt or
//! answer text survives a round trip. Lines inside fenced code are left
//! alone since the parser never treats them as markers.

use crate::fence::{fence_tag, is_fence_close};

pub(crate) const MARKER: &str = "#";
pub(crate) const CORRECT_MARKER: &str = "# Correct";

const ESCAPE: char = '\\';

/// `Some(is_correct)` when the line is a section marker.
pub(crate) fn marker_kind(line: &str) -> Option<bool> {
    match line.trim_end() {
        MARKER => Some(false),
        CORRECT_MARKER => Some(true),
        _ => None,
    }
}

/// A marker preceded by one or more backslashes.
pub(crate) fn is_escaped_marker(line: &str) -> bool {
    line.starts_with(ESCAPE) && marker_kind(line.trim_start_matches(ESCAPE)).is_some()
}

/// Escape every marker-shaped line outside a fence.
pub(crate) fn escape_markers(text: &str) -> String {
    let mut in_fence = false;
    text.lines()
        .map(|line| {
            if in_fence {
                in_fence = !is_fence_close(line);
                line.to_string()
            } else if fence_tag(line).is_some() {
                in_fence = true;
                line.to_string()
            } else if marker_kind(line).is_some() || is_escaped_marker(line) {
                format!("{}{}", ESCAPE, line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Undo [`escape_markers`] for a single line read outside a fence.
pub(crate) fn unescape_marker(line: &str) -> &str {
    if is_escaped_marker(line) {
        &line[ESCAPE.len_utf8()..]
    } else {
        line
    }
}
