//! Description cleaner — strip marker vocabulary and normalize whitespace.

use crate::pages::RE_PAGE_MARKER;
use crate::patterns::Patterns;

/// Remove section labels and page markers, collapse whitespace runs to one
/// space, and trim.
///
/// Removal repeats until nothing is left to remove, so text such as
/// `SEE SEE ALSO: ALSO:` does not leave a fresh label behind. The result is a
/// fixed point: `clean(clean(x)) == clean(x)`.
pub fn clean(text: &str, patterns: &Patterns) -> String {
    let mut current = collapse_whitespace(text);
    loop {
        let without_pages = RE_PAGE_MARKER.replace_all(&current, "");
        let without_labels = patterns.labels.replace_all(&without_pages, "");
        let next = collapse_whitespace(&without_labels);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
