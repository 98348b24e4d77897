//! Boundary scanner — locate line-anchored headings and the content span each
//! one owns.
//!
//! A heading's span runs from its first byte to the start of the next heading
//! of the same pattern, or to the end of the scanned range. Scans always take
//! an explicit [`Span`] into one immutable buffer; a nested scan passes its
//! parent's span so nothing outside it is ever considered.

use regex::Regex;
use tracing::trace;

/// Half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    /// The whole of `text`.
    pub fn full(text: &str) -> Self {
        Self::new(0, text.len())
    }

    /// Slice `text` by this span.
    pub fn of<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// One heading occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Capture group 1, or the whole match when the pattern has no group.
    pub label: String,
    /// Where the heading match begins.
    pub heading_start: usize,
    /// Where the heading match ends.
    pub heading_end: usize,
    /// Where this heading's content stops: the next sibling heading, or the
    /// end of the scanned range.
    pub span_end: usize,
}

impl Boundary {
    /// The heading together with its content.
    pub fn span(&self) -> Span {
        Span::new(self.heading_start, self.span_end)
    }
}

/// Scan the whole of `text` for `heading`.
pub fn find_boundaries(text: &str, heading: &Regex) -> Vec<Boundary> {
    find_boundaries_within(text, heading, Span::full(text))
}

/// Scan `within` for `heading`. Offsets in the result are absolute offsets
/// into `text`.
///
/// Matches that do not start a line, or that run past `within.end`, are not
/// headings. Line starts are judged against the full text, so a range that
/// begins mid-line does not turn its first byte into a line start.
pub fn find_boundaries_within(text: &str, heading: &Regex, within: Span) -> Vec<Boundary> {
    // Cutting the haystack at the range end keeps every search linear in the
    // range. Ranges end at line starts or at the end of the text.
    let haystack = &text[..within.end];
    let mut found: Vec<(String, usize, usize)> = Vec::new();
    let mut pos = within.start;

    while pos < within.end {
        let Some(caps) = heading.captures_at(haystack, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        if whole.start() >= within.end || whole.end() > within.end {
            break;
        }

        if is_line_start(text, whole.start()) && !whole.is_empty() {
            let label = caps.get(1).unwrap_or(whole).as_str().trim().to_string();
            trace!(label = %label, at = whole.start(), "heading");
            found.push((label, whole.start(), whole.end()));
            // A heading owns its whole line; the next one starts on a later line.
            pos = if is_line_start(text, whole.end()) {
                whole.end()
            } else {
                next_line(text, whole.end())
            };
        } else {
            // Nothing matched earlier on this line, so resume at the next one.
            pos = next_line(text, whole.start());
        }
    }

    let mut boundaries = Vec::with_capacity(found.len());
    for (i, (label, heading_start, heading_end)) in found.iter().enumerate() {
        let span_end = found
            .get(i + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(within.end);
        boundaries.push(Boundary {
            label: label.clone(),
            heading_start: *heading_start,
            heading_end: *heading_end,
            span_end,
        });
    }
    boundaries
}

/// True when `pos` is the first byte of a line.
pub fn is_line_start(text: &str, pos: usize) -> bool {
    pos == 0 || text.as_bytes().get(pos - 1) == Some(&b'\n')
}

/// Offset just past the newline ending the line containing `pos`, or the text
/// length on the last line.
pub fn next_line(text: &str, pos: usize) -> usize {
    match text[pos..].find('\n') {
        Some(i) => pos + i + 1,
        None => text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ns() -> Regex {
        regex::RegexBuilder::new(r"^(\w+) Namespace$")
            .multi_line(true)
            .build()
            .unwrap()
    }

    #[test]
    fn spans_run_to_next_heading() {
        let text = "A Namespace\nbody a\nB Namespace\nbody b\n";
        let b = find_boundaries(text, &ns());
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].label, "A");
        assert_eq!(b[0].heading_start, 0);
        assert_eq!(b[0].heading_end, 11);
        assert_eq!(b[0].span_end, 19);
        assert_eq!(&text[b[0].heading_end..b[0].span_end], "\nbody a\n");
        assert_eq!(b[1].label, "B");
        assert_eq!(b[1].span_end, text.len());
    }

    #[test]
    fn no_headings_is_empty() {
        assert!(find_boundaries("plain text\n", &ns()).is_empty());
        assert!(find_boundaries("", &ns()).is_empty());
    }

    #[test]
    fn unanchored_pattern_still_requires_line_start() {
        let re = Regex::new(r"(\w+) Class").unwrap();
        let text = "see the Foo Class docs\nBar Class\n";
        let b = find_boundaries(text, &re);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].label, "Bar");
    }

    #[test]
    fn mid_line_match_is_not_a_heading() {
        let re = Regex::new(r"Namespace").unwrap();
        let text = "System Namespace\nNamespace\n";
        let b = find_boundaries(text, &re);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].heading_start, 17);
    }

    #[test]
    fn bounded_scan_ignores_matches_outside_range() {
        let text = "A Namespace\nx\nB Namespace\ny\nC Namespace\n";
        let inner = Span::new(12, 28);
        let b = find_boundaries_within(text, &ns(), inner);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].label, "B");
        assert_eq!(b[0].span_end, 28);
    }

    #[test]
    fn match_crossing_range_end_is_rejected() {
        let text = "A Namespace\n";
        let b = find_boundaries_within(text, &ns(), Span::new(0, 5));
        assert!(b.is_empty());
    }

    #[test]
    fn range_starting_mid_line_does_not_create_line_start() {
        let re = Regex::new(r"Namespace").unwrap();
        let text = "Apex Namespace\n";
        let b = find_boundaries_within(text, &re, Span::new(5, text.len()));
        assert!(b.is_empty());
    }

    #[test]
    fn label_falls_back_to_whole_match() {
        let re = regex::RegexBuilder::new(r"^Usage$")
            .multi_line(true)
            .build()
            .unwrap();
        let b = find_boundaries("Usage\ntext\n", &re);
        assert_eq!(b[0].label, "Usage");
    }

    #[test]
    fn line_helpers() {
        let text = "ab\ncd\nef";
        assert_eq!(next_line(text, 0), 3);
        assert_eq!(next_line(text, 4), 6);
        assert_eq!(next_line(text, 7), text.len());
    }

    #[test]
    fn multibyte_text_is_scanned_safely() {
        let re = Regex::new(r"Zürich Namespace").unwrap();
        let text = "é Zürich Namespace\nZürich Namespace\n";
        let b = find_boundaries(text, &re);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].heading_start, text.find('\n').unwrap() + 1);
    }
}
