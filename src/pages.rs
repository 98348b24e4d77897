//! Page markers — `[PAGE_n]` / `[/PAGE_n]` pairs injected by the upstream text
//! extractor around each page's content.

use crate::model::PageRange;
use crate::scanner::Span;
use regex::Regex;
use std::sync::LazyLock;

static RE_PAGE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[PAGE_(\d+)\]").unwrap());

static RE_PAGE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[/PAGE_(\d+)\]").unwrap());

/// Either marker kind.
pub(crate) static RE_PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[/?PAGE_(\d+)\]").unwrap());

/// First page-open and last page-close marker inside `span`.
///
/// Each side is `0` when its marker kind is absent. When a span opens after
/// one page closes and stops before the next one closes, the two sides come
/// out inverted; they are swapped so `start <= end` still holds.
pub fn page_range(text: &str, span: Span) -> PageRange {
    let slice = span.of(text);
    let start = first_page(&RE_PAGE_OPEN, slice).unwrap_or(0);
    let end = last_page(&RE_PAGE_CLOSE, slice).unwrap_or(0);
    if start != 0 && end != 0 && start > end {
        PageRange {
            start: end,
            end: start,
        }
    } else {
        PageRange { start, end }
    }
}

/// Highest page number carried by any marker, `0` when there are none.
pub fn page_total(text: &str) -> u32 {
    RE_PAGE_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Join per-page text into one marked buffer, numbering pages from 1.
/// Pages with no text are left out but still use up their number.
pub fn mark_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        let page = page.as_ref();
        if page.trim().is_empty() {
            continue;
        }
        let n = i + 1;
        out.push_str(&format!("\n[PAGE_{n}]\n{page}\n[/PAGE_{n}]\n"));
    }
    out
}

/// Remove page markers while keeping line structure. Lines left blank by the
/// removal disappear.
pub fn strip_page_markers(text: &str) -> String {
    text.lines()
        .filter_map(|line| {
            if !RE_PAGE_MARKER.is_match(line) {
                return Some(line.to_string());
            }
            let stripped = RE_PAGE_MARKER.replace_all(line, "");
            if stripped.trim().is_empty() {
                None
            } else {
                Some(stripped.trim_end().to_string())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_page(re: &Regex, text: &str) -> Option<u32> {
    re.captures_iter(text)
        .find_map(|caps| caps[1].parse::<u32>().ok())
}

fn last_page(re: &Regex, text: &str) -> Option<u32> {
    re.captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .last()
}
