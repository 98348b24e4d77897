//! Document assembler — one pass over the whole text per top-level category,
//! plus document-level title, description and page total.

use crate::clean::collapse_whitespace;
use crate::extract::{describe, extract_namespaces, extract_statements};
use crate::model::Document;
use crate::pages::page_total;
use crate::patterns::Patterns;
use crate::scanner::Span;
use std::borrow::Cow;
use tracing::{debug, info};

/// Parse with the built-in Apex Reference Guide vocabulary.
pub fn parse(text: &str) -> Document {
    parse_with(text, Patterns::apex())
}

/// Parse `text` into a [`Document`]. Empty or whitespace-only input gives an
/// empty document.
pub fn parse_with(text: &str, patterns: &Patterns) -> Document {
    if text.trim().is_empty() {
        debug!("empty input");
        return Document::default();
    }
    let text = normalize_newlines(text);
    let full = Span::full(&text);

    // Namespaces and statements are independent top-level categories; each is
    // scanned over the whole text and bounds its own nested scans.
    let namespaces = extract_namespaces(&text, full, patterns);
    let statements = extract_statements(&text, full, patterns);

    let doc = Document {
        title: patterns
            .title
            .find(&text)
            .map(|m| collapse_whitespace(m.as_str()))
            .unwrap_or_default(),
        description: intro(&text, patterns),
        total_pages: page_total(&text),
        namespaces,
        statements,
    };
    info!(
        namespaces = doc.namespaces.len(),
        statements = doc.statements.len(),
        pages = doc.total_pages,
        "document parsed"
    );
    doc
}

/// The introductory paragraph: from the first intro match to the next
/// paragraph break, section marker or heading line. Cleaned.
fn intro(text: &str, patterns: &Patterns) -> String {
    match patterns.intro.find(text) {
        Some(m) => describe(text, m.start(), text.len(), patterns),
        None => String::new(),
    }
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
