//! Section extractor — recursive descent over heading levels.
//!
//! Every level works on a [`Span`] of the same source buffer:
//!
//! ```text
//! document ─┬─ namespace span ─── class span ─── method span
//!           └─ statement span
//! ```
//!
//! A child scan only ever sees the part of its parent's span that follows the
//! parent heading, so a heading that appears after the next sibling of its
//! parent can never be attached to the wrong parent.

use crate::clean::clean;
use crate::model::{Class, Method, Namespace, Statement};
use crate::pages::{page_range, strip_page_markers};
use crate::patterns::Patterns;
use crate::scanner::{find_boundaries_within, is_line_start, next_line, Boundary, Span};
use crate::signature::parse_signature;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// A line break followed by a whitespace-only line.
static RE_PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\r?\n").unwrap());

/// Namespaces headed inside `within`, each with its classes.
pub fn extract_namespaces(text: &str, within: Span, patterns: &Patterns) -> Vec<Namespace> {
    find_boundaries_within(text, &patterns.namespace, within)
        .iter()
        .map(|b| build_namespace(text, b, patterns))
        .collect()
}

/// Classes headed inside `within`, each with its methods.
pub fn extract_classes(text: &str, within: Span, patterns: &Patterns) -> Vec<Class> {
    find_boundaries_within(text, &patterns.class, within)
        .iter()
        .map(|b| build_class(text, b, patterns))
        .collect()
}

/// Methods whose signature line starts inside `within`.
pub fn extract_methods(text: &str, within: Span, patterns: &Patterns) -> Vec<Method> {
    find_boundaries_within(text, &patterns.method, within)
        .iter()
        .map(|b| build_method(text, b, patterns))
        .collect()
}

/// DML statement blocks headed inside `within`.
pub fn extract_statements(text: &str, within: Span, patterns: &Patterns) -> Vec<Statement> {
    find_boundaries_within(text, &patterns.statement, within)
        .iter()
        .map(|b| build_statement(text, b, patterns))
        .collect()
}

fn build_namespace(text: &str, b: &Boundary, patterns: &Patterns) -> Namespace {
    let rest = rest_of_span(text, b);
    let class_bounds = find_boundaries_within(text, &patterns.class, rest);
    let stop = class_bounds
        .first()
        .map(|c| c.heading_start)
        .unwrap_or(b.span_end);

    let namespace = Namespace {
        name: b.label.clone(),
        description: describe(text, rest.start, stop, patterns),
        page_range: page_range(text, b.span()),
        classes: class_bounds
            .iter()
            .map(|c| build_class(text, c, patterns))
            .collect(),
    };
    debug!(
        namespace = %namespace.name,
        classes = namespace.classes.len(),
        "extracted namespace"
    );
    namespace
}

fn build_class(text: &str, b: &Boundary, patterns: &Patterns) -> Class {
    let rest = rest_of_span(text, b);
    let method_bounds = find_boundaries_within(text, &patterns.method, rest);
    let stop = method_bounds
        .first()
        .map(|m| m.heading_start)
        .unwrap_or(b.span_end);

    let class = Class {
        name: format!("{} Class", b.label),
        description: describe(text, rest.start, stop, patterns),
        page_range: page_range(text, b.span()),
        methods: method_bounds
            .iter()
            .map(|m| build_method(text, m, patterns))
            .collect(),
    };
    debug!(class = %class.name, methods = class.methods.len(), "extracted class");
    class
}

fn build_method(text: &str, b: &Boundary, patterns: &Patterns) -> Method {
    let line_end = text[b.heading_start..b.span_end]
        .find('\n')
        .map(|i| b.heading_start + i)
        .unwrap_or(b.span_end);
    let signature_line = text[b.heading_start..line_end].trim();

    let parsed = parse_signature(signature_line, patterns);
    if !parsed.is_complete() {
        debug!(signature = %signature_line, "partial signature");
    }
    let sig = parsed.into_signature();

    let rest = rest_of_span(text, b);
    let return_block = patterns.return_type.captures_at(&text[..b.span_end], rest.start);

    let mut description = describe(text, rest.start, b.span_end, patterns);
    if description.is_empty() {
        if let Some(block) = return_block.as_ref().and_then(|caps| caps.get(0)) {
            let after = next_line(text, block.end()).min(b.span_end);
            description = describe(text, after, b.span_end, patterns);
        }
    }

    let return_type = if sig.return_type.is_empty() {
        return_block
            .as_ref()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    } else {
        sig.return_type
    };

    Method {
        name: if sig.name.is_empty() && !patterns.is_modifier(&b.label) {
            b.label.clone()
        } else {
            sig.name
        },
        signature: signature_line.to_string(),
        description,
        modifiers: sig.modifiers,
        parameters: sig.parameters,
        return_type,
    }
}

fn build_statement(text: &str, b: &Boundary, patterns: &Patterns) -> Statement {
    let rest = rest_of_span(text, b);

    let syntax = keyword_block(text, &patterns.syntax, rest, patterns)
        .map(|block| {
            block
                .of(text)
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| strip_page_markers(l).trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let example = keyword_block(text, &patterns.example, rest, patterns)
        .map(|block| strip_page_markers(block.of(text)).trim().to_string())
        .unwrap_or_default();

    let statement = Statement {
        name: format!("{} Statement", b.label),
        description: describe(text, rest.start, b.span_end, patterns),
        syntax,
        example,
        page_range: page_range(text, b.span()),
    };
    debug!(
        statement = %statement.name,
        syntax_lines = statement.syntax.len(),
        "extracted statement"
    );
    statement
}

/// The part of a heading's span after the heading line.
fn rest_of_span(text: &str, b: &Boundary) -> Span {
    let start = if is_line_start(text, b.heading_end) {
        b.heading_end
    } else {
        next_line(text, b.heading_end)
    };
    Span::new(start.min(b.span_end), b.span_end)
}

/// Cleaned first paragraph starting at `from`, never reaching past `stop`.
pub(crate) fn describe(text: &str, from: usize, stop: usize, patterns: &Patterns) -> String {
    let from = skip_blank_lines(text, from, stop);
    let end = paragraph_end(text, from, stop, patterns);
    clean(text[from..end].trim(), patterns)
}

/// Where the paragraph beginning at `from` ends: the first blank line,
/// line-leading section marker or heading line, capped at `stop`.
fn paragraph_end(text: &str, from: usize, stop: usize, patterns: &Patterns) -> usize {
    let from = from.min(stop);
    let haystack = &text[..stop];
    let blank = RE_PARAGRAPH_BREAK.find_at(haystack, from).map(|m| m.start());
    let marker = patterns.terminator.find_at(haystack, from).map(|m| m.start());
    let end = [blank, marker]
        .into_iter()
        .flatten()
        .fold(stop, usize::min)
        .max(from);
    first_heading(text, Span::new(from, end), patterns).unwrap_or(end)
}

/// Start of the first namespace, class or statement heading inside `within`.
fn first_heading(text: &str, within: Span, patterns: &Patterns) -> Option<usize> {
    [&patterns.namespace, &patterns.class, &patterns.statement]
        .into_iter()
        .filter_map(|re| {
            find_boundaries_within(text, re, within)
                .first()
                .map(|b| b.heading_start)
        })
        .min()
}

/// First offset at or after `from` that is not on a whitespace-only line.
fn skip_blank_lines(text: &str, mut from: usize, stop: usize) -> usize {
    while from < stop {
        let line_end = next_line(text, from).min(stop);
        if !text[from..line_end].trim().is_empty() {
            break;
        }
        from = line_end;
    }
    from
}

/// The paragraph following a line matched by `keyword` inside `within`.
fn keyword_block(text: &str, keyword: &Regex, within: Span, patterns: &Patterns) -> Option<Span> {
    let m = keyword.find_at(&text[..within.end], within.start)?;
    let from = skip_blank_lines(text, next_line(text, m.end()).min(within.end), within.end);
    let end = paragraph_end(text, from, within.end, patterns);
    Some(Span::new(from, end))
}
