//! Signature analyzer — split a method signature line into modifiers, return
//! type, name and parameters.
//!
//! Brackets of every kind (`()`, `<>`, `[]`) share one depth counter; commas
//! and spaces only separate tokens at depth zero, so a parameter typed
//! `Map<Id, List<String>>` stays in one piece.

use crate::model::Parameter;
use crate::patterns::Patterns;

/// Tokenized signature. Fields that could not be recognized are empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Signature {
    pub modifiers: Vec<String>,
    pub return_type: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
}

/// Outcome of [`parse_signature`]. Both arms carry a usable [`Signature`];
/// `Partial` means the line lacked a name or a closed parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParse {
    Complete(Signature),
    Partial(Signature),
}

impl SignatureParse {
    pub fn is_complete(&self) -> bool {
        matches!(self, SignatureParse::Complete(_))
    }

    pub fn signature(&self) -> &Signature {
        match self {
            SignatureParse::Complete(s) | SignatureParse::Partial(s) => s,
        }
    }

    pub fn into_signature(self) -> Signature {
        match self {
            SignatureParse::Complete(s) | SignatureParse::Partial(s) => s,
        }
    }
}

/// Parse one signature line.
///
/// ```text
/// public static List<Map<Id, String>> getThing(Integer i, String s)
/// ^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^
///   modifiers        return type        name       parameters
/// ```
pub fn parse_signature(line: &str, patterns: &Patterns) -> SignatureParse {
    let line = line.trim();
    let mut sig = Signature::default();

    let Some(open) = line.find('(') else {
        sig.modifiers = leading_modifiers(line, patterns).0;
        return SignatureParse::Partial(sig);
    };

    let head = line[..open].trim_end();
    let name_start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(head.len());
    sig.name = head[name_start..].to_string();

    let prefix = &head[..name_start];
    let (modifiers, rest_at) = leading_modifiers(prefix, patterns);
    sig.modifiers = modifiers;
    sig.return_type = prefix[rest_at..].trim().to_string();

    let close = matching_paren(line, open);
    let inner = match close {
        Some(close) => &line[open + 1..close],
        None => &line[open + 1..],
    };
    sig.parameters = split_top_level(inner, ',')
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(parse_parameter)
        .collect();

    // `public static (x` has no name; `static` is a modifier, not one.
    if patterns.is_modifier(&sig.name) {
        let word = std::mem::take(&mut sig.name);
        if sig.return_type.is_empty() {
            sig.modifiers.push(word);
        }
    }

    if sig.name.is_empty() || close.is_none() {
        SignatureParse::Partial(sig)
    } else {
        SignatureParse::Complete(sig)
    }
}

/// Recognized modifiers at the front of `s`, and the offset where the rest
/// begins.
fn leading_modifiers(s: &str, patterns: &Patterns) -> (Vec<String>, usize) {
    let mut modifiers = Vec::new();
    let mut rest_at = 0;
    for (at, word) in words(s) {
        if !patterns.is_modifier(word) {
            break;
        }
        modifiers.push(word.to_string());
        rest_at = at + word.len();
    }
    (modifiers, rest_at)
}

/// One parameter token: the last word is the name, the rest is the type.
fn parse_parameter(token: &str) -> Parameter {
    let parts = words(token);
    match parts.last() {
        Some(&(at, name)) if parts.len() > 1 => Parameter {
            ty: token[..at].trim().to_string(),
            name: name.to_string(),
        },
        Some(&(_, name)) => Parameter {
            ty: String::new(),
            name: name.to_string(),
        },
        None => Parameter::default(),
    }
}

fn is_open(c: char) -> bool {
    matches!(c, '(' | '<' | '[')
}

fn is_close(c: char) -> bool {
    matches!(c, ')' | '>' | ']')
}

/// Byte offset of the `)` closing the `(` at `open`.
fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut depth: u32 = 0;
    for (i, c) in s[open..].char_indices() {
        if is_open(c) {
            depth += 1;
        } else if is_close(c) {
            depth = depth.saturating_sub(1);
            if depth == 0 && c == ')' {
                return Some(open + i);
            }
        }
    }
    None
}

/// Split on `delimiter` at bracket depth zero. Pieces are trimmed.
fn split_top_level(s: &str, delimiter: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth: u32 = 0;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if is_open(c) {
            depth += 1;
        } else if is_close(c) {
            depth = depth.saturating_sub(1);
        } else if c == delimiter && depth == 0 {
            pieces.push(s[start..i].trim());
            start = i + c.len_utf8();
        }
    }
    pieces.push(s[start..].trim());
    pieces
}

/// Whitespace-separated words at bracket depth zero, with their offsets.
fn words(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut depth: u32 = 0;
    let mut start: Option<usize> = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() && depth == 0 {
            if let Some(st) = start.take() {
                out.push((st, &s[st..i]));
            }
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
        if is_open(c) {
            depth += 1;
        } else if is_close(c) {
            depth = depth.saturating_sub(1);
        }
    }
    if let Some(st) = start {
        out.push((st, &s[st..]));
    }
    out
}
