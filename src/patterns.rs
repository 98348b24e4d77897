//! Pattern vocabulary — every heading pattern and marker word the extractor
//! recognizes, compiled once into an immutable [`Patterns`] value.
//!
//! Defaults describe the Apex Reference Guide. A TOML file may override any
//! key; missing keys keep their default:
//!
//! ```toml
//! namespace = '^([A-Z][a-zA-Z]+)[ \t]+Namespace[ \t]*$'
//! section_labels = ["IN THIS SECTION:", "SEE ALSO:"]
//! ```

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

/// Errors raised while loading or compiling a pattern configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read pattern file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid pattern `{key}`: {source}")]
    Pattern {
        key: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

/// Raw, uncompiled pattern vocabulary as written in a config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternConfig {
    /// Document title, first match anywhere.
    pub title: String,
    /// Start of the introductory paragraph.
    pub intro: String,
    pub namespace: String,
    pub class: String,
    pub method: String,
    pub statement: String,
    /// Section labels stripped from descriptions; they also end a description.
    pub section_labels: Vec<String>,
    /// Line-leading keywords that end a description.
    pub section_keywords: Vec<String>,
    /// Signature modifiers, matched case-insensitively.
    pub modifiers: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            title: r"APEX\s+REFERENCE\s+GUIDE".to_string(),
            intro: r"Apex is a strongly typed".to_string(),
            namespace: r"^([A-Z][a-zA-Z]+)[ \t]+Namespace[ \t]*$".to_string(),
            class: r"^([A-Z][a-zA-Z]+)[ \t]+Class[ \t]*$".to_string(),
            method: r"^[ \t]*(?:public|private|protected|global)[ \t]+[^\n(]*?(\w+)[ \t]*\("
                .to_string(),
            statement: r"^([A-Z][a-zA-Z]+)[ \t]+Statement[ \t]*$".to_string(),
            section_labels: to_strings(&["IN THIS SECTION:", "SEE ALSO:"]),
            section_keywords: to_strings(&[
                "Signature",
                "Parameters",
                "Return Value",
                "Usage",
                "Example",
                "Syntax",
                "Versioned Behavior Changes",
            ]),
            modifiers: to_strings(&[
                "public",
                "private",
                "protected",
                "global",
                "static",
                "final",
                "abstract",
                "virtual",
                "override",
                "transient",
                "webservice",
                "testmethod",
            ]),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Compiled pattern vocabulary. Immutable once built; share it by reference.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub title: Regex,
    pub intro: Regex,
    pub namespace: Regex,
    pub class: Regex,
    pub method: Regex,
    pub statement: Regex,
    /// Line-anchored `Syntax` keyword opening a statement's syntax block.
    pub syntax: Regex,
    /// Line-anchored `Example` keyword opening a statement's example block.
    pub example: Regex,
    /// `Return Value` block followed by a `Type:` line.
    pub return_type: Regex,
    /// Any section label, anywhere in a line.
    pub labels: Regex,
    /// Any section label or keyword at the start of a line.
    pub terminator: Regex,
    modifiers: Vec<String>,
}

static DEFAULT: LazyLock<Patterns> = LazyLock::new(|| {
    Patterns::from_config(&PatternConfig::default()).expect("default patterns compile")
});

impl Patterns {
    /// The built-in Apex Reference Guide vocabulary.
    pub fn apex() -> &'static Patterns {
        &DEFAULT
    }

    /// Validate and compile a configuration.
    pub fn from_config(config: &PatternConfig) -> Result<Self, ConfigError> {
        if let Some(empty) = config
            .section_labels
            .iter()
            .chain(&config.section_keywords)
            .chain(&config.modifiers)
            .find(|w| w.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "marker words must not be blank (got {:?})",
                empty
            )));
        }
        if config.modifiers.iter().any(|m| m.contains(char::is_whitespace)) {
            return Err(ConfigError::Validation(
                "modifiers must be single words".to_string(),
            ));
        }

        let labels_alt = alternation(&config.section_labels);
        let keywords: Vec<String> = config
            .section_labels
            .iter()
            .chain(&config.section_keywords)
            .map(|w| keyword(w))
            .collect();
        let keywords_alt = if keywords.is_empty() {
            NEVER.to_string()
        } else {
            keywords.join("|")
        };

        Ok(Self {
            title: compile("title", &config.title)?,
            intro: compile("intro", &config.intro)?,
            namespace: compile("namespace", &config.namespace)?,
            class: compile("class", &config.class)?,
            method: compile("method", &config.method)?,
            statement: compile("statement", &config.statement)?,
            syntax: compile("syntax", r"^[ \t]*Syntax[ \t]*$")?,
            example: compile("example", r"^[ \t]*Example[ \t]*$")?,
            return_type: compile(
                "return_type",
                r"^[ \t]*Return Value[ \t]*\n(?:[ \t]*\n)*[ \t]*Type:[ \t]*([\w.<>\[\], ]*[\w>\]])",
            )?,
            labels: compile("section_labels", &labels_alt)?,
            terminator: compile(
                "section_keywords",
                &format!(r"^[ \t]*(?:{})", keywords_alt),
            )?,
            modifiers: config.modifiers.iter().map(|m| m.to_lowercase()).collect(),
        })
    }

    /// Read and compile a TOML pattern file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Compile a TOML pattern document.
    pub fn parse(toml_text: &str) -> Result<Self, ConfigError> {
        let config: PatternConfig = toml::from_str(toml_text)?;
        Self::from_config(&config)
    }

    pub fn is_modifier(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.modifiers.iter().any(|m| *m == lower)
    }
}

/// A pattern that never matches.
const NEVER: &str = r"\b\B";

fn compile(key: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|source| ConfigError::Pattern { key, source })
}

fn alternation(words: &[String]) -> String {
    if words.is_empty() {
        return NEVER.to_string();
    }
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Escaped keyword with a trailing word boundary when it ends in a word char,
/// so `Example` does not match `Examples of ...`.
fn keyword(word: &str) -> String {
    let escaped = regex::escape(word);
    match word.chars().last() {
        Some(c) if c.is_alphanumeric() || c == '_' => format!(r"{}\b", escaped),
        _ => escaped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_compiles() {
        let p = Patterns::apex();
        assert!(p.namespace.is_match("System Namespace"));
        assert!(p.class.is_match("Database Class\n"));
        assert!(p.statement.is_match("Insert Statement"));
        assert!(p.title.is_match("APEX REFERENCE\nGUIDE"));
    }

    #[test]
    fn method_pattern_captures_name_before_paren() {
        let caps = Patterns::apex()
            .method
            .captures("public List<Map<Id, String>> getThing(Integer i)")
            .unwrap();
        assert_eq!(&caps[1], "getThing");
    }

    #[test]
    fn terminator_requires_line_start() {
        let p = Patterns::apex();
        assert!(p.terminator.is_match("text\nUsage\nmore"));
        assert!(p.terminator.is_match("  SEE ALSO:"));
        assert!(!p.terminator.is_match("see the Usage notes"));
        assert!(!p.terminator.is_match("Examples of use"));
    }

    #[test]
    fn modifiers_are_case_insensitive() {
        let p = Patterns::apex();
        assert!(p.is_modifier("PUBLIC"));
        assert!(p.is_modifier("testMethod"));
        assert!(!p.is_modifier("String"));
    }

    #[test]
    fn toml_overrides_single_key() {
        let p = Patterns::parse(r#"namespace = '^(\w+) Package$'"#).unwrap();
        assert!(p.namespace.is_match("Auth Package"));
        assert!(!p.namespace.is_match("Auth Namespace"));
        // untouched keys keep their defaults
        assert!(p.class.is_match("Database Class"));
    }

    #[test]
    fn empty_toml_is_default() {
        let p = Patterns::parse("").unwrap();
        assert!(p.namespace.is_match("System Namespace"));
    }

    #[test]
    fn invalid_regex_names_the_key() {
        let err = Patterns::parse(r#"class = '(unclosed'"#).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { key: "class", .. }));
        assert!(err.to_string().contains("`class`"));
    }

    #[test]
    fn blank_marker_rejected() {
        let err = Patterns::parse(r#"section_labels = ["  "]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = Patterns::parse(r#"namespaces = 'x'"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("patterns.toml");
        std::fs::write(&path, "modifiers = [\"public\"]\n").unwrap();
        let p = Patterns::load(&path).unwrap();
        assert!(p.is_modifier("public"));
        assert!(!p.is_modifier("static"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Patterns::load(Path::new("/nonexistent/patterns.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
