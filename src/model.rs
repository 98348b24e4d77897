//! Data model for the extracted reference manual — format-agnostic.
//!
//! Every entity is built once during extraction and owned by its parent.
//! Child sequences keep source-text order.

use serde::{Serialize, Serializer};

/// Complete extracted document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub description: String,
    #[serde(rename = "metadata", serialize_with = "as_metadata")]
    pub total_pages: u32,
    pub namespaces: Vec<Namespace>,
    #[serde(rename = "dmlOperations", serialize_with = "as_dml_operations")]
    pub statements: Vec<Statement>,
}

impl Document {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.description.is_empty()
            && self.total_pages == 0
            && self.namespaces.is_empty()
            && self.statements.is_empty()
    }
}

/// A `X Namespace` section.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    pub name: String,
    pub description: String,
    #[serde(rename = "pageRange")]
    pub page_range: PageRange,
    pub classes: Vec<Class>,
}

/// A `Y Class` section inside a namespace.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Class {
    pub name: String,
    pub description: String,
    #[serde(rename = "pageRange")]
    pub page_range: PageRange,
    pub methods: Vec<Method>,
}

/// A method introduced by a visibility-qualified signature line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    /// The heading line as it appears in the text.
    pub signature: String,
    pub description: String,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    /// Empty for constructors and unparseable signatures.
    pub return_type: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

/// A DML statement block (`Insert Statement`, ...), sibling to namespaces.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub name: String,
    pub description: String,
    pub syntax: Vec<String>,
    pub example: String,
    #[serde(rename = "pageRange")]
    pub page_range: PageRange,
}

/// Inclusive page range. `0` on either side means no marker was found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn is_known(&self) -> bool {
        self.start != 0 || self.end != 0
    }
}

fn as_metadata<S: Serializer>(total_pages: &u32, s: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Metadata {
        #[serde(rename = "totalPages")]
        total_pages: u32,
    }
    Metadata {
        total_pages: *total_pages,
    }
    .serialize(s)
}

fn as_dml_operations<S: Serializer>(statements: &[Statement], s: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct DmlOperations<'a> {
        statements: &'a [Statement],
    }
    DmlOperations { statements }.serialize(s)
}
