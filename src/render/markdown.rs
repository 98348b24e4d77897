//! GitHub-flavored markdown renderer.
//!
//! One heading level per tree level: `##` namespace, `###` class, `####`
//! method. DML statements follow under their own `## DML Statements` section.

use crate::model::*;
use crate::render::Renderer;
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        if !doc.title.is_empty() {
            lines.push(format!("# {}\n", doc.title));
        }
        if !doc.description.is_empty() {
            lines.push(doc.description.clone());
            lines.push(String::new());
        }
        if doc.total_pages > 0 {
            lines.push(format!("_{} pages_\n", doc.total_pages));
        }

        for ns in &doc.namespaces {
            render_namespace(&mut lines, ns);
        }

        if !doc.statements.is_empty() {
            lines.push("## DML Statements\n".to_string());
            for stmt in &doc.statements {
                render_statement(&mut lines, stmt);
            }
        }

        let mut out = lines.join("\n");
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_namespace(lines: &mut Vec<String>, ns: &Namespace) {
    lines.push(format!("## {} Namespace\n", ns.name));
    push_pages(lines, ns.page_range);
    push_paragraph(lines, &ns.description);
    for class in &ns.classes {
        lines.push(format!("### {}\n", class.name));
        push_pages(lines, class.page_range);
        push_paragraph(lines, &class.description);
        for method in &class.methods {
            render_method(lines, method);
        }
    }
}

fn render_method(lines: &mut Vec<String>, method: &Method) {
    lines.push(format!("#### {}\n", method.name));
    lines.push("```apex".to_string());
    lines.push(method.signature.clone());
    lines.push("```".to_string());
    lines.push(String::new());
    push_paragraph(lines, &method.description);

    if !method.parameters.is_empty() {
        lines.push("| Name | Type |".to_string());
        lines.push("|------|------|".to_string());
        for param in &method.parameters {
            lines.push(format!("| {} | `{}` |", param.name, escape_cell(&param.ty)));
        }
        lines.push(String::new());
    }
    if !method.return_type.is_empty() {
        lines.push(format!("Returns `{}`\n", method.return_type));
    }
}

fn render_statement(lines: &mut Vec<String>, stmt: &Statement) {
    lines.push(format!("### {}\n", stmt.name));
    push_pages(lines, stmt.page_range);
    push_paragraph(lines, &stmt.description);
    if !stmt.syntax.is_empty() {
        lines.push("#### Syntax\n".to_string());
        lines.push("```apex".to_string());
        lines.extend(stmt.syntax.iter().cloned());
        lines.push("```".to_string());
        lines.push(String::new());
    }
    if !stmt.example.is_empty() {
        lines.push("#### Example\n".to_string());
        lines.push("```apex".to_string());
        lines.push(stmt.example.clone());
        lines.push("```".to_string());
        lines.push(String::new());
    }
}

fn push_paragraph(lines: &mut Vec<String>, text: &str) {
    if !text.is_empty() {
        lines.push(text.to_string());
        lines.push(String::new());
    }
}

fn push_pages(lines: &mut Vec<String>, range: PageRange) {
    if !range.is_known() {
        return;
    }
    let text = match (range.start, range.end) {
        (s, e) if s == e || e == 0 => format!("_Page {}_", s),
        (0, e) => format!("_Page {}_", e),
        (s, e) => format!("_Pages {}–{}_", s, e),
    };
    lines.push(text);
    lines.push(String::new());
}

/// Pipes inside generic types would split the table cell.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(doc: &Document) -> String {
        MarkdownRenderer.render(doc).unwrap()
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert_eq!(render(&Document::default()), "");
    }

    #[test]
    fn heading_levels_follow_the_tree() {
        let doc = Document {
            title: "APEX REFERENCE GUIDE".into(),
            namespaces: vec![Namespace {
                name: "System".into(),
                page_range: PageRange { start: 2, end: 3 },
                classes: vec![Class {
                    name: "Math Class".into(),
                    methods: vec![Method {
                        name: "abs".into(),
                        signature: "public static Integer abs(Integer value)".into(),
                        parameters: vec![Parameter {
                            ty: "Integer".into(),
                            name: "value".into(),
                        }],
                        return_type: "Integer".into(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = render(&doc);
        assert!(out.starts_with("# APEX REFERENCE GUIDE\n"));
        assert!(out.contains("## System Namespace\n"));
        assert!(out.contains("_Pages 2–3_"));
        // the class has no page markers, so only the namespace gets a pages line
        assert_eq!(out.matches("_Page").count(), 1);
        assert!(out.contains("### Math Class\n"));
        assert!(out.contains("#### abs\n"));
        assert!(out.contains("```apex\npublic static Integer abs(Integer value)\n```"));
        assert!(out.contains("| value | `Integer` |"));
        assert!(out.contains("Returns `Integer`"));
    }

    #[test]
    fn statements_get_their_own_section() {
        let doc = Document {
            statements: vec![Statement {
                name: "Insert Statement".into(),
                syntax: vec!["insert sObject".into(), "insert sObject[]".into()],
                example: "insert a;".into(),
                page_range: PageRange { start: 9, end: 9 },
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = render(&doc);
        assert!(out.contains("## DML Statements\n"));
        assert!(out.contains("### Insert Statement\n"));
        assert!(out.contains("_Page 9_"));
        assert!(out.contains("#### Syntax\n\n```apex\ninsert sObject\ninsert sObject[]\n```"));
        assert!(out.contains("#### Example\n\n```apex\ninsert a;\n```"));
    }

    #[test]
    fn pipes_in_types_are_escaped() {
        assert_eq!(escape_cell("Map<A|B>"), "Map<A\\|B>");
    }
}
