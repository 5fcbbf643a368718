//! GitHub-flavored markdown renderer.
//!
//! Same view as the HTML page: reference tokens become links to the type
//! headings, hidden properties stay in the table as placeholder rows.

use crate::error::Result;
use crate::link::Token;
use crate::model::{Document, ListItem};
use crate::render::view::{Description, DocumentView, EndpointView, Row, TypeView};
use crate::render::Renderer;
use crate::slug;
use crate::visibility::{AuthDisplay, ViewState};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document, view: &ViewState) -> Result<String> {
        let dv = DocumentView::build(doc, view);
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", dv.title()));

        // Descriptions in markdown notation pass through unchanged.
        if let Description::Outline(items) = &dv.description {
            let mut lines = Vec::new();
            render_outline(items, 0, &mut lines);
            output.push_str(lines.join("\n").trim_end());
            output.push_str("\n\n");
        } else if !doc.description.is_empty() {
            output.push_str(&doc.description);
            output.push_str("\n\n");
        }

        output.push_str(&format!("_Viewing as **{}**_\n\n", dv.persona));
        if !view.perspectives.is_empty() {
            let overrides: Vec<String> = view
                .perspectives
                .iter()
                .map(|(ty, role)| format!("{} as {}", ty, role))
                .collect();
            output.push_str(&format!("_Perspective overrides: {}_\n\n", overrides.join(", ")));
        }

        // Index
        if !dv.endpoints.is_empty() || !dv.types.is_empty() {
            output.push_str("## Index\n\n");
            for ep in &dv.endpoints {
                output.push_str(&format!("* {}\n", slug::heading_link(&endpoint_heading(ep))));
            }
            for tv in &dv.types {
                output.push_str(&format!("* {}\n", slug::heading_link(&tv.ty.name)));
            }
            output.push('\n');
        }

        if !dv.endpoints.is_empty() {
            output.push_str("## API Endpoints\n\n");
            for ep in &dv.endpoints {
                output.push_str(&render_endpoint(ep));
            }
        }

        if !dv.types.is_empty() {
            output.push_str("## Type Registry\n\n");
            for tv in &dv.types {
                output.push_str(&render_type(tv, doc));
            }
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Nested bullets follow the parsed tree, two spaces per depth.
fn render_outline(items: &[ListItem], depth: usize, lines: &mut Vec<String>) {
    for item in items {
        if !item.is_list {
            lines.push(item.text.clone());
            // paragraphs need a blank line before a following list
            if !item.text.is_empty() {
                lines.push(String::new());
            }
            continue;
        }
        let indent = "  ".repeat(depth);
        if item.is_ordered {
            lines.push(format!("{}- **{}** {}", indent, item.list_number, item.text));
        } else {
            lines.push(format!("{}- {}", indent, item.text));
        }
        render_outline(&item.children, depth + 1, lines);
    }
}

fn endpoint_heading(ep: &EndpointView<'_>) -> String {
    format!("{} {}", ep.endpoint.method, ep.endpoint.path)
}

fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Nothing => out.push_str("_None_"),
            Token::Text(text) => out.push_str(text),
            Token::Reference(r) => out.push_str(&slug::heading_link(r.name)),
        }
    }
    out
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn render_endpoint(ep: &EndpointView<'_>) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", endpoint_heading(ep)));
    if !ep.endpoint.description.is_empty() {
        lines.push(ep.endpoint.description.clone());
        lines.push(String::new());
    }

    lines.push(format!("**Input Arguments:** {}\n", render_tokens(&ep.arguments)));
    lines.push(format!("**Expected Response:** {}\n", render_tokens(&ep.response)));

    match ep.auth {
        AuthDisplay::Rule(rule) => {
            let mut line = format!("**Authentication:** `{}` for {}", rule.method, rule.role);
            if let Some(ref details) = rule.details {
                line.push_str(&format!(" ({})", details));
            }
            lines.push(line);
        }
        AuthDisplay::Undefined { persona } => {
            lines.push(format!("**Authentication:** _Access undefined for {}_", persona));
        }
    }
    lines.push(String::new());

    if !ep.rules.is_empty() {
        lines.push("| Role | Method | Details |".to_string());
        lines.push("|---|---|---|".to_string());
        for (rule, active) in &ep.rules {
            let role = if *active {
                format!("**{}**", table_cell(&rule.role))
            } else {
                table_cell(&rule.role)
            };
            lines.push(format!(
                "| {} | {} | {} |",
                role,
                rule.method,
                table_cell(rule.details.as_deref().unwrap_or(""))
            ));
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_type(tv: &TypeView<'_>, doc: &Document) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("### {}\n", tv.ty.name));
    lines.push(format!(
        "_Perspective: **{}**_ (options: {})\n",
        tv.role,
        tv.options.join(", ")
    ));

    lines.push("| Field | Type | Access |".to_string());
    lines.push("|---|---|---|".to_string());
    for row in tv.rows(&doc.custom_types) {
        match row {
            Row::Visible { property, type_tokens } => {
                let optional = if property.is_optional { "?" } else { "" };
                let access = property.required_role.as_deref().unwrap_or("Public");
                lines.push(format!(
                    "| `{}{}` | {} | {} |",
                    table_cell(&property.name),
                    optional,
                    table_cell(&render_tokens(&type_tokens)),
                    table_cell(access)
                ));
            }
            Row::Hidden { role, required } => {
                lines.push(format!(
                    "| _Hidden for {} (requires {})_ | | |",
                    table_cell(role),
                    table_cell(required)
                ));
            }
        }
    }
    lines.push(String::new());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
