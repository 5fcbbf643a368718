//! HTML renderer: standalone page for a single persona/perspective state.
//!
//! The fragment functions are shared with the export renderer, which
//! pre-renders one variant per role from the same code.

use crate::link::Token;
use crate::model::{AuthRule, CustomType, Document, ListItem};
use crate::parser::markdown::MarkdownLine;
use crate::parser::outline;
use crate::render::view::{Description, DocumentView, EndpointView, Row, TypeView};
use crate::render::{html_escape, Renderer};
use crate::error::Result;
use crate::slug;
use crate::visibility::{AuthDisplay, ViewState};

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, doc: &Document, view: &ViewState) -> Result<String> {
        let dv = DocumentView::build(doc, view);
        let mut out = String::new();

        out.push_str(&page_head(dv.title()));
        out.push_str("<body>\n<div class=\"layout\">\n");
        out.push_str(&render_sidebar(&dv, false));
        out.push_str("<main>\n");
        out.push_str(&render_intro(&dv));

        out.push_str("<section class=\"endpoints\">\n<h2>API Endpoints</h2>\n");
        for ep in &dv.endpoints {
            out.push_str(&render_endpoint_open(ep));
            out.push_str(&render_auth(ep.auth, &ep.rules));
            out.push_str("</div>\n</article>\n");
        }
        out.push_str("</section>\n");

        out.push_str(&render_types_open());
        for tv in &dv.types {
            out.push_str(&render_type_open(tv, false));
            out.push_str(&render_property_table(tv, &doc.custom_types));
            out.push_str("</article>\n");
        }
        out.push_str("</section>\n");

        out.push_str("</main>\n</div>\n</body>\n</html>\n");
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

pub(crate) const STYLE: &str = r#"body { font-family: system-ui, sans-serif; margin: 0; color: #0f172a; }
code, .mono { font-family: ui-monospace, monospace; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 17em; flex-shrink: 0; padding: 1.5em 1em; background: #f8fafc; border-right: 1px solid #f1f5f9; }
.sidebar h4 { font-size: 0.65em; text-transform: uppercase; letter-spacing: 0.1em; color: #94a3b8; margin: 2em 0 0.5em; }
.sidebar a { display: block; padding: 0.3em 0.5em; color: #475569; text-decoration: none; font-size: 0.85em; }
.brand { font-weight: bold; color: #4f46e5; font-size: 1.1em; }
.personas { list-style: none; padding: 0.3em; margin: 0; background: white; border: 1px solid #e2e8f0; border-radius: 0.75em; }
.persona { display: block; width: 100%; text-align: left; padding: 0.4em 0.75em; border: 0; background: none; border-radius: 0.5em; font-size: 0.8em; font-weight: 600; color: #475569; }
.persona.active { background: #4f46e5; color: white; }
main { flex: 1; max-width: 56em; margin: 0 auto; padding: 3em 2em 10em; }
h1 { font-size: 2.8em; margin: 0 0 0.5em; }
.description { border-left: 4px solid #f1f5f9; padding-left: 1.5em; color: #475569; font-style: italic; }
.outline-line { display: flex; align-items: baseline; }
.outline-children { margin-left: 1.5em; }
.marker { color: #818cf8; margin-right: 0.5em; font-weight: bold; }
.marker.ordered { color: #4f46e5; font-family: ui-monospace, monospace; font-size: 0.75em; }
.spacer { height: 1em; }
.endpoint { margin: 4em 0; }
.endpoint-head { display: flex; align-items: center; gap: 0.75em; }
.endpoint-head h3 { font-family: ui-monospace, monospace; font-weight: 500; margin: 0; }
.method { padding: 0.25em 0.6em; border-radius: 0.4em; font-size: 0.65em; font-weight: 900; letter-spacing: 0.1em; }
.method-get { background: #dcfce7; color: #15803d; }
.method-post, .method-put, .method-delete, .method-patch { background: #dbeafe; color: #1d4ed8; }
.io { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 1em; }
.io-box { padding: 1.2em; background: #f8fafc; border: 1px solid #f1f5f9; border-radius: 1em; }
.io h4, .auth h4 { font-size: 0.65em; text-transform: uppercase; letter-spacing: 0.1em; color: #94a3b8; margin: 0 0 0.75em; }
.none { color: #94a3b8; font-style: italic; }
.ref { position: relative; display: inline-block; }
.ref a { color: #4f46e5; font-weight: 600; }
.tooltip { display: none; position: absolute; bottom: 100%; left: 50%; transform: translateX(-50%); width: 16em; z-index: 50; background: #0f172a; color: white; font-size: 0.7em; padding: 0.75em; border-radius: 0.75em; white-space: pre-wrap; }
.ref:hover .tooltip { display: block; }
.tooltip-title { display: block; color: #818cf8; font-weight: bold; text-transform: uppercase; border-bottom: 1px solid #334155; margin-bottom: 0.4em; }
.auth-active { padding: 1em; background: #4f46e5; color: white; border-radius: 0.75em; }
.auth-role { font-size: 0.65em; font-weight: bold; text-transform: uppercase; opacity: 0.7; }
.auth-method { font-size: 0.9em; font-weight: bold; }
.auth-details { font-size: 0.65em; margin-top: 0.5em; padding-top: 0.5em; border-top: 1px solid #818cf8; }
.auth-undefined { padding: 1em; background: #f8fafc; border: 1px solid #e2e8f0; color: #94a3b8; border-radius: 0.75em; font-style: italic; font-size: 0.8em; }
.auth-rules { list-style: none; padding: 0; font-size: 0.75em; }
.auth-rules li { display: flex; justify-content: space-between; padding: 0.4em 0.75em; border: 1px solid #f1f5f9; border-radius: 0.5em; margin-top: 0.4em; opacity: 0.6; }
.auth-rules li.active { opacity: 1; background: #4f46e5; color: white; }
.types { border-top: 1px solid #f1f5f9; padding-top: 4em; }
.type { margin: 3em 0; }
.type h3 { border-left: 4px solid #6366f1; padding-left: 0.75em; }
.perspective { display: flex; justify-content: space-between; font-size: 0.6em; font-weight: bold; text-transform: uppercase; color: #94a3b8; }
.props { width: 100%; border-collapse: collapse; background: #f8fafc; font-size: 0.85em; }
.props th { background: #f1f5f9; font-size: 0.7em; text-transform: uppercase; letter-spacing: 0.1em; color: #64748b; text-align: left; padding: 0.5em 1em; }
.props td { padding: 0.6em 1em; border-top: 1px solid #f1f5f9; }
.optional { color: #818cf8; font-weight: bold; }
.badge { padding: 0.1em 0.4em; border-radius: 0.3em; background: #fffbeb; color: #d97706; border: 1px solid #fef3c7; font-size: 0.7em; font-weight: bold; text-transform: uppercase; }
.public { color: #cbd5e1; font-size: 0.7em; text-transform: uppercase; }
.hidden-row td { font-style: italic; color: #cbd5e1; font-size: 0.75em; }
.md-bullet { display: flex; align-items: flex-start; }
"#;

pub(crate) fn page_head(title: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!("<title>{} - API Documentation</title>\n", html_escape(title)));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n");
    out
}

/// Sidebar with persona selector and navigation. `interactive` renders the
/// personas as buttons for the export script.
pub(crate) fn render_sidebar(dv: &DocumentView<'_>, interactive: bool) -> String {
    let mut out = String::new();
    out.push_str("<aside class=\"sidebar\">\n<div class=\"brand\">DocGenie</div>\n");

    out.push_str("<h4>Viewing Persona</h4>\n<ul class=\"personas\">\n");
    for role in &dv.roles {
        let active = if role == dv.persona { " active" } else { "" };
        if interactive {
            out.push_str(&format!(
                "  <li><button type=\"button\" class=\"persona{}\" data-role=\"{}\">{}</button></li>\n",
                active,
                html_escape(role),
                html_escape(role)
            ));
        } else {
            out.push_str(&format!(
                "  <li class=\"persona{}\">{}</li>\n",
                active,
                html_escape(role)
            ));
        }
    }
    out.push_str("</ul>\n");

    out.push_str("<h4>Introduction</h4>\n");
    out.push_str(&format!("<a href=\"#{}\">Overview</a>\n", slug::INTRO_ANCHOR));

    out.push_str("<h4>Endpoints</h4>\n");
    for ep in &dv.endpoints {
        out.push_str(&format!(
            "<a href=\"#{}\"><span class=\"method method-{}\">{}</span> {}</a>\n",
            html_escape(&ep.anchor),
            ep.endpoint.method.as_str().to_lowercase(),
            ep.endpoint.method,
            html_escape(&ep.endpoint.path)
        ));
    }

    out.push_str("<h4>Type Definitions</h4>\n");
    for tv in &dv.types {
        out.push_str(&format!(
            "<a href=\"#{}\">{}</a>\n",
            html_escape(&tv.anchor),
            html_escape(&tv.ty.name)
        ));
    }

    out.push_str("</aside>\n");
    out
}

pub(crate) fn render_intro(dv: &DocumentView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!("<section id=\"{}\">\n", slug::INTRO_ANCHOR));
    out.push_str(&format!("<h1>{}</h1>\n", html_escape(dv.title())));
    out.push_str("<div class=\"description\">\n");
    match &dv.description {
        Description::Outline(items) => out.push_str(&render_outline(items)),
        Description::Markdown(lines) => out.push_str(&render_markdown(lines)),
    }
    out.push_str("</div>\n</section>\n");
    out
}

fn render_outline(items: &[ListItem]) -> String {
    let mut out = String::new();
    for item in items {
        if item.is_blank() {
            out.push_str("<div class=\"spacer\"></div>\n");
            continue;
        }
        if !item.is_list {
            out.push_str(&format!("<p>{}</p>\n", html_escape(&item.text)));
            continue;
        }
        let marker_class = if item.is_ordered { "marker ordered" } else { "marker" };
        out.push_str(&format!("<div class=\"outline-item level-{}\">\n", item.level));
        out.push_str(&format!(
            "<div class=\"outline-line\"><span class=\"{}\">{}</span><span>{}</span></div>\n",
            marker_class,
            html_escape(outline::marker(item)),
            html_escape(&item.text)
        ));
        if !item.children.is_empty() {
            out.push_str("<div class=\"outline-children\">\n");
            out.push_str(&render_outline(&item.children));
            out.push_str("</div>\n");
        }
        out.push_str("</div>\n");
    }
    out
}

fn render_markdown(lines: &[MarkdownLine]) -> String {
    let mut out = String::new();
    for line in lines {
        match line {
            MarkdownLine::Paragraph(html) => out.push_str(&format!("<p>{}</p>\n", html)),
            MarkdownLine::Bullet { indent, html } => out.push_str(&format!(
                "<div class=\"md-bullet\" style=\"margin-left: {}rem\"><span class=\"marker\">{}</span><span>{}</span></div>\n",
                *indent as f32 * 0.5,
                outline::bullet(1),
                html
            )),
        }
    }
    out
}

/// Linked text as inline HTML.
pub(crate) fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Nothing => out.push_str("<span class=\"none\">None</span>"),
            Token::Text(text) => out.push_str(&html_escape(text)),
            Token::Reference(r) => out.push_str(&format!(
                "<span class=\"ref\"><a href=\"#{}\">{}</a><span class=\"tooltip\"><span class=\"tooltip-title\">Definition: {}</span>{}</span></span>",
                html_escape(&r.anchor()),
                html_escape(r.name),
                html_escape(r.name),
                html_escape(r.definition)
            )),
        }
    }
    out
}

/// Endpoint header and I/O boxes; leaves the auth column `<div>` open.
pub(crate) fn render_endpoint_open(ep: &EndpointView<'_>) -> String {
    let endpoint = ep.endpoint;
    let mut out = String::new();
    out.push_str(&format!(
        "<article id=\"{}\" class=\"endpoint\">\n",
        html_escape(&ep.anchor)
    ));
    out.push_str(&format!(
        "<div class=\"endpoint-head\"><span class=\"method method-{}\">{}</span><h3>{}</h3></div>\n",
        endpoint.method.as_str().to_lowercase(),
        endpoint.method,
        html_escape(&endpoint.path)
    ));
    out.push_str(&format!("<p>{}</p>\n", html_escape(&endpoint.description)));
    out.push_str("<div class=\"io\">\n");
    out.push_str(&format!(
        "<div class=\"io-box\"><h4>Input Arguments</h4><div class=\"mono\">{}</div></div>\n",
        render_tokens(&ep.arguments)
    ));
    out.push_str(&format!(
        "<div class=\"io-box\"><h4>Expected Response</h4><div class=\"mono\">{}</div></div>\n",
        render_tokens(&ep.response)
    ));
    out.push_str("<div class=\"auth\"><h4>Authentication</h4>\n");
    out
}

/// Selected rule (or the undefined state) followed by the full rule list.
pub(crate) fn render_auth(auth: AuthDisplay<'_>, rules: &[(&AuthRule, bool)]) -> String {
    let mut out = String::new();
    match auth {
        AuthDisplay::Rule(rule) => {
            out.push_str("<div class=\"auth-active\">");
            out.push_str(&format!(
                "<div class=\"auth-role\">Role: {}</div><div class=\"auth-method\">Method: {}</div>",
                html_escape(&rule.role),
                rule.method
            ));
            if let Some(ref details) = rule.details {
                out.push_str(&format!(
                    "<div class=\"auth-details\">{}</div>",
                    html_escape(details)
                ));
            }
            out.push_str("</div>\n");
        }
        AuthDisplay::Undefined { persona } => {
            out.push_str(&format!(
                "<div class=\"auth-undefined\">Access undefined for {}</div>\n",
                html_escape(persona)
            ));
        }
    }

    if !rules.is_empty() {
        out.push_str("<ul class=\"auth-rules\">\n");
        for (rule, active) in rules {
            let class = if *active { " class=\"active\"" } else { "" };
            out.push_str(&format!(
                "  <li{}><span>{}</span><span class=\"mono\">{}</span></li>\n",
                class,
                html_escape(&rule.role),
                rule.method
            ));
        }
        out.push_str("</ul>\n");
    }
    out
}

pub(crate) fn render_types_open() -> String {
    "<section class=\"types\">\n<h2>Type Registry</h2>\n<p>Definitions for custom objects and reusable structures.</p>\n"
        .to_string()
}

/// Type heading and perspective selector; leaves the `<article>` open.
pub(crate) fn render_type_open(tv: &TypeView<'_>, interactive: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<article id=\"{}\" class=\"type\" data-type=\"{}\">\n",
        html_escape(&tv.anchor),
        html_escape(&tv.ty.name)
    ));
    out.push_str(&format!("<h3>{}</h3>\n", html_escape(&tv.ty.name)));
    out.push_str("<div class=\"perspective\"><span>Perspective:</span>");
    let disabled = if interactive { "" } else { " disabled" };
    out.push_str(&format!("<select{}>", disabled));
    for option in &tv.options {
        let selected = if option == tv.role { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            html_escape(option),
            selected,
            html_escape(option)
        ));
    }
    out.push_str("</select></div>\n");
    out
}

/// Property table for the type's effective role.
pub(crate) fn render_property_table(tv: &TypeView<'_>, types: &[CustomType]) -> String {
    let mut out = String::new();
    out.push_str("<table class=\"props\">\n<thead><tr><th>Field</th><th>Type</th><th>Access</th></tr></thead>\n<tbody>\n");
    for row in tv.rows(types) {
        match row {
            Row::Visible { property, type_tokens } => {
                let optional = if property.is_optional {
                    "<span class=\"optional\" title=\"Optional field\">?</span>"
                } else {
                    ""
                };
                let access = match property.required_role {
                    Some(ref role) => format!("<span class=\"badge\">{}</span>", html_escape(role)),
                    None => "<span class=\"public\">Public</span>".to_string(),
                };
                out.push_str(&format!(
                    "<tr><td><code>{}</code>{}</td><td class=\"mono\">{}</td><td>{}</td></tr>\n",
                    html_escape(&property.name),
                    optional,
                    render_tokens(&type_tokens),
                    access
                ));
            }
            Row::Hidden { role, required } => {
                out.push_str(&format!(
                    "<tr class=\"hidden-row\"><td colspan=\"3\">Hidden for {} <span class=\"requires\">(requires {})</span></td></tr>\n",
                    html_escape(role),
                    html_escape(required)
                ));
            }
        }
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(doc: &Document, view: &ViewState) -> String {
        HtmlRenderer.render(doc, view).unwrap()
    }

    #[test]
    fn page_has_sections_and_anchors() {
        let html = render(&Document::default(), &ViewState::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Aether Chat Protocol - API Documentation</title>"));
        assert!(html.contains("id=\"intro\""));
        assert!(html.contains("id=\"endpoint-1\""));
        assert!(html.contains("id=\"type-Room\""));
        assert!(html.contains("<a href=\"#type-Message\">Message</a>"));
    }

    #[test]
    fn outline_description_is_nested() {
        let html = render(&Document::default(), &ViewState::default());
        assert!(html.contains("<span class=\"marker\">•</span><span>Advanced real-time communication framework.</span>"));
        assert!(html.contains("<span class=\"marker\">○</span><span>Support for ephemeral messaging.</span>"));
        assert!(html.contains("<span class=\"marker ordered\">1.1.</span>"));
    }

    #[test]
    fn hidden_rows_render_placeholders() {
        let html = render(&Document::default(), &ViewState::default());
        assert!(html.contains("Hidden for Standard <span class=\"requires\">(requires Owner)</span>"));
        let owner = render(&Document::default(), &ViewState::new("Owner"));
        assert!(owner.contains("<code>config</code><span class=\"optional\""));
    }

    #[test]
    fn auth_undefined_for_persona() {
        let html = render(&Document::default(), &ViewState::new("Owner"));
        // GET endpoint has no Owner rule
        assert!(html.contains("Access undefined for Owner"));
        assert!(html.contains("<div class=\"auth-role\">Role: Owner</div><div class=\"auth-method\">Method: Token</div>"));
    }

    #[test]
    fn references_carry_preview() {
        let html = render(&Document::default(), &ViewState::default());
        assert!(html.contains("<a href=\"#type-Message\">Message</a><span class=\"tooltip\"><span class=\"tooltip-title\">Definition: Message</span>"));
        assert!(html.contains("<span class=\"none\">None</span>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let doc = Document {
            title: "<script>".into(),
            description: "- <b>hi</b>".into(),
            ..Document::default()
        };
        let html = render(&doc, &ViewState::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
    }

    #[test]
    fn selected_perspective_option() {
        let view = ViewState::default().with_perspective("Room", "Moderator");
        let html = render(&Document::default(), &view);
        assert!(html.contains("<option value=\"Moderator\" selected>Moderator</option>"));
    }
}
