//! Minimal markdown for descriptions: bold, italic, inline code and list lines.
//!
//! Each input line becomes one [`MarkdownLine`] whose body is an HTML fragment.
//! Text is escaped before the inline transforms run, so user text can never
//! inject markup.

use crate::escape::html_escape;
use regex::Regex;
use std::sync::LazyLock;

static RE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static RE_ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

static RE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

static RE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([*+-]|[0-9]+\.)\s+(.*)$").unwrap());

static RE_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([*+-]|[0-9]+\.)\s+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownLine {
    Paragraph(String),
    /// `indent` is the count of leading whitespace characters.
    Bullet { indent: usize, html: String },
}

/// Render markdown text line by line.
pub fn parse(text: &str) -> Vec<MarkdownLine> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(parse_line).collect()
}

fn parse_line(line: &str) -> MarkdownLine {
    let html = inline(line);
    match RE_LIST.captures(line) {
        Some(caps) => MarkdownLine::Bullet {
            indent: caps[1].chars().count(),
            html: RE_LIST_MARKER.replace(&html, "").into_owned(),
        },
        None => MarkdownLine::Paragraph(html),
    }
}

/// Apply the inline transforms to one line.
pub fn inline(line: &str) -> String {
    let escaped = html_escape(line);
    let bold = RE_BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let italic = RE_ITALIC.replace_all(&bold, "<em>$1</em>");
    RE_CODE
        .replace_all(&italic, "<code>$1</code>")
        .into_owned()
}
