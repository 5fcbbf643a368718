//! Anchors, GitHub-style heading slugs and output file names.

/// HTML anchor of a custom type section.
pub fn type_anchor(name: &str) -> String {
    format!("type-{}", name)
}

/// HTML anchor of an endpoint section.
pub fn endpoint_anchor(id: &str) -> String {
    format!("endpoint-{}", id)
}

/// Anchor of the overview section.
pub const INTRO_ANCHOR: &str = "intro";

/// Stem used when a title has no usable file name characters.
pub const FALLBACK_STEM: &str = "api-documentation";

/// File name stem derived from a document title, lowercased. Runs of
/// whitespace, path separators and other characters outside
/// alphanumerics, `-`, `_` and `.` collapse to a single `-`. Leading dots are
/// dropped, so the stem never names a parent directory or a hidden file.
pub fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_gap = false;
    for c in title.chars() {
        if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
            stem.push(c);
            in_gap = false;
        } else {
            if !in_gap {
                stem.push('-');
            }
            in_gap = true;
        }
    }
    let stem = stem.trim_start_matches('.').to_lowercase();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// `{stem}-api.json`
pub fn bundle_file_name(title: &str) -> String {
    format!("{}-api.json", file_stem(title))
}

/// `{stem}-docs.html`
pub fn export_file_name(title: &str) -> String {
    format!("{}-docs.html", file_stem(title))
}

/// GitHub heading anchor slug.
///
/// - lowercase
/// - drop everything that isn't alphanumeric, space or hyphen
/// - spaces become hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Markdown link to a heading of the same document.
pub fn heading_link(text: &str) -> String {
    format!("[{}](#{})", text, github_slug(text))
}
