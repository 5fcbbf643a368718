//! JSON renderer: the structural encoding of the document.
//!
//! This is the same encoding the store persists and the bundle export writes.
//! The view state does not affect it.

use crate::error::Result;
use crate::model::Document;
use crate::render::Renderer;
use crate::visibility::ViewState;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document, _view: &ViewState) -> Result<String> {
        let mut out = to_json(doc)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

/// Pretty JSON with two-space indentation.
pub fn to_json(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Compact JSON safe to place inside an HTML `<script>` element.
pub fn to_embedded_json(doc: &Document) -> Result<String> {
    Ok(serde_json::to_string(doc)?.replace("</", "<\\/"))
}
