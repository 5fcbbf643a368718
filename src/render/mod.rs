//! Renderer module: trait-based format dispatch.

pub mod export;
pub mod html;
pub mod json;
pub mod markdown;
pub mod view;

use crate::error::{DocError, Result};
use crate::model::Document;
use crate::visibility::ViewState;

pub use crate::escape::html_escape;

/// Trait for rendering a Document, seen through a ViewState, into one format.
pub trait Renderer {
    fn render(&self, doc: &Document, view: &ViewState) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "export" | "standalone" => Ok(Box::new(export::ExportRenderer)),
        _ => Err(DocError::UnknownFormat(format.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("html").unwrap().file_extension(), "html");
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
        assert_eq!(create_renderer("export").unwrap().file_extension(), "html");
    }

    #[test]
    fn unknown_format() {
        assert!(matches!(
            create_renderer("pdf"),
            Err(DocError::UnknownFormat(f)) if f == "pdf"
        ));
    }
}
