//! docgenie: persona-aware API documentation.
//!
//! Parses free-text outline descriptions and TypeScript-like type shapes,
//! links type names inside endpoint text, and renders the document as seen by
//! a chosen persona with optional per-type perspective overrides.

pub mod config;
pub mod edit;
pub mod enhance;
pub mod error;
pub mod escape;
pub mod link;
pub mod model;
pub mod parser;
pub mod render;
pub mod slug;
pub mod store;
pub mod visibility;

pub use error::{DocError, Result};
