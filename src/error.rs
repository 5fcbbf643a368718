//! Library error type.
//!
//! Parsing, linking and visibility decisions never fail; errors only come from
//! the collaborators around them (storage, the enhancement service) and from
//! edits that name something the document does not contain.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocError>;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("text enhancement failed: {0}")]
    Enhance(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown format: {0}. Use html, markdown, or json")]
    UnknownFormat(String),

    #[error("unknown method: {0}")]
    InvalidMethod(String),

    #[error("no endpoint with id '{0}'")]
    UnknownEndpoint(String),

    #[error("no custom type named '{0}'")]
    UnknownType(String),

    #[error("endpoint '{id}' has no auth rule at index {index}")]
    UnknownRule { id: String, index: usize },

    #[error("role '{role}' is not a perspective of type '{type_name}' (available: {available})")]
    InvalidPerspective {
        type_name: String,
        role: String,
        available: String,
    },
}
