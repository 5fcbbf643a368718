//! Shape notation parser.
//!
//! `{ id: string, name?: string, secret(Owner): string, note?(Owner): string }`
//!
//! Segments are split on every comma without tracking nesting, so a composite
//! type containing a comma (`meta: { a: string, b: string }`) splits into extra
//! properties. Segments that do not match degrade to an [`UNKNOWN_TYPE`]
//! property named after the raw segment.

use crate::model::TypeProperty;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Type marker for segments that could not be parsed.
pub const UNKNOWN_TYPE: &str = "unknown";

static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+)(\??)(?:\(([^)]+)\))?\s*:\s*(.+)$").unwrap()
});

/// Parse a shape definition into its properties, in declaration order.
pub fn parse(definition: &str) -> Vec<TypeProperty> {
    let mut inner = definition.trim();
    if let Some(rest) = inner.strip_prefix('{') {
        inner = rest;
    }
    if let Some(rest) = inner.strip_suffix('}') {
        inner = rest;
    }

    inner
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> TypeProperty {
    match RE_FIELD.captures(segment) {
        Some(caps) => TypeProperty {
            name: caps[1].to_string(),
            is_optional: &caps[2] == "?",
            required_role: caps.get(3).map(|m| m.as_str().to_string()),
            type_expr: caps[4].trim().to_string(),
        },
        None => {
            warn!(segment, "unparsable shape segment");
            TypeProperty {
                name: segment.to_string(),
                type_expr: UNKNOWN_TYPE.to_string(),
                is_optional: false,
                required_role: None,
            }
        }
    }
}
