//! Persona and perspective model: decides what each role gets to see.
//!
//! Gating is a flat equality test: a property with a required role is shown
//! only when the effective role is exactly that role. There is no hierarchy.

use crate::error::{DocError, Result};
use crate::model::{AuthRule, CustomType, Document, Endpoint, TypeProperty, DEFAULT_PERSONA, UNIVERSAL_ROLES};
use std::collections::BTreeMap;

/// Transient view state owned by the rendering layer, never by the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Document-wide active role.
    pub persona: String,
    /// Per-type overrides: type name -> role.
    pub perspectives: BTreeMap<String, String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(DEFAULT_PERSONA)
    }
}

impl ViewState {
    pub fn new(persona: impl Into<String>) -> Self {
        ViewState {
            persona: persona.into(),
            perspectives: BTreeMap::new(),
        }
    }

    pub fn with_perspective(mut self, type_name: impl Into<String>, role: impl Into<String>) -> Self {
        self.perspectives.insert(type_name.into(), role.into());
        self
    }

    /// Role governing `type_name`'s property table.
    pub fn effective_role(&self, type_name: &str) -> &str {
        self.perspectives
            .get(type_name)
            .map(String::as_str)
            .unwrap_or(&self.persona)
    }

    /// Check every override against the document: the type must exist and the
    /// role must be one of the type's perspective options.
    pub fn validate(&self, doc: &Document) -> Result<()> {
        for (type_name, role) in &self.perspectives {
            let ty = doc
                .find_type(type_name)
                .ok_or_else(|| DocError::UnknownType(type_name.clone()))?;
            let available = perspective_roles(doc, ty);
            if !available.iter().any(|r| r == role) {
                return Err(DocError::InvalidPerspective {
                    type_name: type_name.clone(),
                    role: role.clone(),
                    available: available.join(", "),
                });
            }
        }
        Ok(())
    }
}

/// Outcome of the visibility test for one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility<'a> {
    Visible,
    /// Suppressed; `required` is the role that would reveal it.
    Hidden { required: &'a str },
}

pub fn property_visibility<'a>(prop: &'a TypeProperty, effective_role: &str) -> Visibility<'a> {
    match prop.required_role.as_deref() {
        Some(required) if required != effective_role => Visibility::Hidden { required },
        _ => Visibility::Visible,
    }
}

/// Auth state of an endpoint for a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDisplay<'a> {
    Rule(&'a AuthRule),
    /// No rule names the persona; no default method is assumed.
    Undefined { persona: &'a str },
}

/// Pick the first rule whose role equals `persona`.
pub fn select_auth_rule<'a>(endpoint: &'a Endpoint, persona: &'a str) -> AuthDisplay<'a> {
    endpoint
        .auth_rules
        .iter()
        .find(|rule| rule.role == persona)
        .map(AuthDisplay::Rule)
        .unwrap_or(AuthDisplay::Undefined { persona })
}

/// Every role known to the document: the universal roles, then type roles,
/// then auth-rule roles, deduplicated in first-seen order.
pub fn role_union(doc: &Document) -> Vec<String> {
    let candidates = UNIVERSAL_ROLES
        .iter()
        .copied()
        .chain(doc.custom_types.iter().flat_map(|t| t.roles.iter().map(String::as_str)))
        .chain(
            doc.endpoints
                .iter()
                .flat_map(|e| e.auth_rules.iter().map(|r| r.role.as_str())),
        );

    let mut roles: Vec<String> = Vec::new();
    for role in candidates {
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
    }
    roles
}

/// Roles offered by a type's perspective selector: the global union filtered
/// to the type's own roles plus the universal roles.
pub fn perspective_roles(doc: &Document, ty: &CustomType) -> Vec<String> {
    role_union(doc)
        .into_iter()
        .filter(|r| UNIVERSAL_ROLES.contains(&r.as_str()) || ty.roles.contains(r))
        .collect()
}
