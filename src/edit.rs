//! Copy-on-write document edits.
//!
//! Every operation borrows the current [`Document`] and returns a new one; the
//! input is never modified, so callers can keep old values for undo.
//! Endpoints are addressed by `id`, custom types by `name` (first match).

use crate::error::{DocError, Result};
use crate::model::{
    AuthMethod, AuthRule, CustomType, DescriptionFormat, Document, Endpoint, HttpMethod,
    DEFAULT_PERSONA,
};
use uuid::Uuid;

pub fn set_title(doc: &Document, title: &str) -> Document {
    Document {
        title: title.to_string(),
        ..doc.clone()
    }
}

/// Replace the description text, e.g. with the result of text enhancement.
pub fn set_description(doc: &Document, description: &str) -> Document {
    Document {
        description: description.to_string(),
        ..doc.clone()
    }
}

pub fn set_description_format(doc: &Document, format: DescriptionFormat) -> Document {
    Document {
        description_format: format,
        ..doc.clone()
    }
}

/// Parse a complete document from JSON. The caller keeps its previous
/// document when this fails.
pub fn replace_from_json(json: &str) -> Result<Document> {
    Ok(serde_json::from_str(json)?)
}

/// Placeholder type inserted by [`add_custom_type`] when none is supplied.
pub fn new_custom_type() -> CustomType {
    CustomType {
        name: "NewType".to_string(),
        definition: "{ id: string, name: string }".to_string(),
        roles: Vec::new(),
    }
}

/// Prepend a custom type.
pub fn add_custom_type(doc: &Document, ty: CustomType) -> Document {
    let mut custom_types = Vec::with_capacity(doc.custom_types.len() + 1);
    custom_types.push(ty);
    custom_types.extend(doc.custom_types.iter().cloned());
    Document {
        custom_types,
        ..doc.clone()
    }
}

pub fn remove_custom_type(doc: &Document, name: &str) -> Result<Document> {
    let index = type_index(doc, name)?;
    let mut next = doc.clone();
    next.custom_types.remove(index);
    Ok(next)
}

pub fn update_custom_type(doc: &Document, name: &str, ty: CustomType) -> Result<Document> {
    let index = type_index(doc, name)?;
    let mut next = doc.clone();
    next.custom_types[index] = ty;
    Ok(next)
}

/// Add a contextual role to a type. Blank or already present roles are ignored.
pub fn add_type_role(doc: &Document, name: &str, role: &str) -> Result<Document> {
    let index = type_index(doc, name)?;
    let role = role.trim();
    let mut next = doc.clone();
    let roles = &mut next.custom_types[index].roles;
    if !role.is_empty() && !roles.iter().any(|r| r == role) {
        roles.push(role.to_string());
    }
    Ok(next)
}

pub fn remove_type_role(doc: &Document, name: &str, role: &str) -> Result<Document> {
    let index = type_index(doc, name)?;
    let mut next = doc.clone();
    next.custom_types[index].roles.retain(|r| r != role);
    Ok(next)
}

/// Fresh endpoint with a new random id and no auth rules.
pub fn new_endpoint() -> Endpoint {
    Endpoint {
        id: Uuid::new_v4().to_string(),
        method: HttpMethod::Get,
        path: "/v1/resource".to_string(),
        description: "Describe this endpoint...".to_string(),
        arguments: Some("null".to_string()),
        response: Some("null".to_string()),
        auth_rules: Vec::new(),
    }
}

/// Prepend an endpoint.
pub fn add_endpoint(doc: &Document, endpoint: Endpoint) -> Document {
    let mut endpoints = Vec::with_capacity(doc.endpoints.len() + 1);
    endpoints.push(endpoint);
    endpoints.extend(doc.endpoints.iter().cloned());
    Document {
        endpoints,
        ..doc.clone()
    }
}

pub fn remove_endpoint(doc: &Document, id: &str) -> Result<Document> {
    let index = endpoint_index(doc, id)?;
    let mut next = doc.clone();
    next.endpoints.remove(index);
    Ok(next)
}

/// Apply `f` to a copy of the endpoint with `id`. The id itself is restored
/// afterwards; it never changes once created.
pub fn update_endpoint<F>(doc: &Document, id: &str, f: F) -> Result<Document>
where
    F: FnOnce(&mut Endpoint),
{
    let index = endpoint_index(doc, id)?;
    let mut next = doc.clone();
    f(&mut next.endpoints[index]);
    next.endpoints[index].id = id.to_string();
    Ok(next)
}

/// Rule appended by [`add_auth_rule`] when none is supplied.
pub fn new_auth_rule() -> AuthRule {
    AuthRule {
        role: DEFAULT_PERSONA.to_string(),
        method: AuthMethod::None,
        details: None,
    }
}

/// Append an auth rule to an endpoint.
pub fn add_auth_rule(doc: &Document, id: &str, rule: AuthRule) -> Result<Document> {
    update_endpoint(doc, id, |ep| ep.auth_rules.push(rule))
}

pub fn remove_auth_rule(doc: &Document, id: &str, index: usize) -> Result<Document> {
    check_rule_index(doc, id, index)?;
    update_endpoint(doc, id, |ep| {
        ep.auth_rules.remove(index);
    })
}

pub fn update_auth_rule(doc: &Document, id: &str, index: usize, rule: AuthRule) -> Result<Document> {
    check_rule_index(doc, id, index)?;
    update_endpoint(doc, id, |ep| ep.auth_rules[index] = rule)
}

fn type_index(doc: &Document, name: &str) -> Result<usize> {
    doc.custom_types
        .iter()
        .position(|t| t.name == name)
        .ok_or_else(|| DocError::UnknownType(name.to_string()))
}

fn endpoint_index(doc: &Document, id: &str) -> Result<usize> {
    doc.endpoints
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| DocError::UnknownEndpoint(id.to_string()))
}

fn check_rule_index(doc: &Document, id: &str, index: usize) -> Result<()> {
    let endpoint = &doc.endpoints[endpoint_index(doc, id)?];
    if index >= endpoint.auth_rules.len() {
        return Err(DocError::UnknownRule {
            id: id.to_string(),
            index,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_leave_original_untouched() {
        let doc = Document::default();
        let next = set_description(&doc, "- rewritten");
        assert_eq!(next.description, "- rewritten");
        assert_ne!(doc.description, next.description);
        assert_eq!(next.endpoints, doc.endpoints);
    }

    #[test]
    fn add_type_prepends() {
        let doc = Document::default();
        let next = add_custom_type(&doc, new_custom_type());
        assert_eq!(next.custom_types[0].name, "NewType");
        assert_eq!(next.custom_types.len(), doc.custom_types.len() + 1);
        assert_eq!(next.custom_types[1], doc.custom_types[0]);
    }

    #[test]
    fn remove_and_update_type() {
        let doc = Document::default();
        let next = remove_custom_type(&doc, "User").unwrap();
        assert!(next.find_type("User").is_none());

        let renamed = CustomType {
            name: "Person".into(),
            ..doc.find_type("User").unwrap().clone()
        };
        let next = update_custom_type(&doc, "User", renamed).unwrap();
        assert_eq!(next.custom_types[2].name, "Person");

        assert!(matches!(
            remove_custom_type(&doc, "Nope"),
            Err(DocError::UnknownType(_))
        ));
    }

    #[test]
    fn type_roles_trim_and_dedupe() {
        let doc = Document::default();
        let next = add_type_role(&doc, "User", "  Admin ").unwrap();
        let next = add_type_role(&next, "User", "Admin").unwrap();
        let next = add_type_role(&next, "User", "   ").unwrap();
        assert_eq!(next.find_type("User").unwrap().roles, vec!["Admin"]);

        let next = remove_type_role(&next, "User", "Admin").unwrap();
        assert!(next.find_type("User").unwrap().roles.is_empty());
    }

    #[test]
    fn new_endpoints_get_unique_ids() {
        let a = new_endpoint();
        let b = new_endpoint();
        assert_ne!(a.id, b.id);
        assert_eq!(a.arguments.as_deref(), Some("null"));
        assert!(a.auth_rules.is_empty());
    }

    #[test]
    fn endpoint_id_is_immutable() {
        let doc = Document::default();
        let next = update_endpoint(&doc, "2", |ep| {
            ep.path = "/v2/messages".into();
            ep.id = "hijacked".into();
        })
        .unwrap();
        let ep = next.find_endpoint("2").unwrap();
        assert_eq!(ep.path, "/v2/messages");
        assert!(next.find_endpoint("hijacked").is_none());
    }

    #[test]
    fn auth_rule_lifecycle() {
        let doc = Document::default();
        let next = add_auth_rule(&doc, "2", new_auth_rule()).unwrap();
        let rules = &next.find_endpoint("2").unwrap().auth_rules;
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[2].role, "Standard");

        let rule = AuthRule {
            role: "Bot".into(),
            method: AuthMethod::ApiKey,
            details: Some("X-Api-Key header".into()),
        };
        let next = update_auth_rule(&next, "2", 2, rule.clone()).unwrap();
        assert_eq!(next.find_endpoint("2").unwrap().auth_rules[2], rule);

        let next = remove_auth_rule(&next, "2", 0).unwrap();
        assert_eq!(next.find_endpoint("2").unwrap().auth_rules[0].role, "Moderator");

        assert!(matches!(
            remove_auth_rule(&doc, "2", 9),
            Err(DocError::UnknownRule { index: 9, .. })
        ));
        assert!(matches!(
            add_auth_rule(&doc, "missing", new_auth_rule()),
            Err(DocError::UnknownEndpoint(_))
        ));
    }

    #[test]
    fn json_replacement() {
        let json = serde_json::to_string(&Document::default()).unwrap();
        assert_eq!(replace_from_json(&json).unwrap(), Document::default());
        assert!(matches!(replace_from_json("{ not json"), Err(DocError::Json(_))));
    }
}
