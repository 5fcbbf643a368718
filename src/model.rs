//! Data model for an API document: format-agnostic.
//!
//! The [`Document`] is the single source of truth. Editing never mutates a
//! document in place; see [`crate::edit`]. Parser outputs ([`ListItem`],
//! [`TypeProperty`]) are transient and recomputed on every render.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roles every document knows about, regardless of its types and rules.
pub const UNIVERSAL_ROLES: [&str; 2] = ["Standard", "Guest"];

/// Persona used when nothing else has been selected.
pub const DEFAULT_PERSONA: &str = "Standard";

/// Complete API document as edited and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub description: String,
    pub description_format: DescriptionFormat,
    pub custom_types: Vec<CustomType>,
    pub endpoints: Vec<Endpoint>,
}

/// How the document description is interpreted when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DescriptionFormat {
    /// Dash / numbered outline notation.
    #[default]
    #[serde(rename = "docgenie")]
    Outline,
    #[serde(rename = "markdown")]
    Markdown,
}

impl DescriptionFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "docgenie" | "outline" => Some(Self::Outline),
            "markdown" | "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// A named object shape, referenced by endpoints and other types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomType {
    /// Link target and anchor key; expected unique within a document.
    pub name: String,
    /// Shape notation, e.g. `{ id: string, secret?(Owner): string }`.
    pub definition: String,
    /// Contextual roles introduced by this type.
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Opaque, immutable identity.
    pub id: String,
    pub method: HttpMethod,
    pub path: String,
    pub description: String,
    /// Type expression or the literal `"null"`.
    pub arguments: Option<String>,
    /// Type expression or the literal `"null"`.
    pub response: Option<String>,
    #[serde(default)]
    pub auth_rules: Vec<AuthRule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Case-insensitive lookup by verb.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication requirement of an endpoint for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRule {
    pub role: String,
    pub method: AuthMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthMethod {
    #[default]
    None,
    Token,
    Cookie,
    OAuth2,
    #[serde(rename = "API Key")]
    ApiKey,
    Signature,
}

impl AuthMethod {
    pub const ALL: [AuthMethod; 6] = [
        AuthMethod::None,
        AuthMethod::Token,
        AuthMethod::Cookie,
        AuthMethod::OAuth2,
        AuthMethod::ApiKey,
        AuthMethod::Signature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::None => "None",
            AuthMethod::Token => "Token",
            AuthMethod::Cookie => "Cookie",
            AuthMethod::OAuth2 => "OAuth2",
            AuthMethod::ApiKey => "API Key",
            AuthMethod::Signature => "Signature",
        }
    }

    /// Lookup by display name; `api-key` and `apikey` are accepted too.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();
        Self::ALL.into_iter().find(|m| {
            m.as_str()
                .replace(' ', "")
                .eq_ignore_ascii_case(&normalized)
        })
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the outline notation, with its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub level: usize,
    pub text: String,
    pub children: Vec<ListItem>,
    pub is_list: bool,
    pub is_ordered: bool,
    /// Literal numeral including the trailing dot (`"1.2."`); empty for dashes.
    pub list_number: String,
}

impl ListItem {
    /// A non-list paragraph line (empty text for a blank line).
    pub fn paragraph(text: impl Into<String>) -> Self {
        ListItem {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn is_blank(&self) -> bool {
        !self.is_list && self.text.is_empty()
    }
}

/// One field of a custom type's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeProperty {
    pub name: String,
    /// Type expression; [`crate::parser::shape::UNKNOWN_TYPE`] for degraded segments.
    pub type_expr: String,
    pub is_optional: bool,
    pub required_role: Option<String>,
}

impl Document {
    /// Find a custom type by name. First match wins on duplicates.
    pub fn find_type(&self, name: &str) -> Option<&CustomType> {
        self.custom_types.iter().find(|t| t.name == name)
    }

    pub fn find_endpoint(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }
}

impl Default for Document {
    /// The built-in sample document.
    fn default() -> Self {
        fn rule(role: &str, method: AuthMethod, details: Option<&str>) -> AuthRule {
            AuthRule {
                role: role.to_string(),
                method,
                details: details.map(str::to_string),
            }
        }

        Document {
            title: "Aether Chat Protocol".to_string(),
            description: [
                "- Advanced real-time communication framework.",
                "-- Support for ephemeral messaging.",
                "-- Contextual object permissions.",
                "1. Distributed architecture for global scale.",
                "1.1. High-availability clusters.",
                "1.2. Low-latency edge nodes.",
                "2. End-to-end encryption by default.",
            ]
            .join("\n"),
            description_format: DescriptionFormat::Outline,
            custom_types: vec![
                CustomType {
                    name: "Room".to_string(),
                    definition: "{ id: string, name: string, config?(Owner): object, logs(Moderator): string[] }"
                        .to_string(),
                    roles: vec!["Owner".into(), "Moderator".into(), "Member".into()],
                },
                CustomType {
                    name: "Message".to_string(),
                    definition: "{ id: string, body: string, sender: User, flags?(Moderator): string[] }"
                        .to_string(),
                    roles: vec!["Moderator".into()],
                },
                CustomType {
                    name: "User".to_string(),
                    definition: "{ id: string, handle: string, profile_pic?: string }".to_string(),
                    roles: vec![],
                },
            ],
            endpoints: vec![
                Endpoint {
                    id: "1".to_string(),
                    method: HttpMethod::Post,
                    path: "/v1/rooms/:id/messages".to_string(),
                    description: "Send a message to a room. Identity requirements vary by role."
                        .to_string(),
                    arguments: Some("{ body: string }".to_string()),
                    response: Some("Message".to_string()),
                    auth_rules: vec![
                        rule("Guest", AuthMethod::Cookie, Some("Requires session cookie from gateway")),
                        rule("Member", AuthMethod::Token, Some("JWT required in Authorization header")),
                        rule("Owner", AuthMethod::Token, Some("Full administrative token required")),
                    ],
                },
                Endpoint {
                    id: "2".to_string(),
                    method: HttpMethod::Get,
                    path: "/v1/rooms/:id/messages".to_string(),
                    description: "Retrieve a paginated history of messages. Standard users have limited visibility."
                        .to_string(),
                    arguments: Some("null".to_string()),
                    response: Some("Message[]".to_string()),
                    auth_rules: vec![
                        rule("Standard", AuthMethod::None, None),
                        rule("Moderator", AuthMethod::Token, Some("Elevated token for history access")),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_original_keys() {
        let doc = Document::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["descriptionFormat"], "docgenie");
        assert_eq!(json["customTypes"][0]["name"], "Room");
        assert_eq!(json["endpoints"][0]["method"], "POST");
        assert_eq!(json["endpoints"][0]["authRules"][0]["method"], "Cookie");
        // details omitted when absent
        assert!(json["endpoints"][1]["authRules"][0].get("details").is_none());
    }

    #[test]
    fn api_key_uses_spaced_name() {
        let rule: AuthRule =
            serde_json::from_str(r#"{"role":"Bot","method":"API Key"}"#).unwrap();
        assert_eq!(rule.method, AuthMethod::ApiKey);
        assert_eq!(rule.details, None);
        assert_eq!(
            serde_json::to_string(&rule).unwrap(),
            r#"{"role":"Bot","method":"API Key"}"#
        );
    }

    #[test]
    fn null_arguments_round_trip() {
        let ep: Endpoint = serde_json::from_str(
            r#"{"id":"x","method":"GET","path":"/","description":"","arguments":null,"response":"null","authRules":[]}"#,
        )
        .unwrap();
        assert_eq!(ep.arguments, None);
        assert_eq!(ep.response.as_deref(), Some("null"));
    }

    #[test]
    fn method_lookup() {
        assert_eq!(HttpMethod::parse("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("HEAD"), None);
        assert_eq!(AuthMethod::parse("api-key"), Some(AuthMethod::ApiKey));
        assert_eq!(AuthMethod::parse("API Key"), Some(AuthMethod::ApiKey));
        assert_eq!(AuthMethod::parse("oauth2"), Some(AuthMethod::OAuth2));
        assert_eq!(AuthMethod::parse("magic"), None);
    }

    #[test]
    fn format_names() {
        assert_eq!(DescriptionFormat::parse("docgenie"), Some(DescriptionFormat::Outline));
        assert_eq!(DescriptionFormat::parse("md"), Some(DescriptionFormat::Markdown));
        assert_eq!(DescriptionFormat::parse("rst"), None);
    }
}
