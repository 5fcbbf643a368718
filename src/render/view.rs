//! Render glue: composes parsers, linker and visibility into a
//! format-agnostic view of one document under one [`ViewState`].
//!
//! Everything here is recomputed from the document on each call; nothing is
//! cached between renders.

use crate::link::{self, Token};
use crate::model::{AuthRule, CustomType, DescriptionFormat, Document, Endpoint, ListItem, TypeProperty};
use crate::parser::{markdown, outline, shape};
use crate::slug;
use crate::visibility::{self, AuthDisplay, ViewState, Visibility};
use tracing::debug;

/// Heading used when the document has no title.
pub const FALLBACK_TITLE: &str = "API Documentation";

pub struct DocumentView<'a> {
    pub doc: &'a Document,
    pub persona: &'a str,
    /// Options of the document-wide persona selector.
    pub roles: Vec<String>,
    pub description: Description,
    pub endpoints: Vec<EndpointView<'a>>,
    pub types: Vec<TypeView<'a>>,
}

/// Parsed description in its selected notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Outline(Vec<ListItem>),
    Markdown(Vec<markdown::MarkdownLine>),
}

impl Description {
    pub fn parse(doc: &Document) -> Self {
        match doc.description_format {
            DescriptionFormat::Outline => Description::Outline(outline::parse(&doc.description)),
            DescriptionFormat::Markdown => Description::Markdown(markdown::parse(&doc.description)),
        }
    }
}

impl<'a> DocumentView<'a> {
    pub fn build(doc: &'a Document, view: &'a ViewState) -> Self {
        debug!(persona = %view.persona, overrides = view.perspectives.len(), "building document view");
        let persona = view.persona.as_str();
        DocumentView {
            doc,
            persona,
            roles: visibility::role_union(doc),
            description: Description::parse(doc),
            endpoints: doc
                .endpoints
                .iter()
                .map(|ep| EndpointView::build(doc, ep, persona))
                .collect(),
            types: doc
                .custom_types
                .iter()
                .map(|ty| TypeView::build(doc, ty, view.effective_role(&ty.name)))
                .collect(),
        }
    }

    pub fn title(&self) -> &str {
        if self.doc.title.is_empty() {
            FALLBACK_TITLE
        } else {
            &self.doc.title
        }
    }
}

pub struct EndpointView<'a> {
    pub endpoint: &'a Endpoint,
    pub anchor: String,
    pub arguments: Vec<Token<'a>>,
    pub response: Vec<Token<'a>>,
    pub auth: AuthDisplay<'a>,
    /// Every rule, flagged when its role is the persona.
    pub rules: Vec<(&'a AuthRule, bool)>,
}

impl<'a> EndpointView<'a> {
    pub fn build(doc: &'a Document, endpoint: &'a Endpoint, persona: &'a str) -> Self {
        EndpointView {
            endpoint,
            anchor: slug::endpoint_anchor(&endpoint.id),
            arguments: link::link(endpoint.arguments.as_deref(), &doc.custom_types),
            response: link::link(endpoint.response.as_deref(), &doc.custom_types),
            auth: visibility::select_auth_rule(endpoint, persona),
            rules: endpoint
                .auth_rules
                .iter()
                .map(|rule| (rule, rule.role == persona))
                .collect(),
        }
    }
}

pub struct TypeView<'a> {
    pub ty: &'a CustomType,
    pub anchor: String,
    /// Effective role of this type's table.
    pub role: &'a str,
    /// Options of this type's perspective selector.
    pub options: Vec<String>,
    pub properties: Vec<TypeProperty>,
}

/// One row of a property table. Hidden rows keep their position.
#[derive(Debug, PartialEq, Eq)]
pub enum Row<'a> {
    Visible {
        property: &'a TypeProperty,
        type_tokens: Vec<Token<'a>>,
    },
    Hidden {
        /// Role the table is viewed as.
        role: &'a str,
        /// Role that would reveal the row.
        required: &'a str,
    },
}

impl<'a> TypeView<'a> {
    pub fn build(doc: &'a Document, ty: &'a CustomType, role: &'a str) -> Self {
        TypeView {
            ty,
            anchor: slug::type_anchor(&ty.name),
            role,
            options: visibility::perspective_roles(doc, ty),
            properties: shape::parse(&ty.definition),
        }
    }

    pub fn rows<'s>(&'s self, types: &'s [CustomType]) -> Vec<Row<'s>> {
        self.properties
            .iter()
            .map(|property| match visibility::property_visibility(property, self.role) {
                Visibility::Visible => Row::Visible {
                    property,
                    type_tokens: link::link(Some(property.type_expr.as_str()), types),
                },
                Visibility::Hidden { required } => Row::Hidden {
                    role: self.role,
                    required,
                },
            })
            .collect()
    }
}
