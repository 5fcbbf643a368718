//! Cross-reference linker: finds known type names inside free text.
//!
//! Text is split losslessly into maximal identifier runs (`[A-Za-z0-9_]+`) and
//! the separators between them. An identifier that exactly equals a custom
//! type name (case-sensitive) becomes a [`Token::Reference`]; everything else
//! stays literal. `User[]` links `User` and keeps `[]`; `Users` links nothing.

use crate::model::CustomType;
use crate::slug;

/// One rendering token of a linked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Placeholder for absent text (`None`, empty, or the literal `"null"`).
    Nothing,
    Text(&'a str),
    Reference(TypeRef<'a>),
}

/// A recognized occurrence of a custom type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef<'a> {
    pub name: &'a str,
    /// Full shape definition, shown as a hover preview.
    pub definition: &'a str,
}

impl TypeRef<'_> {
    /// Navigation target of the reference.
    pub fn anchor(&self) -> String {
        slug::type_anchor(self.name)
    }
}

impl Token<'_> {
    pub fn is_reference(&self) -> bool {
        matches!(self, Token::Reference(_))
    }
}

/// Link `text` against the document's custom types.
pub fn link<'a>(text: Option<&'a str>, types: &'a [CustomType]) -> Vec<Token<'a>> {
    let text = match text {
        None | Some("") | Some("null") => return vec![Token::Nothing],
        Some(t) => t,
    };

    split_identifiers(text)
        .into_iter()
        .map(|part| {
            // First match wins on duplicate type names.
            match types.iter().find(|t| t.name == part) {
                Some(ty) => Token::Reference(TypeRef {
                    name: part,
                    definition: &ty.definition,
                }),
                None => Token::Text(part),
            }
        })
        .collect()
}

/// Concatenate the source text carried by the tokens.
///
/// For any text other than the absent forms this reproduces the input exactly.
pub fn source_text(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Nothing => {}
            Token::Text(s) => out.push_str(s),
            Token::Reference(r) => out.push_str(r.name),
        }
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split into alternating identifier and separator runs, preserving order.
fn split_identifiers(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_ident = None;

    for (i, c) in text.char_indices() {
        let ident = is_ident_char(c);
        match in_ident {
            Some(prev) if prev != ident => {
                parts.push(&text[start..i]);
                start = i;
            }
            _ => {}
        }
        in_ident = Some(ident);
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(names: &[&str]) -> Vec<CustomType> {
        names
            .iter()
            .map(|n| CustomType {
                name: n.to_string(),
                definition: format!("{{ id: {} }}", n.to_lowercase()),
                roles: vec![],
            })
            .collect()
    }

    #[test]
    fn array_suffix_stays_literal() {
        let reg = types(&["User"]);
        let tokens = link(Some("User[]"), &reg);
        assert_eq!(tokens.len(), 2);
        match &tokens[0] {
            Token::Reference(r) => {
                assert_eq!(r.name, "User");
                assert_eq!(r.definition, "{ id: user }");
                assert_eq!(r.anchor(), "type-User");
            }
            other => panic!("expected reference, got {:?}", other),
        }
        assert_eq!(tokens[1], Token::Text("[]"));
    }

    #[test]
    fn absent_forms_yield_placeholder() {
        let reg = types(&["User"]);
        assert_eq!(link(Some("null"), &reg), vec![Token::Nothing]);
        assert_eq!(link(Some(""), &reg), vec![Token::Nothing]);
        assert_eq!(link(None, &reg), vec![Token::Nothing]);
    }

    #[test]
    fn no_partial_or_case_insensitive_matches() {
        let reg = types(&["User"]);
        for input in ["Users", "user", "SuperUser", "User_1"] {
            let tokens = link(Some(input), &reg);
            assert!(
                !tokens.iter().any(Token::is_reference),
                "{} should not link",
                input
            );
        }
    }

    #[test]
    fn composite_expression() {
        let reg = types(&["Room", "Message"]);
        let tokens = link(Some("{ room: Room, items: Message[] }"), &reg);
        let refs: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Reference(r) => Some(r.name),
                _ => None,
            })
            .collect();
        assert_eq!(refs, vec!["Room", "Message"]);
    }

    #[test]
    fn tokenization_is_lossless() {
        let reg = types(&["User", "Room"]);
        for input in [
            "User[]",
            "  Map<Room, User>  ",
            "{ a: b, c: [User] }",
            "héllo User wörld",
            "!!",
            "x",
        ] {
            assert_eq!(source_text(&link(Some(input), &reg)), input);
        }
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(split_identifiers("aéb"), vec!["a", "é", "b"]);
    }

    #[test]
    fn duplicate_names_first_wins() {
        let mut reg = types(&["User"]);
        reg.push(CustomType {
            name: "User".into(),
            definition: "second".into(),
            roles: vec![],
        });
        match &link(Some("User"), &reg)[0] {
            Token::Reference(r) => assert_eq!(r.definition, "{ id: user }"),
            other => panic!("expected reference, got {:?}", other),
        }
    }
}
