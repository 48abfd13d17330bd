//! Syntax tree produced by the parser.
//!
//! Nodes serialize as plain objects tagged by `type` (`element`, `text`,
//! `comment`) with camelCase fields.

use marl_lexer::Span;
use serde::{Deserialize, Serialize};

/// A node in the parsed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
}

/// An element with its attributes and children.
///
/// `tag_name` keeps the source casing until the format pass lower-cases it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag_name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Span>,
}

/// A text run, verbatim (no entity decoding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Span>,
}

/// Content between `<!--` and `-->`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Span>,
}

/// An element attribute. `value` is `None` for valueless attributes like
/// `disabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            key: key.into(),
            value: value.map(str::to_string),
        }
    }
}

impl Node {
    pub fn position(&self) -> Option<&Span> {
        match self {
            Node::Element(el) => el.position.as_ref(),
            Node::Text(text) => text.position.as_ref(),
            Node::Comment(comment) => comment.position.as_ref(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Text or comment content; `None` for elements.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(&text.content),
            Node::Comment(comment) => Some(&comment.content),
            Node::Element(_) => None,
        }
    }
}
