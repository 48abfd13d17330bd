//! Post-parse formatting: attribute splitting, tag name normalization and
//! optional position stripping.

use marl_lexer::TagConfig;
use serde::{Deserialize, Serialize};

use crate::ast::{Attribute, Node};

/// Options for the full parse pipeline.
///
/// Deserializes from a flat camelCase object, e.g.
/// `{ "voidTags": [...], "includePositions": true }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    #[serde(flatten)]
    pub tags: TagConfig,
    pub include_positions: bool,
}

impl ParseOptions {
    pub fn with_positions(mut self) -> Self {
        self.include_positions = true;
        self
    }
}

/// Split a raw attribute fragment at its first `=` and unquote the value.
pub fn split_attribute(raw: &str) -> Attribute {
    let raw = raw.trim();
    match raw.split_once('=') {
        Some((key, value)) => Attribute {
            key: key.to_string(),
            value: Some(unquote(value).to_string()),
        },
        None => Attribute {
            key: raw.to_string(),
            value: None,
        },
    }
}

/// Strip one pair of matching surrounding quotes.
pub fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&quote @ (b'"' | b'\'')), Some(&last)) if quote == last => {
            value.get(1..value.len() - 1).unwrap_or_default()
        }
        _ => value,
    }
}

/// Lower-case tag names and drop positions unless requested.
pub fn format(nodes: Vec<Node>, options: &ParseOptions) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| format_node(node, options))
        .collect()
}

fn format_node(node: Node, options: &ParseOptions) -> Node {
    match node {
        Node::Element(mut el) => {
            el.tag_name = el.tag_name.to_lowercase();
            el.children = format(std::mem::take(&mut el.children), options);
            if !options.include_positions {
                el.position = None;
            }
            Node::Element(el)
        }
        Node::Text(mut text) => {
            if !options.include_positions {
                text.position = None;
            }
            Node::Text(text)
        }
        Node::Comment(mut comment) => {
            if !options.include_positions {
                comment.position = None;
            }
            Node::Comment(comment)
        }
    }
}
