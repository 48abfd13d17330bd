use serde::{Deserialize, Serialize};

use crate::position::{Position, Span};

/// A token produced by the markup lexer.
///
/// A tag is always emitted as `TagStart`, `TagName`, zero or more
/// `Attribute`s, then `TagEnd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Token {
    /// `<` or `</`. `closing` is set for end tags.
    TagStart { closing: bool, start: Position },

    /// Raw tag name, case preserved.
    TagName { content: String },

    /// One raw `key`, `key=value`, `key='value'` or `key="value"` fragment.
    Attribute { content: String },

    /// `>` or `/>`. `closing` is set when the start tag is self-closing.
    TagEnd { closing: bool, end: Position },

    Text { content: String, position: Span },

    /// Content between `<!--` and `-->`.
    Comment { content: String, position: Span },
}

impl Token {
    /// Position where this token stops, for tokens that carry one.
    pub fn end(&self) -> Option<Position> {
        match self {
            Token::TagEnd { end, .. } => Some(*end),
            Token::Text { position, .. } | Token::Comment { position, .. } => Some(position.end),
            Token::TagStart { .. } | Token::TagName { .. } | Token::Attribute { .. } => None,
        }
    }
}
