//! marl Lexer
//!
//! Tokenizes HTML markup into a flat list of tag, attribute, text and
//! comment tokens for the tree builder in `marl-parser`. Lexing is lenient:
//! it never fails, and malformed markup degrades to text or best-effort tags.
//!
//! # Example
//!
//! ```
//! use marl_lexer::{lex, TagConfig, Token};
//!
//! let tokens = lex("<p>hi</p>", &TagConfig::default());
//! assert_eq!(tokens.len(), 7);
//! assert!(matches!(&tokens[1], Token::TagName { content } if content == "p"));
//! ```

pub mod config;
pub mod lexer;
pub mod position;
pub mod token;

pub use config::TagConfig;
pub use lexer::Lexer;
pub use position::{Position, Span};
pub use token::Token;

/// Tokenize `source` using the tag classifications in `config`.
pub fn lex(source: &str, config: &TagConfig) -> Vec<Token> {
    Lexer::tokenize(source, config)
}
