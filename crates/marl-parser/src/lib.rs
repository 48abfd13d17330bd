//! marl Parser
//!
//! Builds a tree of elements, text and comments from the tokens produced by
//! `marl-lexer`, then formats it: tag names are lower-cased and source
//! positions are dropped unless requested.
//!
//! ```text
//! source → lex() → Vec<Token> → Parser::parse() → format() → Vec<Node>
//! ```
//!
//! # Example
//!
//! ```
//! use marl_parser::{parse, Node, ParseOptions};
//!
//! let nodes = parse("<P class=intro>Hi", &ParseOptions::default());
//! let Node::Element(p) = &nodes[0] else { panic!() };
//! assert_eq!(p.tag_name, "p");
//! assert_eq!(p.attributes[0].value.as_deref(), Some("intro"));
//! ```

pub mod ast;
pub mod format;
pub mod parser;

pub use ast::{Attribute, Comment, Element, Node, Text};
pub use format::{format, ParseOptions};
pub use parser::Parser;

/// Lex, parse and format `source`.
pub fn parse(source: &str, options: &ParseOptions) -> Vec<Node> {
    let tokens = marl_lexer::lex(source, &options.tags);
    format(Parser::parse(&tokens, &options.tags), options)
}
