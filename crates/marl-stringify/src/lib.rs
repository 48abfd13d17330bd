//! marl Stringify
//!
//! Serializes a parsed node tree back to HTML markup.
//!
//! ```text
//! Vec<Node> → to_html() → String
//! ```
//!
//! For well-formed input the round trip is stable up to tag name case and
//! attribute quoting:
//!
//! ```
//! use marl_parser::{parse, ParseOptions};
//!
//! let options = ParseOptions::default();
//! let nodes = parse("<DIV id=\"a\">x<br></DIV>", &options);
//! assert_eq!(marl_stringify::to_html(&nodes, &options.tags), "<div id='a'>x<br></div>");
//! ```

pub mod html;

use marl_lexer::TagConfig;
use marl_parser::Node;

/// Serialize `nodes` to markup.
pub fn to_html(nodes: &[Node], config: &TagConfig) -> String {
    html::generate(nodes, config)
}
