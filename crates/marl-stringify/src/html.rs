//! HTML serializer.
//!
//! Walks a node tree and writes markup. Text and comment content is written
//! verbatim; nothing is escaped.

use marl_lexer::TagConfig;
use marl_parser::ast::{Attribute, Element, Node};

/// Serialize `nodes` to markup. Void tags from `config` get no closing tag.
pub fn generate(nodes: &[Node], config: &TagConfig) -> String {
    let mut html = String::new();
    for node in nodes {
        generate_node(node, config, &mut html);
    }
    html
}

fn generate_node(node: &Node, config: &TagConfig, out: &mut String) {
    match node {
        Node::Element(el) => generate_element(el, config, out),
        Node::Text(text) => out.push_str(&text.content),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.content);
            out.push_str("-->");
        }
    }
}

fn generate_element(el: &Element, config: &TagConfig, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag_name);
    for attr in &el.attributes {
        generate_attribute(attr, out);
    }
    out.push('>');

    if config.is_void(&el.tag_name) {
        return;
    }

    for child in &el.children {
        generate_node(child, config, out);
    }
    out.push_str(&format!("</{}>", el.tag_name));
}

/// ` key` or ` key='value'`; double quotes when the value holds a `'`.
fn generate_attribute(attr: &Attribute, out: &mut String) {
    out.push(' ');
    out.push_str(&attr.key);
    if let Some(value) = &attr.value {
        let quote = if value.contains('\'') { '"' } else { '\'' };
        out.push('=');
        out.push(quote);
        out.push_str(value);
        out.push(quote);
    }
}
