//! WASM bindings for the marl parser.
//!
//! Exposes `parse()` and `stringify()` to JavaScript via wasm-bindgen. Trees
//! cross the boundary as plain JS objects (`{ type, tagName, attributes,
//! children }`); options use the camelCase `ParseOptions` shape.

use marl_parser::{Node, ParseOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Parse HTML into an array of plain node objects.
///
/// `options` may be `undefined`/`null` for the default tag tables.
/// Throws a JS error if `options` has the wrong shape.
#[wasm_bindgen]
pub fn parse(source: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options = options_from_js(options)?;
    let nodes = marl_parser::parse(source, &options);

    nodes
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Serialize an array of node objects back to HTML.
///
/// Throws a JS error if `ast` or `options` has the wrong shape.
#[wasm_bindgen]
pub fn stringify(ast: JsValue, options: JsValue) -> Result<String, JsError> {
    let options = options_from_js(options)?;
    let nodes: Vec<Node> =
        serde_wasm_bindgen::from_value(ast).map_err(|e| JsError::new(&e.to_string()))?;

    Ok(marl_stringify::to_html(&nodes, &options.tags))
}

/// Get the parser version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn options_from_js(value: JsValue) -> Result<ParseOptions, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ParseOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}
