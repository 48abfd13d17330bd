//! Tag classification tables shared by the lexer and the parser.
//!
//! All names are lower-case; lookups lower-case the scanned name first.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "!doctype", "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Elements that implicitly close an open element of the same name.
pub const CLOSING_ELEMENTS: &[&str] = &[
    "html", "head", "body", "p", "dt", "dd", "li", "option", "thead", "th", "tbody", "tr", "td",
    "tfoot", "colgroup",
];

/// Elements whose content is raw text, never markup.
pub const CHILDLESS_ELEMENTS: &[&str] = &["style", "script", "template"];

/// Ancestors that stop an auto-closing element from closing its namesake.
pub const CLOSING_ELEMENT_ANCESTOR_BREAKERS: &[(&str, &[&str])] = &[
    ("li", &["ul", "ol", "menu"]),
    ("dt", &["dl"]),
    ("dd", &["dl"]),
    ("tbody", &["table"]),
    ("thead", &["table"]),
    ("tfoot", &["table"]),
    ("tr", &["table"]),
    ("td", &["table"]),
];

/// Tag classifications consumed by [`crate::lex`] and the parser.
///
/// Deserializes from camelCase keys; missing keys keep the stock HTML tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagConfig {
    pub void_tags: HashSet<String>,
    pub closing_tags: HashSet<String>,
    pub childless_tags: HashSet<String>,
    pub closing_tag_ancestor_breakers: HashMap<String, HashSet<String>>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            void_tags: to_set(VOID_ELEMENTS),
            closing_tags: to_set(CLOSING_ELEMENTS),
            childless_tags: to_set(CHILDLESS_ELEMENTS),
            closing_tag_ancestor_breakers: CLOSING_ELEMENT_ANCESTOR_BREAKERS
                .iter()
                .map(|(tag, breakers)| (tag.to_string(), to_set(breakers)))
                .collect(),
        }
    }
}

impl TagConfig {
    /// A configuration with every table empty.
    pub fn empty() -> Self {
        Self {
            void_tags: HashSet::new(),
            closing_tags: HashSet::new(),
            childless_tags: HashSet::new(),
            closing_tag_ancestor_breakers: HashMap::new(),
        }
    }

    pub fn is_void(&self, tag: &str) -> bool {
        contains_lowercase(&self.void_tags, tag)
    }

    pub fn is_closing(&self, tag: &str) -> bool {
        contains_lowercase(&self.closing_tags, tag)
    }

    pub fn is_childless(&self, tag: &str) -> bool {
        contains_lowercase(&self.childless_tags, tag)
    }

    /// Breaker ancestors for an auto-closing tag, if any are configured.
    pub fn breakers_for(&self, tag: &str) -> Option<&HashSet<String>> {
        self.closing_tag_ancestor_breakers
            .get(tag)
            .or_else(|| self.closing_tag_ancestor_breakers.get(&tag.to_lowercase()))
    }
}

fn to_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn contains_lowercase(set: &HashSet<String>, tag: &str) -> bool {
    set.contains(tag) || set.contains(&tag.to_lowercase())
}
