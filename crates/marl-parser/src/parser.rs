//! Tree builder for lexed markup.
//!
//! Consumes the flat token list from `marl-lexer` with an explicit stack of
//! open elements. Auto-closing and void tag rules come from the `TagConfig`
//! table. Every element frame is closed exactly once, when it is popped, and
//! that is the only place its end position is written.

use marl_lexer::{Position, Span, TagConfig, Token};
use tracing::{debug, trace};

use crate::ast::{Comment, Element, Node, Text};
use crate::format::split_attribute;

/// An open element on the parse stack. The root frame has no tag name and
/// collects the output forest.
struct Frame {
    tag_name: Option<String>,
    element: Element,
}

impl Frame {
    fn root() -> Self {
        Self {
            tag_name: None,
            element: Element {
                tag_name: String::new(),
                attributes: Vec::new(),
                children: Vec::new(),
                position: None,
            },
        }
    }

    fn open(tag_name: String, element: Element) -> Self {
        Self {
            tag_name: Some(tag_name),
            element,
        }
    }

    fn is(&self, tag_name: &str) -> bool {
        self.tag_name.as_deref() == Some(tag_name)
    }

    fn close(&mut self, end: Position) {
        if let Some(span) = self.element.position.as_mut() {
            span.end = end;
        }
    }
}

/// Markup tree builder.
///
/// Lenient by construction: stray closing tags are dropped, unclosed
/// elements stay open until an ancestor closes or input ends.
pub struct Parser<'a> {
    tokens: &'a [Token],
    config: &'a TagConfig,
    cursor: usize,
    stack: Vec<Frame>,
    last_end: Position,
}

impl<'a> Parser<'a> {
    /// Create a parser over `tokens`.
    pub fn new(tokens: &'a [Token], config: &'a TagConfig) -> Self {
        Self {
            tokens,
            config,
            cursor: 0,
            stack: vec![Frame::root()],
            last_end: Position::default(),
        }
    }

    /// Build the node forest for `tokens`.
    pub fn parse(tokens: &[Token], config: &TagConfig) -> Vec<Node> {
        let mut parser = Parser::new(tokens, config);
        parser.parse_nodes();
        parser.finish()
    }

    fn parse_nodes(&mut self) {
        while let Some(token) = self.advance() {
            match token {
                Token::TagStart {
                    closing: true,
                    start,
                } => self.parse_closing_tag(*start),
                Token::TagStart {
                    closing: false,
                    start,
                } => self.parse_opening_tag(*start),
                Token::Text { content, position } => {
                    self.append(Node::Text(Text {
                        content: content.clone(),
                        position: Some(*position),
                    }));
                }
                Token::Comment { content, position } => {
                    self.append(Node::Comment(Comment {
                        content: content.clone(),
                        position: Some(*position),
                    }));
                }
                Token::TagName { .. } | Token::Attribute { .. } | Token::TagEnd { .. } => {
                    trace!(cursor = self.cursor, "dropping tag token outside of a tag");
                }
            }
        }
    }

    /// Close every element still open at end of input.
    fn finish(mut self) -> Vec<Node> {
        let end = self.last_end;
        self.rewind(1, end, end);
        self.stack
            .pop()
            .map(|root| root.element.children)
            .unwrap_or_default()
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// `</name>`: close the nearest open element with this name, along with
    /// everything opened inside it. Unmatched closing tags are ignored.
    fn parse_closing_tag(&mut self, start: Position) {
        let tag_name = self.take_tag_name().to_lowercase();

        let mut end = start;
        while let Some(Token::TagEnd { end: tag_end, .. }) = self.tokens.get(self.cursor) {
            end = *tag_end;
            self.advance();
        }

        match self.stack.iter().rposition(|frame| frame.is(&tag_name)) {
            Some(depth) => self.rewind(depth, start, end),
            None => debug!(tag = %tag_name, index = start.index, "ignoring stray closing tag"),
        }
    }

    /// `<name ...>`: apply the auto-close rule, collect attributes, then
    /// either append a leaf element or open a new frame.
    fn parse_opening_tag(&mut self, start: Position) {
        let raw_name = self.take_tag_name();
        let tag_name = raw_name.to_lowercase();

        if self.config.is_closing(&tag_name) && !self.has_terminal_parent(&tag_name) {
            if let Some(depth) = self.stack[1..]
                .iter()
                .rposition(|frame| frame.is(&tag_name))
                .map(|index| index + 1)
            {
                trace!(tag = %tag_name, depth, "implicitly closing open element");
                self.rewind(depth, start, start);
            }
        }

        let mut attributes = Vec::new();
        let mut end = start;
        let mut self_closing = false;
        loop {
            match self.tokens.get(self.cursor) {
                Some(Token::Attribute { content }) => {
                    attributes.push(split_attribute(content));
                    self.cursor += 1;
                }
                Some(Token::TagEnd {
                    closing,
                    end: tag_end,
                }) => {
                    self_closing = *closing;
                    end = *tag_end;
                    self.advance();
                    break;
                }
                _ => break,
            }
        }

        let element = Element {
            tag_name: raw_name,
            attributes,
            children: Vec::new(),
            position: Some(Span::new(start, end)),
        };

        if self_closing || self.config.is_void(&tag_name) {
            self.append(Node::Element(element));
        } else {
            self.stack.push(Frame::open(tag_name, element));
        }
    }

    /// Whether a breaker ancestor for `tag_name` sits above the nearest open
    /// element of the same name.
    fn has_terminal_parent(&self, tag_name: &str) -> bool {
        let Some(breakers) = self.config.breakers_for(tag_name) else {
            return false;
        };

        for frame in self.stack.iter().rev() {
            match frame.tag_name.as_deref() {
                Some(name) if name == tag_name => break,
                Some(name) if breakers.contains(name) => return true,
                _ => {}
            }
        }
        false
    }

    /// Pop frames down to and including `depth`. The frame at `depth` ends
    /// at `end`; frames opened inside it end at `children_end`.
    fn rewind(&mut self, depth: usize, children_end: Position, end: Position) {
        while self.stack.len() > depth.max(1) {
            let Some(mut frame) = self.stack.pop() else {
                break;
            };
            frame.close(if self.stack.len() == depth {
                end
            } else {
                children_end
            });
            self.append(Node::Element(frame.element));
        }
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    /// Consume the next token, recording where it ends.
    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        if let Some(end) = token.end() {
            self.last_end = end;
        }
        Some(token)
    }

    fn take_tag_name(&mut self) -> String {
        match self.tokens.get(self.cursor) {
            Some(Token::TagName { content }) => {
                self.cursor += 1;
                content.clone()
            }
            _ => String::new(),
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.element.children.push(node);
        }
    }
}
