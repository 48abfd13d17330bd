use tracing::trace;

use crate::config::TagConfig;
use crate::position::{Position, Span};
use crate::token::Token;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Markup lexer.
///
/// Scans a source string into a flat token list with a single forward-moving
/// cursor. Never fails: malformed markup degrades to text and best-effort
/// tag tokens.
///
/// - Text runs stop at a `<` followed by `/`, `!` or an ASCII alphanumeric;
///   any other `<` stays in the text.
/// - Contents of childless tags (`script`, `style`, ...) are emitted as one
///   text token up to the matching close tag.
pub struct Lexer<'a> {
    source: &'a str,
    config: &'a TagConfig,
    position: Position,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `source`.
    pub fn new(source: &'a str, config: &'a TagConfig) -> Self {
        Self::at(source, config, Position::default())
    }

    fn at(source: &'a str, config: &'a TagConfig, position: Position) -> Self {
        Self {
            source,
            config,
            position,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    pub fn tokenize(source: &str, config: &TagConfig) -> Vec<Token> {
        let mut lexer = Lexer::new(source, config);
        lexer.lex();
        lexer.tokens
    }

    fn lex(&mut self) {
        while !self.is_at_end() {
            let start = self.position.index;
            self.lex_text();
            if self.position.index != start {
                continue;
            }

            if self.source[start + 1..].starts_with(&COMMENT_OPEN[1..]) {
                self.lex_comment();
            } else {
                let tag_name = self.lex_tag();
                if self.config.is_childless(&tag_name) {
                    self.lex_skip_tag(&tag_name);
                }
            }
        }
    }

    // --- Text and comments ---

    /// Emit the text run up to the next tag-like `<`, if any.
    fn lex_text(&mut self) {
        let start = self.position;
        let text_end = self
            .find_text_end(start.index)
            .unwrap_or(self.source.len());
        if text_end == start.index {
            return;
        }

        let content = self.source[start.index..text_end].to_string();
        self.position.jump(self.source, text_end);
        self.tokens.push(Token::Text {
            content,
            position: Span::new(start, self.position),
        });
    }

    /// Index of the next `<` that opens a tag or comment.
    fn find_text_end(&self, from: usize) -> Option<usize> {
        let mut index = from;
        while let Some(offset) = self.source[index..].find('<') {
            let text_end = index + offset;
            match self.byte_at(text_end + 1) {
                Some(b'/' | b'!') => return Some(text_end),
                Some(c) if c.is_ascii_alphanumeric() => return Some(text_end),
                _ => index = text_end + 1,
            }
        }
        None
    }

    /// Lex `<!-- ... -->`. An unterminated comment runs to end of input.
    fn lex_comment(&mut self) {
        let start = self.position;
        self.position.feed(self.source, COMMENT_OPEN.len());

        let content_start = self.position.index;
        let (content_end, comment_end) = match self.source[content_start..].find(COMMENT_CLOSE) {
            Some(offset) => {
                let content_end = content_start + offset;
                (content_end, content_end + COMMENT_CLOSE.len())
            }
            None => {
                trace!(index = start.index, "unterminated comment runs to end of input");
                (self.source.len(), self.source.len())
            }
        };

        let content = self.source[content_start..content_end].to_string();
        self.position.jump(self.source, comment_end);
        self.tokens.push(Token::Comment {
            content,
            position: Span::new(start, self.position),
        });
    }

    // --- Tags ---

    /// Lex one tag from `<` through its `>` and return the raw tag name.
    fn lex_tag(&mut self) -> String {
        let closing = self.byte_at(self.position.index + 1) == Some(b'/');
        let start = self.position;
        self.position.feed(self.source, if closing { 2 } else { 1 });
        self.tokens.push(Token::TagStart { closing, start });

        let tag_name = self.lex_tag_name();
        self.lex_tag_attributes();

        let self_closing = self.byte_at(self.position.index) == Some(b'/');
        self.position
            .feed(self.source, if self_closing { 2 } else { 1 });
        self.tokens.push(Token::TagEnd {
            closing: self_closing,
            end: self.position,
        });

        tag_name
    }

    /// Lex the tag name. Leading separators are skipped and at least one
    /// character is always taken, so malformed tags still make progress.
    fn lex_tag_name(&mut self) -> String {
        let source = self.source;
        let base = self.position.index;
        let rest = &source[base..];

        let mut chars = rest
            .char_indices()
            .skip_while(|&(_, ch)| is_tag_name_boundary(ch));
        let (start, end) = match chars.next() {
            Some((start, _)) => {
                let end = chars
                    .find(|&(_, ch)| is_tag_name_boundary(ch))
                    .map_or(rest.len(), |(offset, _)| offset);
                (start, end)
            }
            None => (rest.len(), rest.len()),
        };

        self.position.jump(source, base + end);
        let tag_name = rest[start..end].to_string();
        self.tokens.push(Token::TagName {
            content: tag_name.clone(),
        });
        tag_name
    }

    /// Split the attribute section into words, respecting quotes, then emit
    /// one `Attribute` token per reassembled word. Stops before `/` or `>`.
    fn lex_tag_attributes(&mut self) {
        let source = self.source;
        let base = self.position.index;
        let rest = &source[base..];

        let mut quote: Option<char> = None;
        let mut word_begin = 0;
        let mut tag_end = None;
        let mut words = Vec::new();

        for (offset, ch) in rest.char_indices() {
            if let Some(open) = quote {
                if ch == open {
                    quote = None;
                }
                continue;
            }

            match ch {
                '/' | '>' => {
                    if offset != word_begin {
                        words.push(&rest[word_begin..offset]);
                    }
                    tag_end = Some(offset);
                    break;
                }
                '\'' | '"' => quote = Some(ch),
                c if c.is_whitespace() => {
                    if offset != word_begin {
                        words.push(&rest[word_begin..offset]);
                    }
                    word_begin = offset + c.len_utf8();
                }
                _ => {}
            }
        }

        let cursor = match tag_end {
            Some(offset) => offset,
            None => {
                // Unterminated tag: keep the trailing word.
                if word_begin < rest.len() {
                    words.push(&rest[word_begin..]);
                }
                rest.len()
            }
        };
        self.position.jump(source, base + cursor);

        for content in merge_attribute_words(&words) {
            self.tokens.push(Token::Attribute { content });
        }
    }

    /// Lex the raw content of a childless tag up to its matching close tag.
    ///
    /// Each `</` candidate is lexed into a scratch token list; a name
    /// mismatch resumes the search after the candidate tag.
    fn lex_skip_tag(&mut self, tag_name: &str) {
        let source = self.source;
        let wanted = tag_name.to_lowercase();
        let mut index = self.position.index;

        while index < source.len() {
            let Some(next_tag) = source[index..].find("</").map(|offset| index + offset) else {
                self.lex_text();
                break;
            };

            let mut candidate = self.position;
            candidate.jump(source, next_tag);
            let mut scratch = Lexer::at(source, self.config, candidate);
            let name = scratch.lex_tag();
            if name.to_lowercase() != wanted {
                trace!(index = next_tag, %name, tag = %wanted, "skipping non-matching close tag in raw text");
                index = scratch.position.index;
                continue;
            }

            if next_tag != self.position.index {
                let text_start = self.position;
                self.position.jump(source, next_tag);
                self.tokens.push(Token::Text {
                    content: source[text_start.index..next_tag].to_string(),
                    position: Span::new(text_start, self.position),
                });
            }

            self.tokens.append(&mut scratch.tokens);
            self.position.jump(source, scratch.position.index);
            break;
        }
    }

    // --- Helpers ---

    fn byte_at(&self, index: usize) -> Option<u8> {
        self.source.as_bytes().get(index).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position.index >= self.source.len()
    }
}

fn is_tag_name_boundary(ch: char) -> bool {
    ch.is_whitespace() || ch == '/' || ch == '>'
}

/// Rejoin attribute words split around a bare `=`.
///
/// `key`, `=value` → `key=value`; `key=`, `value` → `key=value`;
/// `key`, `=`, `value` → `key=value`. A dangling `key=` becomes `key`.
pub fn merge_attribute_words(words: &[&str]) -> Vec<String> {
    let mut merged = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let word = words[i];

        if !word.contains('=') {
            if let Some(second) = words.get(i + 1).filter(|w| w.starts_with('=')) {
                if second.len() > 1 {
                    merged.push(format!("{word}{second}"));
                    i += 2;
                    continue;
                }
                i += 1;
                if let Some(third) = words.get(i + 1) {
                    merged.push(format!("{word}={third}"));
                    i += 2;
                    continue;
                }
            }
        }

        if let Some(key) = word.strip_suffix('=') {
            if let Some(second) = words.get(i + 1).filter(|w| !w.contains('=')) {
                merged.push(format!("{word}{second}"));
                i += 2;
                continue;
            }
            merged.push(key.to_string());
            i += 1;
            continue;
        }

        merged.push(word.to_string());
        i += 1;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::tokenize(source, &TagConfig::default())
    }

    fn pos(index: usize, line: usize, column: usize) -> Position {
        Position::new(index, line, column)
    }

    fn text(content: &str, start: Position, end: Position) -> Token {
        Token::Text {
            content: content.into(),
            position: Span::new(start, end),
        }
    }

    fn name(content: &str) -> Token {
        Token::TagName {
            content: content.into(),
        }
    }

    fn attr(content: &str) -> Token {
        Token::Attribute {
            content: content.into(),
        }
    }

    /// Raw attribute strings of the first tag in `source`.
    fn attributes(source: &str) -> Vec<String> {
        lex(source)
            .into_iter()
            .take_while(|t| !matches!(t, Token::TagEnd { .. }))
            .filter_map(|t| match t {
                Token::Attribute { content } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Assert tokens cover the input contiguously from 0 to `source.len()`.
    fn assert_tiles(source: &str) {
        let mut expected = 0;
        for token in lex(source) {
            match token {
                Token::Text { position, .. } | Token::Comment { position, .. } => {
                    assert_eq!(position.start.index, expected, "gap before {position:?} in {source:?}");
                    expected = position.end.index;
                }
                Token::TagStart { start, .. } => {
                    assert_eq!(start.index, expected, "gap before tag in {source:?}");
                }
                Token::TagEnd { end, .. } => expected = end.index,
                Token::TagName { .. } | Token::Attribute { .. } => {}
            }
        }
        assert_eq!(expected, source.len(), "tokens do not reach end of {source:?}");
    }

    // =========================================================================
    // Text
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(lex("hello"), vec![text("hello", pos(0, 0, 0), pos(5, 0, 5))]);
    }

    #[test]
    fn test_lone_angle_bracket_stays_in_text() {
        assert_eq!(
            lex("a < b <= c"),
            vec![text("a < b <= c", pos(0, 0, 0), pos(10, 0, 10))]
        );
    }

    #[test]
    fn test_trailing_angle_bracket_stays_in_text() {
        assert_eq!(lex("a<"), vec![text("a<", pos(0, 0, 0), pos(2, 0, 2))]);
    }

    #[test]
    fn test_text_tracks_lines() {
        let toks = lex("ab\ncd<br>");
        assert_eq!(toks[0], text("ab\ncd", pos(0, 0, 0), pos(5, 1, 2)));
    }

    // =========================================================================
    // Tags
    // =========================================================================

    #[test]
    fn test_element_with_attribute_and_text() {
        assert_eq!(
            lex("<div class=\"a\">hi</div>"),
            vec![
                Token::TagStart {
                    closing: false,
                    start: pos(0, 0, 0)
                },
                name("div"),
                attr("class=\"a\""),
                Token::TagEnd {
                    closing: false,
                    end: pos(15, 0, 15)
                },
                text("hi", pos(15, 0, 15), pos(17, 0, 17)),
                Token::TagStart {
                    closing: true,
                    start: pos(17, 0, 17)
                },
                name("div"),
                Token::TagEnd {
                    closing: false,
                    end: pos(23, 0, 23)
                },
            ]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            lex("<br/>"),
            vec![
                Token::TagStart {
                    closing: false,
                    start: pos(0, 0, 0)
                },
                name("br"),
                Token::TagEnd {
                    closing: true,
                    end: pos(5, 0, 5)
                },
            ]
        );
    }

    #[test]
    fn test_self_closing_with_space() {
        let toks = lex("<img src=x />");
        assert_eq!(toks[2], attr("src=x"));
        assert_eq!(
            toks[3],
            Token::TagEnd {
                closing: true,
                end: pos(13, 0, 13)
            }
        );
    }

    #[test]
    fn test_tag_name_case_preserved() {
        assert_eq!(lex("<DiV>")[1], name("DiV"));
    }

    #[test]
    fn test_doctype_is_a_tag() {
        let toks = lex("<!DOCTYPE html>");
        assert_eq!(toks[1], name("!DOCTYPE"));
        assert_eq!(toks[2], attr("html"));
    }

    #[test]
    fn test_empty_close_tag_makes_progress() {
        let toks = lex("</");
        assert_eq!(toks[1], name(""));
        assert_tiles("</");
    }

    #[test]
    fn test_unterminated_tag_runs_to_end() {
        assert_eq!(attributes("<a href=x title"), vec!["href=x", "title"]);
        assert_tiles("<a href=x title");
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let source = "<a b=\"x>y</a>";
        assert_eq!(attributes(source), vec!["b=\"x>y</a>"]);
        assert_eq!(lex(source).len(), 4);
        assert_tiles(source);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    #[test]
    fn test_boolean_attributes() {
        assert_eq!(attributes("<input disabled checked>"), vec!["disabled", "checked"]);
    }

    #[test]
    fn test_quoted_values_keep_quotes() {
        assert_eq!(
            attributes("<a b='x y' c=\"z\">"),
            vec!["b='x y'", "c=\"z\""]
        );
    }

    #[test]
    fn test_quotes_hide_tag_end() {
        assert_eq!(
            attributes("<a href=\"/x>y\" data-q='a/b'>"),
            vec!["href=\"/x>y\"", "data-q='a/b'"]
        );
    }

    #[test]
    fn test_whitespace_around_equals() {
        assert_eq!(attributes("<a b = c>"), vec!["b=c"]);
        assert_eq!(attributes("<a b =c>"), vec!["b=c"]);
        assert_eq!(attributes("<a b= c>"), vec!["b=c"]);
        assert_eq!(attributes("<a b = \"c d\">"), vec!["b=\"c d\""]);
    }

    #[test]
    fn test_newlines_separate_attributes() {
        assert_eq!(attributes("<a\n  b=1\n  c>"), vec!["b=1", "c"]);
    }

    #[test]
    fn test_merge_dangling_equals() {
        assert_eq!(merge_attribute_words(&["a", "="]), vec!["a"]);
        assert_eq!(merge_attribute_words(&["a="]), vec!["a"]);
        assert_eq!(merge_attribute_words(&["a=", "b=c"]), vec!["a", "b=c"]);
    }

    #[test]
    fn test_merge_leaves_pairs_alone() {
        assert_eq!(
            merge_attribute_words(&["a=1", "b", "c=2"]),
            vec!["a=1", "b", "c=2"]
        );
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[test]
    fn test_comment() {
        assert_eq!(
            lex("<!-- a <p> b -->"),
            vec![Token::Comment {
                content: " a <p> b ".into(),
                position: Span::new(pos(0, 0, 0), pos(16, 0, 16)),
            }]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(
            lex("<!-- open"),
            vec![Token::Comment {
                content: " open".into(),
                position: Span::new(pos(0, 0, 0), pos(9, 0, 9)),
            }]
        );
    }

    #[test]
    fn test_bang_without_dashes_is_tag() {
        assert_eq!(lex("<!x>")[1], name("!x"));
    }

    // =========================================================================
    // Childless tags
    // =========================================================================

    #[test]
    fn test_script_content_is_raw_text() {
        let toks = lex("<script>if (a < b) {}</script>");
        assert_eq!(toks.len(), 7);
        assert_eq!(toks[3], text("if (a < b) {}", pos(8, 0, 8), pos(21, 0, 21)));
        assert_eq!(
            toks[4],
            Token::TagStart {
                closing: true,
                start: pos(21, 0, 21)
            }
        );
        assert_eq!(toks[5], name("script"));
    }

    #[test]
    fn test_script_skips_foreign_close_tags() {
        let toks = lex("<script>var s = \"</div>\";</script>");
        assert_eq!(
            toks[3],
            text("var s = \"</div>\";", pos(8, 0, 8), pos(25, 0, 25))
        );
        assert_eq!(toks[5], name("script"));
        assert_eq!(toks.len(), 7);
    }

    #[test]
    fn test_skip_tag_matches_case_insensitively() {
        let toks = lex("<STYLE>p{}</style>after");
        assert_eq!(toks[3], text("p{}", pos(7, 0, 7), pos(10, 0, 10)));
        assert_eq!(toks[5], name("style"));
        assert_eq!(toks[7], text("after", pos(18, 0, 18), pos(23, 0, 23)));
    }

    #[test]
    fn test_empty_script() {
        let toks = lex("<script></script>");
        assert_eq!(toks.len(), 6);
        assert!(toks.iter().all(|t| !matches!(t, Token::Text { .. })));
    }

    #[test]
    fn test_unclosed_script_content_becomes_text() {
        let toks = lex("<script>let x = 1;");
        assert_eq!(toks[3], text("let x = 1;", pos(8, 0, 8), pos(18, 0, 18)));
        assert_eq!(toks.len(), 4);
    }

    #[test]
    fn test_custom_childless_tags() {
        let mut config = TagConfig::empty();
        config.childless_tags.insert("code".into());
        let toks = Lexer::tokenize("<code><b>x</b></code>", &config);
        assert_eq!(toks[3], text("<b>x</b>", pos(6, 0, 6), pos(14, 0, 14)));

        let toks = Lexer::tokenize("<script><b></b></script>", &config);
        assert_eq!(toks[4], name("b"));
    }

    // =========================================================================
    // Position bookkeeping
    // =========================================================================

    #[test]
    fn test_tokens_tile_input() {
        for source in [
            "",
            "plain",
            "<p>A<p>B</p>",
            "<ul>\n  <li>one\n  <li>two\n</ul>",
            "<a b = 'c' d>x</a><br/>",
            "<!-- c --><!-- open",
            "<script>a</b>c</script>tail",
            "<script>no close",
            "<p>é ünïcode 日本</p>",
            "</div>hello",
            "<a / b>",
            "< a <1 </",
        ] {
            assert_tiles(source);
        }
    }

    #[test]
    fn test_multiline_positions() {
        let toks = lex("<div>\n  <span>x</span>\n</div>");
        assert_eq!(
            toks[4],
            Token::TagStart {
                closing: false,
                start: pos(8, 1, 2)
            }
        );
        let last = toks.last().unwrap();
        assert_eq!(
            *last,
            Token::TagEnd {
                closing: false,
                end: pos(29, 2, 6)
            }
        );
    }
}
