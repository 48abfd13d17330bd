use serde::{Deserialize, Serialize};

/// A cursor into markup source.
///
/// `index` is a UTF-8 byte offset. `line` and `column` are 0-based; `column`
/// counts characters since the last `\n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// Advance by `length` bytes of `source`, counting lines and columns over
    /// the consumed text.
    ///
    /// Never moves past the end of `source`. An end that falls inside a
    /// multi-byte character is rounded up to the next char boundary.
    pub fn feed(&mut self, source: &str, length: usize) {
        let start = self.index;
        let mut end = start.saturating_add(length).min(source.len());
        while !source.is_char_boundary(end) {
            end += 1;
        }
        if let Some(consumed) = source.get(start..end) {
            for ch in consumed.chars() {
                if ch == '\n' {
                    self.line += 1;
                    self.column = 0;
                } else {
                    self.column += 1;
                }
            }
            self.index = end;
        }
    }

    /// Advance to the absolute byte offset `target`. Moving backwards is a
    /// no-op.
    pub fn jump(&mut self, source: &str, target: usize) {
        self.feed(source, target.saturating_sub(self.index));
    }
}

/// A start/end pair stamped on tokens and nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Number of source bytes covered.
    pub fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
