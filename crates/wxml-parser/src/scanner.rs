//! Character cursor over WXML source text.

use source_map::{Position, Span};

/// A cursor over template source that tracks line and column.
///
/// Every query past the end of input yields `None` or an empty slice; the
/// scanner never panics on well-formed UTF-8.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character under the cursor.
    pub fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Look `n` characters past the cursor without consuming anything.
    /// `peek(0)` is the same as [`current`](Self::current).
    pub fn peek(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consume one character, updating line and column.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume whitespace, returning the number of bytes skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let start = self.pos;
        while self.current().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.pos - start
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Snapshot of the cursor.
    pub fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.column)
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Consume `s` if the input continues with it.
    pub fn consume(&mut self, s: &str) -> bool {
        if !self.starts_with(s) {
            return false;
        }
        for _ in s.chars() {
            self.advance();
        }
        true
    }

    /// Consume characters while `pred` holds and return them.
    pub fn consume_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while self.current().is_some_and(&pred) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    /// Consume up to (not including) the next occurrence of `s`, or to the end.
    pub fn consume_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        while !self.is_eof() && !self.starts_with(s) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    /// Byte span from `start` to the cursor.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start.offset, self.pos as u32)
    }

    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span.to_range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_advance_tracks_lines() {
        let mut scanner = Scanner::new("a\nbc");
        assert_eq!(scanner.advance(), Some('a'));
        assert_eq!(scanner.position(), Position::new(1, 1, 2));
        assert_eq!(scanner.advance(), Some('\n'));
        assert_eq!(scanner.position(), Position::new(2, 2, 1));
        scanner.advance();
        assert_eq!(scanner.position(), Position::new(3, 2, 2));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let scanner = Scanner::new("<!--");
        assert_eq!(scanner.current(), Some('<'));
        assert_eq!(scanner.peek(1), Some('!'));
        assert_eq!(scanner.peek(3), Some('-'));
        assert_eq!(scanner.peek(4), None);
        assert_eq!(scanner.offset(), 0);
    }

    #[test]
    fn test_past_end_is_empty() {
        let mut scanner = Scanner::new("x");
        scanner.advance();
        assert!(scanner.is_eof());
        assert_eq!(scanner.current(), None);
        assert_eq!(scanner.advance(), None);
        assert_eq!(scanner.consume_while(|_| true), "");
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new(" \t\n <view>");
        assert_eq!(scanner.skip_whitespace(), 4);
        assert_eq!(scanner.current(), Some('<'));
        assert_eq!(scanner.position().line, 2);
    }

    #[test]
    fn test_consume_until() {
        let mut scanner = Scanner::new(" note -->rest");
        assert_eq!(scanner.consume_until("-->"), " note ");
        assert!(scanner.consume("-->"));
        assert_eq!(scanner.remaining(), "rest");
    }

    #[test]
    fn test_multibyte_columns() {
        let mut scanner = Scanner::new("文字<");
        scanner.consume_while(|c| c != '<');
        assert_eq!(scanner.position(), Position::new(6, 1, 3));
    }
}
