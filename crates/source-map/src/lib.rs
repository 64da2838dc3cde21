//! Source positions and output mappings for wx2vue.
//!
//! The scanner reports [`Position`]s, tree nodes carry a [`Location`], and the
//! converter writes its output through a [`CodeBuilder`] so every emitted tag
//! can be traced back to the WXML it came from.

use std::fmt;
use std::ops::Range;
pub use text_size::{TextRange, TextSize};

/// A half-open byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// An empty span sitting at `offset`.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn contains_offset(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self::new(range.start().into(), range.end().into())
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(TextSize::new(span.start), TextSize::new(span.end))
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.to_range()
    }
}

/// A cursor snapshot: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

/// Where a node came from: its byte span and the line/column it starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// Build a location running from `start` to `end`.
    pub fn between(start: Position, end: Position) -> Self {
        Self {
            span: Span::new(start.offset, end.offset),
            line: start.line,
            column: start.column,
        }
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.span.end
    }
}

/// A mapping from a fragment of generated output back to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMapping {
    pub generated_offset: u32,
    pub generated_length: u32,
    pub source_offset: u32,
    pub source_length: u32,
}

impl SourceMapping {
    pub fn new(generated: Span, source: Span) -> Self {
        Self {
            generated_offset: generated.start,
            generated_length: generated.len(),
            source_offset: source.start,
            source_length: source.len(),
        }
    }

    pub fn generated_span(&self) -> Span {
        Span::new(
            self.generated_offset,
            self.generated_offset + self.generated_length,
        )
    }

    pub fn source_span(&self) -> Span {
        Span::new(self.source_offset, self.source_offset + self.source_length)
    }
}

/// Mappings sorted by generated offset.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMap {
    mappings: Vec<SourceMapping>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping, keeping the list ordered by generated offset.
    pub fn add_mapping(&mut self, mapping: SourceMapping) {
        let pos = self
            .mappings
            .partition_point(|m| m.generated_offset <= mapping.generated_offset);
        self.mappings.insert(pos, mapping);
    }

    /// Find the mapping whose generated range contains `generated_offset`.
    pub fn find_source(&self, generated_offset: u32) -> Option<&SourceMapping> {
        let idx = self
            .mappings
            .partition_point(|m| m.generated_offset <= generated_offset);
        self.mappings[..idx]
            .iter()
            .rev()
            .find(|m| m.generated_span().contains_offset(generated_offset))
    }

    /// Translate a generated offset into the source.
    ///
    /// Offsets inside a fragment whose generated text differs in length from
    /// its source resolve to the start of the source span.
    pub fn to_source_offset(&self, generated_offset: u32) -> Option<u32> {
        self.find_source(generated_offset).map(|m| {
            let delta = generated_offset - m.generated_offset;
            if m.generated_length == m.source_length {
                m.source_offset + delta
            } else {
                m.source_offset
            }
        })
    }

    pub fn mappings(&self) -> &[SourceMapping] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }
}

/// Output buffer that records where each mapped fragment came from.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    code: String,
    source_map: SourceMap,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length of the generated text.
    pub fn offset(&self) -> u32 {
        self.code.len() as u32
    }

    pub fn push_str(&mut self, code: &str) {
        self.code.push_str(code);
    }

    pub fn push(&mut self, c: char) {
        self.code.push(c);
    }

    /// Append `code` and map it to `source`.
    pub fn push_with_mapping(&mut self, code: &str, source: Span) {
        let start = self.offset();
        self.code.push_str(code);
        if !code.is_empty() {
            self.source_map
                .add_mapping(SourceMapping::new(Span::new(start, self.offset()), source));
        }
    }

    pub fn newline(&mut self) {
        self.code.push('\n');
    }

    /// Drop trailing newlines from the buffer.
    pub fn trim_end_newlines(&mut self) {
        while self.code.ends_with('\n') {
            self.code.pop();
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn finish(self) -> (String, SourceMap) {
        (self.code, self.source_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains_offset(15));
        assert!(!span.contains_offset(20));
        assert_eq!(span.merge(Span::new(15, 30)), Span::new(10, 30));
    }

    #[test]
    fn test_location_between() {
        let loc = Location::between(Position::new(4, 2, 3), Position::new(9, 2, 8));
        assert_eq!(loc.span, Span::new(4, 9));
        assert_eq!((loc.line, loc.column), (2, 3));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(0, 3, 7).to_string(), "line 3 column 7");
    }

    #[test]
    fn test_source_map_lookup() {
        let mut map = SourceMap::new();
        map.add_mapping(SourceMapping::new(Span::new(20, 30), Span::new(200, 210)));
        map.add_mapping(SourceMapping::new(Span::new(0, 10), Span::new(100, 110)));

        assert_eq!(map.to_source_offset(5), Some(105));
        assert_eq!(map.to_source_offset(25), Some(205));
        assert_eq!(map.to_source_offset(15), None);
    }

    #[test]
    fn test_unequal_lengths_resolve_to_start() {
        let mut map = SourceMap::new();
        map.add_mapping(SourceMapping::new(Span::new(0, 5), Span::new(40, 52)));
        assert_eq!(map.to_source_offset(3), Some(40));
    }

    #[test]
    fn test_code_builder() {
        let mut builder = CodeBuilder::new();
        builder.push_str("<div ");
        builder.push_with_mapping("v-if=\"ok\"", Span::new(6, 21));
        builder.push_str(">\n\n");
        builder.trim_end_newlines();

        let (code, map) = builder.finish();
        assert_eq!(code, "<div v-if=\"ok\">");
        assert_eq!(map.len(), 1);
        assert_eq!(map.to_source_offset(5), Some(6));
    }
}
