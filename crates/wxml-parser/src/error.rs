//! Diagnostics produced while parsing WXML.

use source_map::{Position, Span};
use std::fmt;

/// A problem found in the markup.
///
/// The parser never returns these as `Err`; they are collected into
/// [`ParseOutput`](crate::ParseOutput) alongside whatever tree could be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line} column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub code: ErrorCode,
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: u32,
    /// 1-based column of `span.start`.
    pub column: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, code: ErrorCode, at: Position, span: Span) -> Self {
        Self {
            message: message.into(),
            code,
            span,
            line: at.line,
            column: at.column,
        }
    }

    pub fn expected(what: &str, found: Option<char>, at: Position) -> Self {
        let found = match found {
            Some(c) => format!("'{c}'"),
            None => "end of input".to_string(),
        };
        Self::new(
            format!("expected {what}, found {found}"),
            ErrorCode::UnexpectedToken,
            at,
            Span::empty(at.offset),
        )
    }

    pub fn missing_tag_name(at: Position) -> Self {
        Self::new(
            "missing tag name",
            ErrorCode::MissingTagName,
            at,
            Span::empty(at.offset),
        )
    }

    pub fn unterminated_value(quote: char, at: Position, span: Span) -> Self {
        Self::new(
            format!("unterminated attribute value, missing closing {quote}"),
            ErrorCode::UnterminatedValue,
            at,
            span,
        )
    }

    pub fn mismatched_close_tag(found: &str, expected: &str, at: Position, span: Span) -> Self {
        Self::new(
            format!("mismatched closing tag </{found}>, expected </{expected}>"),
            ErrorCode::MismatchedCloseTag,
            at,
            span,
        )
    }

    pub fn unexpected_close_tag(found: &str, at: Position, span: Span) -> Self {
        Self::new(
            format!("unexpected closing tag </{found}>"),
            ErrorCode::UnexpectedCloseTag,
            at,
            span,
        )
    }

    pub fn too_deep(limit: usize, at: Position, span: Span) -> Self {
        Self::new(
            format!("elements nested deeper than {limit} levels"),
            ErrorCode::NestingTooDeep,
            at,
            span,
        )
    }
}

/// A recoverable oddity: the tree is complete but the markup was sloppy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub message: String,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl ParseWarning {
    pub fn new(message: impl Into<String>, at: Position, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            line: at.line,
            column: at.column,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}: {}", self.line, self.column, self.message)
    }
}

/// Error codes for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// An expected character such as `>` was not found.
    UnexpectedToken,
    /// `<` not followed by a tag name.
    MissingTagName,
    /// A quoted attribute value ran to end of input.
    UnterminatedValue,
    /// `</b>` closing an open `<a>`.
    MismatchedCloseTag,
    /// A closing tag with nothing open.
    UnexpectedCloseTag,
    /// Nesting exceeded the parser's depth limit.
    NestingTooDeep,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedToken => "unexpected-token",
            ErrorCode::MissingTagName => "missing-tag-name",
            ErrorCode::UnterminatedValue => "unterminated-value",
            ErrorCode::MismatchedCloseTag => "mismatched-close-tag",
            ErrorCode::UnexpectedCloseTag => "unexpected-close-tag",
            ErrorCode::NestingTooDeep => "nesting-too-deep",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
