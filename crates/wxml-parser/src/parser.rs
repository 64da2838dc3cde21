//! Recursive-descent parser for WXML templates.

use crate::ast::*;
use crate::error::{ParseError, ParseWarning};
use crate::scanner::Scanner;
use source_map::{Location, Position};
use tracing::{debug, trace};

/// Tuning knobs for [`parse_template_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest element nesting accepted before the parser gives up on a branch.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Everything a parse produced: the forest plus any diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub tree: Vec<Node>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors rendered as `line <L> column <C>: <message>`.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Parse a WXML template with default options.
pub fn parse_template(source: &str) -> ParseOutput {
    parse_template_with(source, ParserOptions::default())
}

/// Parse a WXML template.
///
/// Never fails: malformed markup is reported through
/// [`ParseOutput::errors`] and parsing carries on at the next top-level
/// position.
pub fn parse_template_with(source: &str, options: ParserOptions) -> ParseOutput {
    TemplateParser::new(source, options).parse()
}

fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn is_attr_name_char(c: char) -> bool {
    is_tag_name_char(c) || c == ':' || c == '@' || c == '.'
}

struct TemplateParser<'a> {
    scanner: Scanner<'a>,
    options: ParserOptions,
    depth: usize,
    errors: Vec<ParseError>,
    warnings: Vec<ParseWarning>,
}

impl<'a> TemplateParser<'a> {
    fn new(source: &'a str, options: ParserOptions) -> Self {
        Self {
            scanner: Scanner::new(source),
            options,
            depth: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn parse(mut self) -> ParseOutput {
        let mut tree = Vec::new();

        loop {
            self.scanner.skip_whitespace();
            if self.scanner.is_eof() {
                break;
            }

            if self.scanner.starts_with("</") {
                self.skip_dangling_close_tag();
                continue;
            }

            if let Some(node) = self.parse_node() {
                tree.push(node);
            }
        }

        debug!(
            nodes = tree.len(),
            errors = self.errors.len(),
            warnings = self.warnings.len(),
            "parsed template"
        );

        ParseOutput {
            tree,
            errors: self.errors,
            warnings: self.warnings,
        }
    }

    fn error(&mut self, err: ParseError) {
        trace!(%err, "parse error");
        self.errors.push(err);
    }

    fn warn(&mut self, warning: ParseWarning) {
        trace!(%warning, "parse warning");
        self.warnings.push(warning);
    }

    fn location_from(&self, start: Position) -> Location {
        Location::between(start, self.scanner.position())
    }

    fn parse_node(&mut self) -> Option<Node> {
        if self.scanner.current() == Some('<') {
            self.parse_element()
        } else {
            self.parse_text()
        }
    }

    /// Top-level `</name>` with nothing open.
    fn skip_dangling_close_tag(&mut self) {
        let start = self.scanner.position();
        self.scanner.consume("</");
        let name = self.scanner.consume_while(is_tag_name_char);
        self.scanner.skip_whitespace();
        self.scanner.consume(">");
        let span = self.scanner.span_from(start);
        self.error(ParseError::unexpected_close_tag(name, start, span));
    }

    fn parse_element(&mut self) -> Option<Node> {
        let start = self.scanner.position();
        self.scanner.advance();

        if self.scanner.consume("!--") {
            return Some(self.parse_comment(start));
        }

        let tag = self.scanner.consume_while(is_tag_name_char);
        if tag.is_empty() {
            let at = self.scanner.position();
            self.error(ParseError::missing_tag_name(at));
            return None;
        }

        let attrs = self.parse_attributes()?;
        let self_closing = self.scanner.consume("/>");
        if !self_closing {
            self.scanner.consume(">");
        }
        let start_tag = self.scanner.span_from(start);

        let mut element = ElementNode {
            tag: tag.into(),
            attrs,
            children: Vec::new(),
            self_closing,
            loc: Location::default(),
            start_tag,
        };

        if !self_closing {
            if self.depth >= self.options.max_depth {
                self.error(ParseError::too_deep(self.options.max_depth, start, start_tag));
                self.skip_subtree();
                return None;
            }
            self.depth += 1;
            element.children = self.parse_children(tag, start);
            self.depth -= 1;
        }

        element.loc = self.location_from(start);
        Some(Node::Element(element))
    }

    /// Skip the content of an element whose start tag was just consumed,
    /// through its matching close tag, without building nodes.
    ///
    /// Nesting is tracked with a counter only, so input of any depth is
    /// skipped in constant stack space.
    fn skip_subtree(&mut self) {
        let mut open = 1usize;

        while open > 0 && !self.scanner.is_eof() {
            if self.scanner.consume("<!--") {
                self.scanner.consume_until("-->");
                self.scanner.consume("-->");
            } else if self.scanner.consume("</") {
                self.scanner.consume_until(">");
                self.scanner.consume(">");
                open -= 1;
            } else if self.scanner.consume("<") {
                if !self.skip_start_tag() {
                    open += 1;
                }
            } else {
                self.scanner.consume_until("<");
            }
        }
    }

    /// Skip the rest of a start tag, honouring quoted values.
    /// Returns whether it was self-closing.
    fn skip_start_tag(&mut self) -> bool {
        let mut last = None;
        while let Some(c) = self.scanner.advance() {
            match c {
                '>' => return last == Some('/'),
                '"' | '\'' => {
                    while let Some(q) = self.scanner.advance() {
                        if q == c {
                            break;
                        }
                    }
                }
                c if c.is_whitespace() => continue,
                _ => {}
            }
            last = Some(c);
        }
        false
    }

    /// Collect children up to `</tag>`.
    ///
    /// A closing tag for some other element ends the collection with an
    /// error; nothing after it is attached to this element.
    fn parse_children(&mut self, tag: &str, open: Position) -> Vec<Node> {
        let mut children = Vec::new();

        loop {
            if self.scanner.is_eof() {
                let span = self.scanner.span_from(open);
                self.warn(ParseWarning::new(
                    format!("<{tag}> is never closed"),
                    open,
                    span,
                ));
                break;
            }

            if self.scanner.starts_with("</") {
                let close_start = self.scanner.position();
                self.scanner.consume("</");
                let name = self.scanner.consume_while(is_tag_name_char);
                self.scanner.skip_whitespace();
                if !self.scanner.consume(">") {
                    let found = self.scanner.current();
                    let at = self.scanner.position();
                    self.error(ParseError::expected("'>'", found, at));
                }
                if name != tag {
                    let span = self.scanner.span_from(close_start);
                    self.error(ParseError::mismatched_close_tag(name, tag, close_start, span));
                }
                break;
            }

            if let Some(node) = self.parse_node() {
                children.push(node);
            }
        }

        children
    }

    /// Parse attributes up to, but not including, `>` or `/>`.
    fn parse_attributes(&mut self) -> Option<Attributes> {
        let mut attrs = Attributes::default();

        loop {
            self.scanner.skip_whitespace();
            match self.scanner.current() {
                Some('>') => break,
                Some('/') if self.scanner.starts_with("/>") => break,
                Some(c) if is_attr_name_char(c) => {
                    let at = self.scanner.position();
                    let attr = self.parse_attribute()?;
                    if attrs.get(&attr.name).is_some() {
                        self.warn(ParseWarning::new(
                            format!("duplicate attribute `{}`, the last value wins", attr.name),
                            at,
                            attr.span,
                        ));
                    }
                    attrs.push(attr);
                }
                found => {
                    let at = self.scanner.position();
                    self.error(ParseError::expected("'>'", found, at));
                    return None;
                }
            }
        }

        Some(attrs)
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let start = self.scanner.position();
        let name = self.scanner.consume_while(is_attr_name_char);

        let mut lookahead = self.scanner.clone();
        lookahead.skip_whitespace();
        let value = if lookahead.current() == Some('=') {
            self.scanner = lookahead;
            self.scanner.advance();
            self.scanner.skip_whitespace();
            Some(self.parse_attribute_value()?)
        } else {
            None
        };

        let span = self.scanner.span_from(start);
        Some(Attribute::new(name, value).with_span(span))
    }

    fn parse_attribute_value(&mut self) -> Option<String> {
        let quote = match self.scanner.current() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                let raw = self
                    .scanner
                    .consume_while(|c| !c.is_whitespace() && c != '>' && c != '/');
                return Some(raw.to_string());
            }
        };

        let start = self.scanner.position();
        self.scanner.advance();
        let mut value = String::new();
        loop {
            match self.scanner.advance() {
                Some(c) if c == quote => return Some(value),
                Some('\\') => {
                    value.push('\\');
                    if let Some(escaped) = self.scanner.advance() {
                        value.push(escaped);
                    }
                }
                Some(c) => value.push(c),
                None => {
                    let span = self.scanner.span_from(start);
                    self.error(ParseError::unterminated_value(quote, start, span));
                    return None;
                }
            }
        }
    }

    /// Parse the rest of a comment; `<!--` has been consumed.
    fn parse_comment(&mut self, start: Position) -> Node {
        let content = self.scanner.consume_until("-->");
        if !self.scanner.consume("-->") {
            let span = self.scanner.span_from(start);
            self.warn(ParseWarning::new("comment is never closed", start, span));
        }
        Node::Comment(CommentNode {
            content: content.to_string(),
            loc: self.location_from(start),
        })
    }

    fn parse_text(&mut self) -> Option<Node> {
        let start = self.scanner.position();
        let content = self.scanner.consume_until("<");
        if content.trim().is_empty() {
            return None;
        }
        Some(Node::Text(TextNode {
            content: content.to_string(),
            loc: self.location_from(start),
        }))
    }
}
