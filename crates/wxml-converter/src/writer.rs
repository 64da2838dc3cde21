//! Indented markup output shared by the converter and the serializer.

use source_map::{CodeBuilder, SourceMap, Span};
use wxml_parser::{CommentNode, ElementNode, TextNode};

/// How an element without children is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyForm {
    /// `<tag />`
    SelfClosing,
    /// `<tag></tag>`
    OpenClose,
}

/// Writes one node per line with a fixed indent per nesting level.
///
/// An element whose only child is text is kept on a single line, so
/// `<span>{{ msg }}</span>` stays readable.
#[derive(Debug)]
pub struct MarkupWriter {
    builder: CodeBuilder,
    indent_unit: String,
    depth: usize,
    inline: bool,
}

impl MarkupWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            builder: CodeBuilder::new(),
            indent_unit: " ".repeat(indent_width),
            depth: 0,
            inline: false,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.depth {
            self.builder.push_str(&self.indent_unit);
        }
    }

    /// Write the start tag of `el` as `tag` with already-rendered attributes.
    pub fn open_element(&mut self, el: &ElementNode, tag: &str, attrs: &[String], empty: EmptyForm) {
        let mut open = format!("<{tag}");
        for attr in attrs {
            open.push(' ');
            open.push_str(attr);
        }

        self.write_indent();
        if el.children.is_empty() {
            match empty {
                EmptyForm::SelfClosing => open.push_str(" />"),
                EmptyForm::OpenClose => {
                    open.push_str("></");
                    open.push_str(tag);
                    open.push('>');
                }
            }
            self.builder.push_with_mapping(&open, el.start_tag);
            self.builder.newline();
        } else if el.has_only_text() {
            open.push('>');
            self.builder.push_with_mapping(&open, el.start_tag);
            self.inline = true;
        } else {
            open.push('>');
            self.builder.push_with_mapping(&open, el.start_tag);
            self.builder.newline();
            self.depth += 1;
        }
    }

    /// Write the end tag of `el`; elements without children were closed on open.
    pub fn close_element(&mut self, el: &ElementNode, tag: &str) {
        if el.children.is_empty() {
            return;
        }
        if self.inline {
            self.inline = false;
        } else {
            self.depth = self.depth.saturating_sub(1);
            self.write_indent();
        }
        self.builder.push_str("</");
        self.builder.push_str(tag);
        self.builder.push('>');
        self.builder.newline();
    }

    /// Write the trimmed text content.
    pub fn text(&mut self, text: &TextNode) {
        let trimmed = text.content.trim();
        let lead = text.content.len() - text.content.trim_start().len();
        let start = text.loc.start() + lead as u32;
        let span = Span::new(start, start + trimmed.len() as u32);

        if self.inline {
            self.builder.push_with_mapping(trimmed, span);
        } else {
            self.write_indent();
            self.builder.push_with_mapping(trimmed, span);
            self.builder.newline();
        }
    }

    pub fn comment(&mut self, comment: &CommentNode) {
        self.write_indent();
        self.builder.push_str("<!--");
        self.builder
            .push_with_mapping(&comment.content, comment.loc.span);
        self.builder.push_str("-->");
        self.builder.newline();
    }

    /// The written markup without its trailing newline.
    pub fn finish(mut self) -> (String, SourceMap) {
        self.builder.trim_end_newlines();
        self.builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wxml_parser::Node;

    #[test]
    fn test_nested_layout() {
        let inner = ElementNode::new("span").with_child(Node::text("  hi  "));
        let outer = ElementNode::new("div").with_child(inner.clone());

        let mut writer = MarkupWriter::new(2);
        writer.open_element(&outer, "div", &["class=\"a\"".into()], EmptyForm::OpenClose);
        writer.open_element(&inner, "span", &[], EmptyForm::OpenClose);
        if let Node::Text(t) = &inner.children[0] {
            writer.text(t);
        }
        writer.close_element(&inner, "span");
        writer.close_element(&outer, "div");

        let (code, _) = writer.finish();
        assert_eq!(code, "<div class=\"a\">\n  <span>hi</span>\n</div>");
    }

    #[test]
    fn test_empty_forms() {
        let el = ElementNode::new("x");
        let mut writer = MarkupWriter::new(4);
        writer.open_element(&el, "img", &[], EmptyForm::SelfClosing);
        writer.open_element(&el, "div", &[], EmptyForm::OpenClose);
        writer.close_element(&el, "div");

        let (code, _) = writer.finish();
        assert_eq!(code, "<img />\n<div></div>");
    }
}
