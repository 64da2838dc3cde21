//! WXML template parser.
//!
//! This crate turns mini-program template markup into a forest of
//! [`Node`]s, reporting malformed markup as positioned diagnostics instead of
//! failing, and provides a depth-first [`traverse`] over the result.

pub mod ast;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod traverse;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseWarning};
pub use parser::{parse_template, parse_template_with, ParseOutput, ParserOptions};
pub use scanner::Scanner;
pub use traverse::{traverse, FnVisitor, Visitor};

/// Parse a WXML template.
pub fn parse(source: &str) -> ParseOutput {
    parse_template(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        let source = r#"<view class="page">
  <!-- header -->
  <text wx:if="{{ title }}">{{ title }}</text>
  <block wx:for="{{ items }}" wx:key="id">
    <image src="{{ item.icon }}" />
  </block>
</view>
"#;
        let out = parse(source);
        assert!(out.errors.is_empty(), "{:?}", out.error_messages());
        assert!(out.warnings.is_empty());
        assert_eq!(out.tree.len(), 1);
        assert_eq!(out.tree[0].children().len(), 3);
    }

    #[test]
    fn test_errors_do_not_stop_parsing() {
        let out = parse("<view></text><view>ok</view>");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.tree.len(), 2);
    }
}
