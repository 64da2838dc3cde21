//! WXML to Vue template conversion.
//!
//! This crate rewrites a parsed mini-program template into Vue template
//! markup, and can alternatively tag every element with a position-based
//! `ref` and print the template back as WXML.

pub mod annotate;
pub mod convert;
pub mod mapping;
pub mod writer;

use source_map::SourceMap;
use wxml_parser::{parse_template, ParseError, ParseWarning};

pub use annotate::{annotate, ref_id, tree_to_text, REF_ATTR};
pub use convert::{convert, convert_with, convert_with_map, ConvertOptions, Converter};
pub use writer::{EmptyForm, MarkupWriter};

/// Result of processing one template source.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The generated markup.
    pub output: String,
    /// Mappings from `output` back to the template source.
    pub source_map: SourceMap,
    /// Errors reported by the parser. Output is still produced.
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
}

impl Conversion {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse `source` and convert it to a Vue template.
pub fn transpile(source: &str, options: &ConvertOptions) -> Conversion {
    let parsed = parse_template(source);
    let (output, source_map) = convert_with_map(&parsed.tree, options);

    Conversion {
        output,
        source_map,
        errors: parsed.errors,
        warnings: parsed.warnings,
    }
}

/// Parse `source`, annotate every element and print it back as WXML.
pub fn annotate_source(source: &str) -> Conversion {
    let parsed = parse_template(source);
    let output = tree_to_text(&annotate(&parsed.tree));

    Conversion {
        output,
        source_map: SourceMap::new(),
        errors: parsed.errors,
        warnings: parsed.warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transpile() {
        let result = transpile(
            r#"<view wx:if="{{ ok }}"><text bindtap="go">{{ msg }}</text></view>"#,
            &ConvertOptions::default(),
        );
        assert!(!result.has_errors());
        assert_eq!(
            result.output,
            "<div v-if=\"ok\">\n  <span @click=\"go\">{{ msg }}</span>\n</div>"
        );
        assert!(!result.source_map.is_empty());
    }

    #[test]
    fn test_transpile_reports_errors() {
        let result = transpile("<div>\n  <p>\n  </span>", &ConvertOptions::default());
        assert!(result.has_errors());
        assert_eq!(
            result.errors[0].to_string(),
            "line 3 column 3: mismatched closing tag </span>, expected </p>"
        );
        assert_eq!(result.output, "<div>\n  <p></p>\n</div>");
    }

    #[test]
    fn test_annotate_source() {
        let result = annotate_source("<view><text>a</text></view>");
        assert_eq!(
            result.output,
            "<view ref=\"devtools_1_view\">\n  <text ref=\"devtools_1-1_text\">a</text>\n</view>"
        );
    }
}
