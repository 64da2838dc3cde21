//! WXML to Vue template conversion.
//!
//! The converter is a [`Visitor`]: entering an element writes its mapped
//! start tag, exiting writes the end tag. Input nodes are only read.

use crate::mapping::{is_void_tag, map_attribute, map_directive, LoopAliases, TAG_MAP};
use crate::writer::{EmptyForm, MarkupWriter};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_map::SourceMap;
use tracing::debug;
use wxml_parser::{traverse, ElementNode, Node, Visitor};

/// Options for [`convert_with`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Extra tag mappings, applied on top of [`TAG_MAP`].
    pub tag_overrides: IndexMap<SmolStr, SmolStr>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            tag_overrides: IndexMap::new(),
        }
    }
}

/// Convert a WXML forest to Vue template markup with default options.
pub fn convert(tree: &[Node]) -> String {
    convert_with(tree, &ConvertOptions::default())
}

pub fn convert_with(tree: &[Node], options: &ConvertOptions) -> String {
    convert_with_map(tree, options).0
}

/// Convert and return a map from the output back to the WXML source.
pub fn convert_with_map(tree: &[Node], options: &ConvertOptions) -> (String, SourceMap) {
    let mut converter = Converter::new(options);
    traverse(tree, &mut converter);
    let (code, map) = converter.finish();
    debug!(
        nodes = tree.len(),
        bytes = code.len(),
        mappings = map.len(),
        "converted template"
    );
    (code, map)
}

/// Emits Vue markup while walking a WXML tree.
pub struct Converter {
    writer: MarkupWriter,
    tags: FxHashMap<SmolStr, SmolStr>,
}

impl Converter {
    pub fn new(options: &ConvertOptions) -> Self {
        let mut tags: FxHashMap<SmolStr, SmolStr> = TAG_MAP
            .iter()
            .map(|(from, to)| (SmolStr::new(from), SmolStr::new(to)))
            .collect();
        tags.extend(options.tag_overrides.clone());

        Self {
            writer: MarkupWriter::new(options.indent_width),
            tags,
        }
    }

    /// Target name for a source tag; unknown tags keep their name.
    pub fn map_tag(&self, tag: &SmolStr) -> SmolStr {
        self.tags.get(tag).cloned().unwrap_or_else(|| tag.clone())
    }

    fn attributes(el: &ElementNode) -> Vec<String> {
        let aliases = LoopAliases::of(&el.attrs);
        el.attrs
            .iter()
            .filter_map(|attr| match &attr.directive {
                Some(dir) => map_directive(attr, dir, &aliases),
                None => map_attribute(attr),
            })
            .collect()
    }

    pub fn finish(self) -> (String, SourceMap) {
        self.writer.finish()
    }
}

impl<'a> Visitor<'a> for Converter {
    fn enter(&mut self, node: &'a Node, _parent: Option<&'a Node>) {
        match node {
            Node::Element(el) => {
                let tag = self.map_tag(&el.tag);
                let empty = if is_void_tag(&tag) {
                    EmptyForm::SelfClosing
                } else {
                    EmptyForm::OpenClose
                };
                self.writer
                    .open_element(el, &tag, &Self::attributes(el), empty);
            }
            Node::Text(text) => self.writer.text(text),
            Node::Comment(comment) => self.writer.comment(comment),
        }
    }

    fn exit(&mut self, node: &'a Node, _parent: Option<&'a Node>) {
        if let Node::Element(el) = node {
            let tag = self.map_tag(&el.tag);
            self.writer.close_element(el, &tag);
        }
    }
}
