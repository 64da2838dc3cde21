//! Path-based `ref` annotation and WXML re-serialization.

use crate::mapping::render_attr;
use crate::writer::{EmptyForm, MarkupWriter};
use tracing::debug;
use wxml_parser::{traverse, ElementNode, Node, Visitor};

/// Attribute that receives the element identifier.
pub const REF_ATTR: &str = "ref";

/// Identifier written for the element at `path`.
pub fn ref_id(path: &str, tag: &str) -> String {
    format!("devtools_{path}_{tag}")
}

/// Copy `forest`, tagging every element with a `ref` derived from its position.
///
/// Top-level elements are numbered `1`, `2`, ... and each child extends its
/// parent's path with `-N`, counting element siblings only. An existing `ref`
/// is overwritten in place.
pub fn annotate(forest: &[Node]) -> Vec<Node> {
    let mut out = forest.to_vec();

    let mut stack: Vec<(&mut ElementNode, String)> = Vec::new();
    for (i, el) in elements_mut(&mut out).enumerate() {
        stack.push((el, (i + 1).to_string()));
    }

    let mut count = 0usize;
    while let Some((el, path)) = stack.pop() {
        el.attrs.set(REF_ATTR, ref_id(&path, &el.tag));
        count += 1;
        for (i, child) in elements_mut(&mut el.children).enumerate() {
            stack.push((child, format!("{path}-{}", i + 1)));
        }
    }

    debug!(elements = count, "annotated template");
    out
}

fn elements_mut(nodes: &mut [Node]) -> impl Iterator<Item = &mut ElementNode> {
    nodes.iter_mut().filter_map(|node| match node {
        Node::Element(el) => Some(el),
        _ => None,
    })
}

/// Render a forest back to WXML markup.
///
/// Attributes keep their source order and raw values. Elements written as
/// `<tag />` in the source stay self-closing, following the parser's
/// `self_closing` flag, rather than every empty element being expanded.
/// Other empty elements become `<tag></tag>`.
pub fn tree_to_text(forest: &[Node]) -> String {
    let mut serializer = Serializer {
        writer: MarkupWriter::new(2),
    };
    traverse(forest, &mut serializer);
    serializer.writer.finish().0
}

struct Serializer {
    writer: MarkupWriter,
}

impl<'a> Visitor<'a> for Serializer {
    fn enter(&mut self, node: &'a Node, _parent: Option<&'a Node>) {
        match node {
            Node::Element(el) => {
                let attrs: Vec<String> = el
                    .attrs
                    .iter()
                    .map(|attr| render_attr(&attr.name, attr.value.as_deref()))
                    .collect();
                let empty = if el.self_closing {
                    EmptyForm::SelfClosing
                } else {
                    EmptyForm::OpenClose
                };
                self.writer.open_element(el, &el.tag, &attrs, empty);
            }
            Node::Text(text) => self.writer.text(text),
            Node::Comment(comment) => self.writer.comment(comment),
        }
    }

    fn exit(&mut self, node: &'a Node, _parent: Option<&'a Node>) {
        if let Node::Element(el) = node {
            self.writer.close_element(el, &el.tag);
        }
    }
}
