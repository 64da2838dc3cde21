//! Node tree for parsed WXML templates.

use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::{Location, Span};

/// Attribute-name prefixes that mark a directive rather than a plain attribute.
///
/// Longer prefixes come first so `capture-bind:tap` is not mistaken for a
/// plain attribute.
pub const DIRECTIVE_PREFIXES: &[&str] = &[
    "capture-catch:",
    "capture-bind:",
    "mut-bind:",
    "model:",
    "wx:",
    "@",
    "bind",
    "catch",
];

/// Check whether an attribute name is a directive.
pub fn is_directive_name(name: &str) -> bool {
    DIRECTIVE_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
}

impl Node {
    /// Build a text node without source information.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextNode {
            content: content.into(),
            loc: Location::default(),
        })
    }

    /// Build a comment node without source information.
    pub fn comment(content: impl Into<String>) -> Self {
        Self::Comment(CommentNode {
            content: content.into(),
            loc: Location::default(),
        })
    }

    pub fn loc(&self) -> Location {
        match self {
            Self::Element(n) => n.loc,
            Self::Text(n) => n.loc,
            Self::Comment(n) => n.loc,
        }
    }

    /// Child nodes; only elements have any.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(n) => &n.children,
            Self::Text(_) | Self::Comment(_) => &[],
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

impl From<ElementNode> for Node {
    fn from(el: ElementNode) -> Self {
        Self::Element(el)
    }
}

/// An element such as `<view class="a">...</view>`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementNode {
    pub tag: SmolStr,
    pub attrs: Attributes,
    pub children: Vec<Node>,
    /// Written as `<tag ... />` in the source.
    pub self_closing: bool,
    pub loc: Location,
    /// Span of the start tag, `<` through `>` or `/>`.
    pub start_tag: Span,
}

impl ElementNode {
    /// Build an element without source information.
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::default(),
            children: Vec::new(),
            self_closing: false,
            loc: Location::default(),
            start_tag: Span::default(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute::new(name, Some(value.into())));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Element children only, in source order.
    pub fn element_children(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// The element has exactly one child and it is text.
    pub fn has_only_text(&self) -> bool {
        matches!(self.children.as_slice(), [Node::Text(_)])
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    /// Raw text, interpolations included, whitespace untouched.
    pub content: String,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentNode {
    /// Everything between `<!--` and `-->`.
    pub content: String,
    pub loc: Location,
}

/// An attribute as written on a start tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Full name as written, modifiers included.
    pub name: SmolStr,
    /// `None` for a bare attribute such as `disabled` or `wx:else`.
    pub value: Option<String>,
    /// Parsed form when the name is a directive.
    pub directive: Option<Directive>,
    pub span: Span,
}

impl Attribute {
    /// Build an attribute, classifying it as a directive when the name says so.
    pub fn new(name: &str, value: Option<String>) -> Self {
        let directive = is_directive_name(name)
            .then(|| Directive::parse(name, value.as_deref().unwrap_or_default()));
        Self {
            name: name.into(),
            value,
            directive,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_directive(&self) -> bool {
        self.directive.is_some()
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// A directive such as `wx:if`, `bindtap` or `@tap.stop`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Directive {
    /// Name with modifiers stripped.
    pub name: SmolStr,
    /// Raw value, usually still wrapped in `{{ }}`.
    pub value: String,
    pub modifiers: Vec<SmolStr>,
}

impl Directive {
    /// Split `name.mod1.mod2` into a directive.
    pub fn parse(raw_name: &str, value: &str) -> Self {
        let mut parts = raw_name.split('.');
        let name = parts.next().unwrap_or_default();
        Self {
            name: name.into(),
            value: value.to_string(),
            modifiers: parts.filter(|m| !m.is_empty()).map(SmolStr::from).collect(),
        }
    }
}

/// The attributes of one element, kept in source order.
///
/// The name-keyed `props` and `directives` views are derived on demand so
/// the ordered list stays the single source of truth.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attributes {
    all: Vec<Attribute>,
}

impl Attributes {
    pub fn new(all: Vec<Attribute>) -> Self {
        Self { all }
    }

    pub fn all(&self) -> &[Attribute] {
        &self.all
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.all.iter()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn push(&mut self, attr: Attribute) {
        self.all.push(attr);
    }

    /// Plain attributes by name; a later duplicate wins.
    pub fn props(&self) -> IndexMap<SmolStr, String> {
        self.all
            .iter()
            .filter(|a| !a.is_directive())
            .map(|a| (a.name.clone(), a.value_str().to_string()))
            .collect()
    }

    /// Directives by modifier-stripped name; a later duplicate wins.
    pub fn directives(&self) -> IndexMap<SmolStr, Directive> {
        self.all
            .iter()
            .filter_map(|a| a.directive.clone())
            .map(|d| (d.name.clone(), d))
            .collect()
    }

    /// The last attribute written with this exact name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.all.iter().rev().find(|a| a.name == name)
    }

    /// The last directive with this modifier-stripped name.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.all
            .iter()
            .rev()
            .filter_map(|a| a.directive.as_ref())
            .find(|d| d.name == name)
    }

    /// Replace the value of `name` in place, or append it when absent.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.all.iter_mut().find(|a| a.name == name) {
            Some(attr) => {
                let span = attr.span;
                *attr = Attribute::new(name, Some(value)).with_span(span);
            }
            None => self.all.push(Attribute::new(name, Some(value))),
        }
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
