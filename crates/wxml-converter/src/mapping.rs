//! WXML to Vue mapping tables.

use smol_str::SmolStr;
use wxml_parser::{Attribute, Attributes, Directive};

/// Mini-program components and the HTML elements that replace them.
/// Tags not listed here pass through unchanged.
pub const TAG_MAP: &[(&str, &str)] = &[
    ("view", "div"),
    ("text", "span"),
    ("image", "img"),
    ("navigator", "a"),
    ("block", "template"),
    ("scroll-view", "div"),
    ("swiper", "div"),
    ("swiper-item", "div"),
    ("movable-area", "div"),
    ("movable-view", "div"),
    ("cover-view", "div"),
    ("cover-image", "img"),
    ("rich-text", "div"),
    ("icon", "i"),
    ("web-view", "iframe"),
];

/// Elements that never have children and always render as `<tag />`.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Plain attributes that are renamed. An empty target drops the attribute.
pub const ATTRIBUTE_MAP: &[(&str, &str)] = &[
    ("url", "href"),
    ("hover-class", ""),
    ("hover-stop-propagation", ""),
    ("hover-start-time", ""),
    ("hover-stay-time", ""),
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Strip `{{ }}` from a value that is exactly one interpolation.
///
/// Anything else, including text around an interpolation or several
/// interpolations in a row, is returned unchanged.
pub fn unwrap_expression(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
    {
        Some(inner) if !inner.contains("{{") && !inner.contains("}}") => inner.trim(),
        _ => value,
    }
}

/// Render `name="value"`, or a bare `name` when there is no value.
pub fn render_attr(name: &str, value: Option<&str>) -> String {
    match value {
        None => name.to_string(),
        Some(v) if v.contains('"') && !v.contains('\'') => format!("{name}='{v}'"),
        Some(v) => format!("{name}=\"{}\"", v.replace('"', "&quot;")),
    }
}

/// Map a plain attribute; `None` means it is dropped.
pub fn map_attribute(attr: &Attribute) -> Option<String> {
    let name = match ATTRIBUTE_MAP.iter().find(|(from, _)| attr.name == *from) {
        Some((_, "")) => return None,
        Some((_, to)) => *to,
        None => attr.name.as_str(),
    };
    Some(render_attr(name, attr.value.as_deref()))
}

/// Loop variable names declared on an element.
///
/// `wx:for-item` and `wx:for-index` rename the loop variables; without them
/// the mini-program defaults `item` and `index` apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopAliases<'a> {
    pub item: &'a str,
    pub index: &'a str,
}

impl<'a> LoopAliases<'a> {
    pub fn of(attrs: &'a Attributes) -> Self {
        let alias = |name: &str, default: &'a str| -> &'a str {
            attrs
                .directive(name)
                .map(|d| unwrap_expression(&d.value))
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        Self {
            item: alias("wx:for-item", "item"),
            index: alias("wx:for-index", "index"),
        }
    }
}

impl Default for LoopAliases<'_> {
    fn default() -> Self {
        Self {
            item: "item",
            index: "index",
        }
    }
}

/// Map a directive to its Vue form; `None` means it is dropped.
pub fn map_directive(
    attr: &Attribute,
    dir: &Directive,
    aliases: &LoopAliases<'_>,
) -> Option<String> {
    let expr = unwrap_expression(&dir.value);
    let mapped = match dir.name.as_str() {
        "wx:if" => render_attr("v-if", Some(expr)),
        "wx:elif" => render_attr("v-else-if", Some(expr)),
        "wx:else" => "v-else".to_string(),
        "wx:for" | "wx:for-items" => render_attr(
            "v-for",
            Some(&format!("({}, {}) in {expr}", aliases.item, aliases.index)),
        ),
        // Consumed by the loop itself.
        "wx:for-item" | "wx:for-index" => return None,
        "wx:key" => {
            let key = if expr == "*this" { aliases.item } else { expr };
            render_attr(":key", Some(key))
        }
        "wx:model" | "model:value" => render_attr("v-model", Some(expr)),
        "bindtap" | "bind:tap" | "catchtap" | "catch:tap" | "@tap" => {
            render_attr(&event_name("click", &[], &dir.modifiers), Some(expr))
        }
        name => match map_event(name, expr, dir) {
            Some(event) => event,
            None => render_attr(&attr.name, attr.value.as_deref()),
        },
    };
    Some(mapped)
}

/// Map a `bind`/`catch` style event binding, or `None` if `name` is not one.
fn map_event(name: &str, expr: &str, dir: &Directive) -> Option<String> {
    let (event, implied): (&str, &[&str]) = if let Some(e) = name.strip_prefix("capture-catch:") {
        (e, &["capture", "stop"])
    } else if let Some(e) = name.strip_prefix("capture-bind:") {
        (e, &["capture"])
    } else if let Some(e) = name.strip_prefix("mut-bind:") {
        (e, &[])
    } else if let Some(e) = name.strip_prefix("bind") {
        (e, &[])
    } else if let Some(e) = name.strip_prefix("catch") {
        (e, &["stop"])
    } else {
        return None;
    };

    let event = event.trim_start_matches(':');
    if event.is_empty() {
        return None;
    }
    let event = if event == "tap" { "click" } else { event };
    Some(render_attr(&event_name(event, implied, &dir.modifiers), Some(expr)))
}

fn event_name(event: &str, implied: &[&str], modifiers: &[SmolStr]) -> String {
    let mut name = format!("@{event}");
    let mut add = |modifier: &str| {
        if !name.split('.').skip(1).any(|m| m == modifier) {
            name.push('.');
            name.push_str(modifier);
        }
    };
    for &modifier in implied {
        add(modifier);
    }
    for modifier in modifiers {
        add(modifier.as_str());
    }
    name
}
