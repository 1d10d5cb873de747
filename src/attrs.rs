//! Attribute extraction for tag synthesis.
//!
//! Values are read from the attributes the scanner already split out of one
//! tag, so a lookup can never run past that tag's closing `>`.

use crate::scan::{AttrValue, Tag};

/// Attributes needed to synthesize a plain tag from an animated one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedAttributes<'a> {
    /// Decimal text of a `level` in 1..=6.
    pub heading_level: Option<&'a str>,
    /// The `className` value exactly as written: `"..."`, `'...'` or `{...}`.
    pub style_class: Option<&'a str>,
}

/// Extract `level` and `className`, each independently of the other.
pub fn extract<'a>(tag: &Tag<'a>) -> ExtractedAttributes<'a> {
    ExtractedAttributes {
        heading_level: heading_level(tag),
        style_class: style_class(tag),
    }
}

pub fn heading_level<'a>(tag: &Tag<'a>) -> Option<&'a str> {
    let level = numeric_literal(tag.attr("level")?.value?)?;
    matches!(level, "1" | "2" | "3" | "4" | "5" | "6").then_some(level)
}

pub fn style_class<'a>(tag: &Tag<'a>) -> Option<&'a str> {
    tag.attr("className")?.value.map(|v| v.raw())
}

/// Inner text of a quoted value.
pub fn string_literal<'a>(value: AttrValue<'a>) -> Option<&'a str> {
    match value {
        AttrValue::Quoted(s) => Some(&s[1..s.len() - 1]),
        AttrValue::Expr(_) => None,
    }
}

/// Decimal text of `{200}`, `{ 0.5 }` or `"200"`.
pub fn numeric_literal(value: AttrValue<'_>) -> Option<&str> {
    let inner = match value {
        AttrValue::Quoted(s) => &s[1..s.len() - 1],
        AttrValue::Expr(s) => s[1..s.len() - 1].trim(),
    };
    is_decimal(inner).then_some(inner)
}

fn is_decimal(s: &str) -> bool {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    digits(int) && frac.map_or(true, digits)
}
