// src/scan.rs
//
// Minimal JSX tag lexer.
//
// - A tag starts at '<' immediately followed by an ASCII letter, or by '/' and a letter.
// - Attribute values:
//     • "..." / '...' : copied as-is, may span lines.
//     • {...}         : brace depth is tracked; "...", '...' and `...` strings inside are
//                       skipped with backslash escapes, so '>' in `onClick={() => go()}` or
//                       `icon={<Icon />}` never ends the tag.
//     • {...spread}   : recorded as an attribute with an empty name.
// - Anything else at attribute position (',', ')', ';', '&', '<', ...) means the text is
//   not a JSX tag (TypeScript generics, comparisons). The scanner then moves one byte on.
// - Unterminated tags are not tags.
// - Every attribute span includes its leading whitespace, so removing the span leaves
//   no gap behind.

use memchr::memchr;
use std::ops::Range;

/* ================================ Types ================================= */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
    SelfClosing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrValue<'a> {
    /// `"..."` or `'...'`, quotes included.
    Quoted(&'a str),
    /// `{...}`, braces included.
    Expr(&'a str),
}

impl<'a> AttrValue<'a> {
    pub fn raw(&self) -> &'a str {
        match self {
            AttrValue::Quoted(s) | AttrValue::Expr(s) => s,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr<'a> {
    /// Empty for `{...spread}` attributes.
    pub name: &'a str,
    pub value: Option<AttrValue<'a>>,
    /// Byte range relative to the tag, leading whitespace included.
    pub span: Range<usize>,
}

impl Attr<'_> {
    /// Offset of the value's first byte (its opening quote or brace) within the tag.
    pub fn value_offset(&self) -> Option<usize> {
        self.value.map(|v| self.span.end - v.raw().len())
    }
}

#[derive(Clone, Debug)]
pub struct Tag<'a> {
    /// Full `<...>` text.
    pub raw: &'a str,
    /// Offset of '<' in the document.
    pub start: usize,
    pub name: &'a str,
    /// Range of the name within `raw`.
    pub name_span: Range<usize>,
    pub kind: TagKind,
    pub attrs: Vec<Attr<'a>>,
    /// Offset within `raw` just after the last attribute (or the name).
    pub attrs_end: usize,
}

impl<'a> Tag<'a> {
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    pub fn opens(&self) -> bool {
        matches!(self.kind, TagKind::Start | TagKind::SelfClosing)
    }

    /// First attribute named `name`. The lookup never leaves this tag's text.
    pub fn attr(&self, name: &str) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

/// Finds tags in a document. Rules only see what a matcher hands them.
pub trait TagMatcher {
    /// Next tag whose '<' is at or after `from`.
    fn next_tag<'a>(&self, text: &'a str, from: usize) -> Option<Tag<'a>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsxScanner;

impl TagMatcher for JsxScanner {
    fn next_tag<'a>(&self, text: &'a str, mut from: usize) -> Option<Tag<'a>> {
        let s = text.as_bytes();
        while from < s.len() {
            let lt = from + memchr(b'<', &s[from..])?;
            if let Some(tag) = lex_tag(text, lt) {
                return Some(tag);
            }
            from = lt + 1;
        }
        None
    }
}

/* ============================ Utility predicates ========================= */

#[inline]
fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':' || b == b'.' || b == b'$'
}

#[inline]
fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r'
}

/* =============================== Skipping =============================== */

/// `s[i]` is the opening quote. Returns the index just past the closing quote.
fn skip_string(s: &[u8], i: usize, quote: u8) -> Option<usize> {
    let mut j = i + 1;
    while j < s.len() {
        match s[j] {
            b'\\' => j += 2,
            b if b == quote => return Some(j + 1),
            _ => j += 1,
        }
    }
    None
}

/// `s[i]` is '{'. Returns the index just past the matching '}'.
fn skip_braces(s: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 0usize;
    while i < s.len() {
        match s[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            q @ (b'"' | b'\'' | b'`') => {
                i = skip_string(s, i, q)?;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// JSX attribute strings have no escapes; they end at the first matching quote.
fn skip_attr_string(s: &[u8], i: usize) -> Option<usize> {
    let quote = s[i];
    memchr(quote, &s[i + 1..]).map(|off| i + 1 + off + 1)
}

/* ================================ Lexing ================================ */

/// Try to lex one tag whose '<' sits at `start`.
fn lex_tag(text: &str, start: usize) -> Option<Tag<'_>> {
    let s = text.as_bytes();
    let n = s.len();
    let mut i = start + 1;

    let is_end = s.get(i) == Some(&b'/');
    if is_end {
        i += 1;
    }
    if !s.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = i;
    while i < n && is_name_char(s[i]) {
        i += 1;
    }
    let name_span = name_start - start..i - start;

    let mut attrs = Vec::new();
    let (kind, close) = loop {
        let ws_start = i;
        while i < n && is_ws(s[i]) {
            i += 1;
        }
        match *s.get(i)? {
            b'>' => {
                let kind = if is_end { TagKind::End } else { TagKind::Start };
                break (kind, (i, ws_start));
            }
            b'/' if !is_end && s.get(i + 1) == Some(&b'>') => {
                break (TagKind::SelfClosing, (i + 1, ws_start));
            }
            b'{' if !is_end && i > ws_start => {
                let j = skip_braces(s, i)?;
                attrs.push(Attr {
                    name: "",
                    value: Some(AttrValue::Expr(&text[i..j])),
                    span: ws_start - start..j - start,
                });
                i = j;
            }
            b if !is_end && i > ws_start && (b.is_ascii_alphabetic() || b == b'_') => {
                let attr_name_start = i;
                while i < n && is_attr_name_char(s[i]) {
                    i += 1;
                }
                let name = &text[attr_name_start..i];
                let name_end = i;

                // optional "= value"
                while i < n && is_ws(s[i]) {
                    i += 1;
                }
                let value = if s.get(i) == Some(&b'=') {
                    i += 1;
                    while i < n && is_ws(s[i]) {
                        i += 1;
                    }
                    let value_start = i;
                    match *s.get(i)? {
                        b'"' | b'\'' => {
                            i = skip_attr_string(s, i)?;
                            Some(AttrValue::Quoted(&text[value_start..i]))
                        }
                        b'{' => {
                            i = skip_braces(s, i)?;
                            Some(AttrValue::Expr(&text[value_start..i]))
                        }
                        _ => return None,
                    }
                } else {
                    // bare attribute; leave the whitespace for the next round
                    i = name_end;
                    None
                };

                attrs.push(Attr {
                    name,
                    value,
                    span: ws_start - start..i - start,
                });
            }
            _ => return None,
        }
    };

    let (gt, attrs_end) = close;
    Some(Tag {
        raw: &text[start..=gt],
        start,
        name: &text[name_start..name_start + name_span.len()],
        name_span,
        kind,
        attrs,
        attrs_end: attrs_end - start,
    })
}

/* ================================= Tests ================================= */
