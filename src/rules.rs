//! The rewrite rule catalog.
//!
//! A [`Rule`] is one whole-document pass. Most rules only care about single
//! tags; those implement [`TagRule`] and run through [`TagPass`], which walks
//! the tags a [`TagMatcher`] finds and splices in replacements.

use std::borrow::Cow;

use regex::Regex;
use tracing::debug;

use crate::attrs::{self, numeric_literal, string_literal};
use crate::scan::{Attr, AttrValue, Tag, TagKind, TagMatcher};

/// Heading level used when `level` is missing or unusable.
pub const DEFAULT_HEADING_LEVEL: &str = "2";

/// Token injected into buttons that have no transition styling.
pub const TRANSITION_CLASS: &str = "transition-colors";

pub trait Rule {
    fn name(&self) -> &'static str;

    /// Rewrite `text`, borrowing it back untouched when nothing matched.
    fn apply<'a>(&self, text: &'a str, matcher: &dyn TagMatcher) -> Cow<'a, str>;
}

pub trait TagRule {
    fn name(&self) -> &'static str;

    /// Replacement text for `tag`, or `None` to leave it alone.
    fn rewrite(&self, tag: &Tag<'_>, state: &mut PassState) -> Option<String>;
}

/// Per-document state of one pass.
#[derive(Debug, Default)]
pub struct PassState {
    open_headings: Vec<String>,
}

/// Runs a [`TagRule`] over every tag of a document, including tags nested in
/// another tag's `{...}` attribute values (`fallback={<Spinner />}`).
pub struct TagPass<R>(pub R);

impl<R: TagRule> TagPass<R> {
    fn rewrite_text<'a>(
        &self,
        text: &'a str,
        matcher: &dyn TagMatcher,
        state: &mut PassState,
    ) -> Cow<'a, str> {
        let mut out = String::new();
        let mut copied = 0usize;
        let mut pos = 0usize;
        let mut rewritten = false;

        while let Some(tag) = matcher.next_tag(text, pos) {
            pos = tag.end();
            // nested tags first, then the tag that holds them
            let replacement = match self.rewrite_nested(&tag, matcher, state) {
                Cow::Borrowed(_) => self.0.rewrite(&tag, state),
                Cow::Owned(raw) => Some(self.rewrite_relexed(raw, matcher, state)),
            };
            if let Some(replacement) = replacement {
                out.push_str(&text[copied..tag.start]);
                out.push_str(&replacement);
                copied = pos;
                rewritten = true;
            }
        }

        if !rewritten {
            return Cow::Borrowed(text);
        }
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }

    /// `tag.raw` with the inside of every `{...}` value rewritten.
    fn rewrite_nested<'a>(
        &self,
        tag: &Tag<'a>,
        matcher: &dyn TagMatcher,
        state: &mut PassState,
    ) -> Cow<'a, str> {
        let mut out = String::new();
        let mut copied = 0usize;
        for attr in &tag.attrs {
            let Some(AttrValue::Expr(expr)) = attr.value else {
                continue;
            };
            let inner = &expr[1..expr.len() - 1];
            if let Cow::Owned(rewritten) = self.rewrite_text(inner, matcher, state) {
                // between the braces
                let inner_start = attr.span.end - expr.len() + 1;
                out.push_str(&tag.raw[copied..inner_start]);
                out.push_str(&rewritten);
                copied = attr.span.end - 1;
            }
        }
        if copied == 0 {
            return Cow::Borrowed(tag.raw);
        }
        out.push_str(&tag.raw[copied..]);
        Cow::Owned(out)
    }

    /// Lex `raw` again and give the rule its turn on the result.
    fn rewrite_relexed(
        &self,
        raw: String,
        matcher: &dyn TagMatcher,
        state: &mut PassState,
    ) -> String {
        let rewritten = matcher
            .next_tag(&raw, 0)
            .filter(|t| t.start == 0 && t.end() == raw.len())
            .and_then(|t| self.0.rewrite(&t, state));
        rewritten.unwrap_or(raw)
    }
}

impl<R: TagRule> Rule for TagPass<R> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn apply<'a>(&self, text: &'a str, matcher: &dyn TagMatcher) -> Cow<'a, str> {
        self.rewrite_text(text, matcher, &mut PassState::default())
    }
}

/* ============================ Import removal ============================ */

/// Deletes `import ... from "<module>"` statements, trailing newline included.
#[derive(Debug)]
pub struct ImportRule {
    pattern: Regex,
}

impl ImportRule {
    pub fn new(module: &str) -> Result<Self, regex::Error> {
        const NAMED: &str = r"(?:\{[^}]*\}|\*\s*as\s+[\w$]+)";
        let pattern = format!(
            r#"(?m)^[ \t]*import\s*(?:type\s+)?(?:{named}|[\w$]+(?:\s*,\s*{named})?)\s*from\s*["']{module}(?:/[^"'\r\n]*)?["'][ \t]*;?[ \t]*(?:\r?\n)?"#,
            named = NAMED,
            module = regex::escape(module),
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }
}

impl Rule for ImportRule {
    fn name(&self) -> &'static str {
        "import"
    }

    fn apply<'a>(&self, text: &'a str, _matcher: &dyn TagMatcher) -> Cow<'a, str> {
        self.pattern.replace_all(text, "")
    }
}

/* ============================ Tag synthesis ============================= */

/// `<name className=...>`, `<name>` or the self-closing forms.
fn plain_open(name: &str, style_class: Option<&str>, kind: TagKind) -> String {
    let mut out = format!("<{name}");
    if let Some(class) = style_class {
        out.push_str(" className=");
        out.push_str(class);
    }
    out.push_str(if kind == TagKind::SelfClosing { " />" } else { ">" });
    out
}

/// Whether the closing tag of an animated heading reuses its opening level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeadingClose {
    /// Close with the level of the matching opening tag.
    #[default]
    Matched,
    /// Always close with the default level, like the legacy tool did.
    Legacy,
}

#[derive(Debug)]
pub struct HeadingRule {
    pub close: HeadingClose,
}

impl TagRule for HeadingRule {
    fn name(&self) -> &'static str {
        "heading"
    }

    fn rewrite(&self, tag: &Tag<'_>, state: &mut PassState) -> Option<String> {
        if tag.name != "AnimatedHeading" {
            return None;
        }
        if tag.kind == TagKind::End {
            let level = match self.close {
                HeadingClose::Matched => state.open_headings.pop(),
                HeadingClose::Legacy => None,
            };
            let level = level.as_deref().unwrap_or(DEFAULT_HEADING_LEVEL);
            return Some(format!("</h{level}>"));
        }

        let extracted = attrs::extract(tag);
        let level = extracted.heading_level.unwrap_or(DEFAULT_HEADING_LEVEL);
        if tag.kind == TagKind::Start {
            state.open_headings.push(level.to_owned());
        }
        Some(plain_open(&format!("h{level}"), extracted.style_class, tag.kind))
    }
}

/// One animated component to one plain element, keeping only `className`.
#[derive(Debug)]
pub struct RenameRule {
    pub rule: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

pub const PARAGRAPH: RenameRule = RenameRule {
    rule: "paragraph",
    from: "AnimatedParagraph",
    to: "p",
};

pub const TEXT_BLOCK: RenameRule = RenameRule {
    rule: "text",
    from: "AnimatedText",
    to: "div",
};

impl TagRule for RenameRule {
    fn name(&self) -> &'static str {
        self.rule
    }

    fn rewrite(&self, tag: &Tag<'_>, _state: &mut PassState) -> Option<String> {
        if tag.name != self.from {
            return None;
        }
        Some(match tag.kind {
            TagKind::End => format!("</{}>", self.to),
            kind => plain_open(self.to, attrs::style_class(tag), kind),
        })
    }
}

/// The animated button family.
pub const BUTTONS: [&str; 4] = [
    "AnimatedButton",
    "AnimatedPrimaryButton",
    "AnimatedOutlineButton",
    "AnimatedGhostButton",
];

/// Collapses the button family into `button`, attributes untouched.
#[derive(Debug)]
pub struct ButtonRule;

impl TagRule for ButtonRule {
    fn name(&self) -> &'static str {
        "button"
    }

    fn rewrite(&self, tag: &Tag<'_>, _state: &mut PassState) -> Option<String> {
        if !BUTTONS.contains(&tag.name) {
            return None;
        }
        Some(match tag.kind {
            TagKind::End => "</button>".to_owned(),
            _ => format!(
                "{}button{}",
                &tag.raw[..tag.name_span.start],
                &tag.raw[tag.name_span.end..]
            ),
        })
    }
}

/* ========================== Attribute stripping ========================= */

#[derive(Clone, Copy, Debug)]
enum ValueForm {
    String,
    Numeric,
}

const ANIMATION_ATTRS: [(&str, ValueForm); 4] = [
    ("animationType", ValueForm::String),
    ("delay", ValueForm::Numeric),
    ("variant", ValueForm::String),
    ("level", ValueForm::Numeric),
];

pub fn is_animation_only(attr: &Attr<'_>) -> bool {
    let Some(value) = attr.value else {
        return false;
    };
    ANIMATION_ATTRS.iter().any(|&(name, form)| {
        attr.name == name
            && match form {
                ValueForm::String => string_literal(value).is_some(),
                ValueForm::Numeric => numeric_literal(value).is_some(),
            }
    })
}

/// Deletes animation-only attributes from any opening tag.
#[derive(Debug)]
pub struct StripRule;

impl TagRule for StripRule {
    fn name(&self) -> &'static str {
        "strip"
    }

    fn rewrite(&self, tag: &Tag<'_>, _state: &mut PassState) -> Option<String> {
        if !tag.opens() || !tag.attrs.iter().any(is_animation_only) {
            return None;
        }
        let mut out = String::with_capacity(tag.raw.len());
        let mut copied = 0usize;
        for attr in tag.attrs.iter().filter(|a| is_animation_only(a)) {
            out.push_str(&tag.raw[copied..attr.span.start]);
            copied = attr.span.end;
        }
        out.push_str(&tag.raw[copied..]);
        Some(out)
    }
}

/* ========================== Transition injection ======================== */

/// Any `transition` token on the tag itself. Expression values other than
/// `className` are skipped; they may hold whole nested elements.
fn has_transition(tag: &Tag<'_>) -> bool {
    tag.attrs.iter().any(|a| match a.value {
        Some(AttrValue::Expr(_)) if a.name != "className" => false,
        _ => tag.raw[a.span.clone()].contains("transition"),
    })
}

/// Adds [`TRANSITION_CLASS`] to buttons without any transition token.
#[derive(Debug)]
pub struct TransitionRule;

impl TagRule for TransitionRule {
    fn name(&self) -> &'static str {
        "transition"
    }

    fn rewrite(&self, tag: &Tag<'_>, _state: &mut PassState) -> Option<String> {
        if tag.name != "button" || !tag.opens() || has_transition(tag) {
            return None;
        }
        let raw = tag.raw;
        match tag.attr("className") {
            Some(class) => {
                let value = class.value?;
                if string_literal(value).is_none() {
                    debug!(tag = raw, "className is an expression, not injecting transition");
                    return None;
                }
                // just past the opening quote
                let at = class.value_offset()? + 1;
                let sep = if value.raw().len() == 2 { "" } else { " " };
                Some(format!("{}{TRANSITION_CLASS}{sep}{}", &raw[..at], &raw[at..]))
            }
            None => {
                let at = tag.attrs_end;
                Some(format!(
                    "{} className=\"{TRANSITION_CLASS}\"{}",
                    &raw[..at],
                    &raw[at..]
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::JsxScanner;

    fn run(rule: &dyn Rule, text: &str) -> String {
        rule.apply(text, &JsxScanner).into_owned()
    }

    #[test]
    fn test_import_named() {
        let rule = ImportRule::new("@/components/animations").unwrap();
        let text = "import React from \"react\";\nimport { AnimatedHeading, AnimatedText } from \"@/components/animations/text\";\nexport {}\n";
        assert_eq!(
            run(&rule, text),
            "import React from \"react\";\nexport {}\n"
        );
    }

    #[test]
    fn test_import_multiline_and_forms() {
        let rule = ImportRule::new("@/components/animations").unwrap();
        let text = concat!(
            "import {\n  AnimatedButton,\n  AnimatedPrimaryButton,\n} from '@/components/animations/buttons'\n",
            "import Fade from \"@/components/animations\";\n",
            "import * as anim from \"@/components/animations/index\";\r\n",
            "import type { Kind } from \"@/components/animations/types\";\n",
            "import \"@/components/animations/styles.css\";\n",
            "import { Other } from \"@/components/animationsExtra\";\n",
        );
        assert_eq!(
            run(&rule, text),
            "import \"@/components/animations/styles.css\";\nimport { Other } from \"@/components/animationsExtra\";\n"
        );
    }

    #[test]
    fn test_import_untouched_is_borrowed() {
        let rule = ImportRule::new("@/components/animations").unwrap();
        let text = "import { x } from \"./x\";\n";
        assert!(matches!(rule.apply(text, &JsxScanner), Cow::Borrowed(_)));
    }

    #[test]
    fn test_heading_levels() {
        let rule = TagPass(HeadingRule {
            close: HeadingClose::Matched,
        });
        assert_eq!(
            run(&rule, r#"<AnimatedHeading level={3} className="title">Hi</AnimatedHeading>"#),
            r#"<h3 className="title">Hi</h3>"#
        );
        assert_eq!(
            run(&rule, "<AnimatedHeading delay={100}>Hi</AnimatedHeading>"),
            "<h2>Hi</h2>"
        );
    }

    #[test]
    fn test_heading_nested_levels_match() {
        let rule = TagPass(HeadingRule {
            close: HeadingClose::Matched,
        });
        let text = "<AnimatedHeading level={1}>A<AnimatedHeading level={4}>B</AnimatedHeading></AnimatedHeading><AnimatedHeading>C</AnimatedHeading>";
        assert_eq!(run(&rule, text), "<h1>A<h4>B</h4></h1><h2>C</h2>");
    }

    #[test]
    fn test_heading_legacy_close() {
        let rule = TagPass(HeadingRule {
            close: HeadingClose::Legacy,
        });
        assert_eq!(
            run(&rule, "<AnimatedHeading level={3}>Hi</AnimatedHeading>"),
            "<h3>Hi</h2>"
        );
    }

    #[test]
    fn test_heading_unmatched_close_uses_default() {
        let rule = TagPass(HeadingRule {
            close: HeadingClose::Matched,
        });
        assert_eq!(run(&rule, "</AnimatedHeading>"), "</h2>");
    }

    #[test]
    fn test_paragraph_and_text() {
        assert_eq!(
            run(&TagPass(PARAGRAPH), "<AnimatedParagraph>Text</AnimatedParagraph>"),
            "<p>Text</p>"
        );
        assert_eq!(
            run(
                &TagPass(TEXT_BLOCK),
                "<AnimatedText delay={2} className=\"lead\">T</AnimatedText><AnimatedText />"
            ),
            "<div className=\"lead\">T</div><div />"
        );
    }

    #[test]
    fn test_button_family_keeps_attributes() {
        let rule = TagPass(ButtonRule);
        assert_eq!(
            run(&rule, "<AnimatedPrimaryButton onClick={go}>Go</AnimatedPrimaryButton>"),
            "<button onClick={go}>Go</button>"
        );
        assert_eq!(
            run(
                &rule,
                "<AnimatedGhostButton\n  variant=\"ghost\"\n  disabled\n>x</AnimatedGhostButton >"
            ),
            "<button\n  variant=\"ghost\"\n  disabled\n>x</button>"
        );
        assert_eq!(run(&rule, "<AnimatedButtonGroup>"), "<AnimatedButtonGroup>");
    }

    #[test]
    fn test_strip_attributes() {
        let rule = TagPass(StripRule);
        assert_eq!(
            run(
                &rule,
                r#"<div animationType="fade" delay={200} variant="outline">x</div>"#
            ),
            "<div>x</div>"
        );
        assert_eq!(
            run(&rule, r#"<div className="a" delay={1} id="b" level={2} />"#),
            r#"<div className="a" id="b" />"#
        );
        assert_eq!(
            run(&rule, "<Badge variant={kind} delay={ms}>"),
            "<Badge variant={kind} delay={ms}>"
        );
    }

    #[test]
    fn test_transition_injection() {
        let rule = TagPass(TransitionRule);
        assert_eq!(
            run(&rule, "<button onClick={go}>Go</button>"),
            r#"<button onClick={go} className="transition-colors">Go</button>"#
        );
        assert_eq!(
            run(&rule, r#"<button className="px-4">"#),
            r#"<button className="transition-colors px-4">"#
        );
        assert_eq!(
            run(&rule, r#"<button className="">"#),
            r#"<button className="transition-colors">"#
        );
        assert_eq!(
            run(&rule, r#"<button className="transition-all">"#),
            r#"<button className="transition-all">"#
        );
        assert_eq!(
            run(&rule, "<button className={cn(a)}>"),
            "<button className={cn(a)}>"
        );
        assert_eq!(
            run(&rule, "<button type=\"reset\" />"),
            "<button type=\"reset\" className=\"transition-colors\" />"
        );
    }

    #[test]
    fn test_nested_tags_in_attribute_values() {
        assert_eq!(
            run(
                &TagPass(TEXT_BLOCK),
                "<Suspense fallback={<AnimatedText className=\"s\">...</AnimatedText>}>x</Suspense>"
            ),
            "<Suspense fallback={<div className=\"s\">...</div>}>x</Suspense>"
        );
        assert_eq!(
            run(
                &TagPass(StripRule),
                "<Tip content={<Card body={<b delay={1}>x</b>} />} delay={2}>"
            ),
            "<Tip content={<Card body={<b>x</b>} />}>"
        );
    }

    #[test]
    fn test_nested_heading_levels_stay_paired() {
        let rule = TagPass(HeadingRule {
            close: HeadingClose::Matched,
        });
        let text = concat!(
            "<AnimatedHeading level={1} className={x}>A",
            "<Tip c={<AnimatedHeading level={5}>B</AnimatedHeading>} />",
            "</AnimatedHeading>",
        );
        assert_eq!(run(&rule, text), "<h1 className={x}>A<Tip c={<h5>B</h5>} /></h1>");
    }

    #[test]
    fn test_nested_button_transition_is_per_tag() {
        let rule = TagPass(TransitionRule);
        assert_eq!(
            run(&rule, "<button icon={<button />}>"),
            r#"<button icon={<button className="transition-colors" />} className="transition-colors">"#
        );
    }
}
