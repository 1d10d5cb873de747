//! Ordered application of the rule catalog to one document.

use std::borrow::Cow;

use thiserror::Error;
use tracing::trace;

use crate::rules::{
    ButtonRule, HeadingClose, HeadingRule, ImportRule, Rule, StripRule, TagPass, TransitionRule,
    PARAGRAPH, TEXT_BLOCK,
};
use crate::scan::{JsxScanner, TagMatcher};

/// Module path the animated components are imported from.
pub const DEFAULT_MODULE: &str = "@/components/animations";

#[derive(Clone, Debug)]
pub struct Options {
    /// Imports from this path, or any sub-path of it, are removed.
    pub module: String,
    /// Give plain buttons a default transition class.
    pub inject_transition: bool,
    pub heading_close: HeadingClose,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            module: DEFAULT_MODULE.to_owned(),
            inject_transition: true,
            heading_close: HeadingClose::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("animation module path is empty")]
    EmptyModule,

    #[error("invalid animation module path `{module}`")]
    ModulePattern {
        module: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformResult {
    pub text: String,
    /// `text != input`, whatever rules fired.
    pub changed: bool,
}

pub struct Pipeline {
    rules: Vec<Box<dyn Rule>>,
    matcher: Box<dyn TagMatcher>,
}

impl Pipeline {
    pub fn new(options: &Options) -> Result<Self, PipelineError> {
        Ok(Self {
            rules: catalog(options)?,
            matcher: Box::new(JsxScanner),
        })
    }

    /// Swap the tag matcher the tag rules run on.
    pub fn with_matcher(mut self, matcher: impl TagMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    pub fn transform(&self, input: &str) -> TransformResult {
        let mut text = Cow::Borrowed(input);
        for rule in &self.rules {
            let rewritten = match rule.apply(&text, &*self.matcher) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = rewritten {
                trace!(rule = rule.name(), "rule rewrote document");
                text = Cow::Owned(s);
            }
        }
        let changed = text != input;
        TransformResult {
            text: text.into_owned(),
            changed,
        }
    }
}

/// Rules in evaluation order. Structural rewrites come before attribute
/// stripping so `level` is read before it is removed; transition injection
/// comes last so it sees the collapsed buttons.
fn catalog(options: &Options) -> Result<Vec<Box<dyn Rule>>, PipelineError> {
    if options.module.is_empty() {
        return Err(PipelineError::EmptyModule);
    }
    let imports = ImportRule::new(&options.module).map_err(|source| PipelineError::ModulePattern {
        module: options.module.clone(),
        source,
    })?;

    let mut rules: Vec<Box<dyn Rule>> = vec![
        Box::new(imports),
        Box::new(TagPass(HeadingRule {
            close: options.heading_close,
        })),
        Box::new(TagPass(PARAGRAPH)),
        Box::new(TagPass(TEXT_BLOCK)),
        Box::new(TagPass(ButtonRule)),
        Box::new(TagPass(StripRule)),
    ];
    if options.inject_transition {
        rules.push(Box::new(TagPass(TransitionRule)));
    }
    Ok(rules)
}
