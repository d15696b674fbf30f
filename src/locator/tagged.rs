//! Tagged template literal locator.
//!
//! Recognizes template bodies written as tagged template literals in script
//! documents, such as
//!
//! ```text
//! const view = html`<button @click="save">{{ label }}</button>`;
//! ```
//!
//! The template covers the literal body between the backticks. Literals inside
//! comments, strings or other literals are never templates.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::document::lexical::{scan_lexical, LexicalKind};
use crate::document::{Document, Template};

use super::TemplateLocator;

/// How far back to look for the binding that receives a template.
const CONTEXT_WINDOW: usize = 160;

/// `const view = ` / `let view: T = ` / `view: ` / `view = ` right before the tag.
static ASSIGNMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=;{}]*)?=|\b([A-Za-z_$][\w$]*)\s*[:=])\s*$",
    )
    .unwrap()
});

/// Enclosing `function name` or `class Name` declarations.
static ENCLOSING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:function|class)\s+([A-Za-z_$][\w$]*)").unwrap());

/// Locates templates introduced by one of a set of tag names.
#[derive(Debug, Clone)]
pub struct TaggedTemplateLocator {
    tags: Vec<String>,
}

impl TaggedTemplateLocator {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// The recognized tag directly before a literal opening at `literal_start`,
    /// with the offset where the tag begins.
    fn tag_before<'a>(&self, source: &'a str, literal_start: usize) -> Option<(&'a str, usize)> {
        let before = source[..literal_start].trim_end();
        let tag_len = before
            .bytes()
            .rev()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'$')
            .count();
        let tag_start = before.len() - tag_len;
        let tag = &before[tag_start..];

        self.tags
            .iter()
            .any(|t| t == tag)
            .then_some((tag, tag_start))
    }
}

impl Default for TaggedTemplateLocator {
    fn default() -> Self {
        Self::new(["html"])
    }
}

impl TemplateLocator for TaggedTemplateLocator {
    fn find_all_templates(&self, document: &Arc<Document>) -> Arc<[Template]> {
        let source = document.text();

        scan_lexical(source)
            .into_iter()
            .filter(|r| r.kind == LexicalKind::Template && r.terminated)
            .filter_map(|r| {
                let (tag, tag_start) = self.tag_before(source, r.range.start)?;
                let template = Template::new(
                    Arc::clone(document),
                    r.range.start + 1,
                    r.range.end - 1,
                    tag,
                );
                Some(template.with_context(declaration_context(source, tag_start)))
            })
            .collect()
    }
}

/// Name of the declaration a template belongs to.
///
/// Prefers the binding the tagged literal is assigned to, falling back to the
/// innermost preceding `function` or `class` declaration. This is a heuristic
/// over the raw text, not a parse.
fn declaration_context(source: &str, tag_start: usize) -> Option<String> {
    let mut window_start = tag_start.saturating_sub(CONTEXT_WINDOW);
    while !source.is_char_boundary(window_start) {
        window_start += 1;
    }

    if let Some(caps) = ASSIGNMENT_PATTERN.captures(&source[window_start..tag_start]) {
        if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
            return Some(name.as_str().to_string());
        }
    }

    ENCLOSING_PATTERN
        .captures_iter(&source[..tag_start])
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
