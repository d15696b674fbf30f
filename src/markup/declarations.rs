//! Names a template can bind to.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::lexical::{is_inside, scan_lexical};
use crate::document::Document;
use crate::types::{ElementKind, TextSpan};

/// `const x`, `let x`, `var x`, `function x`, `class X`.
static DECLARATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(const|let|var|function|class)\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap()
});

/// Parameter list of a function declaration or an arrow function.
static PARAMETERS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfunction\s*[A-Za-z_$]*[A-Za-z0-9_$]*\s*\(([^()]*)\)|\(([^()]*)\)\s*=>|\b([A-Za-z_$][A-Za-z0-9_$]*)\s*=>")
        .unwrap()
});

static PARAMETER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\.\.\.)?([A-Za-z_$][A-Za-z0-9_$]*)").unwrap());

/// A named declaration in a host document. Spans are global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// `const`, `function`, `parameter`...
    pub keyword: String,
    pub kind: ElementKind,
    pub span: TextSpan,
    /// From the keyword to the end of the name.
    pub context_span: TextSpan,
}

impl Declaration {
    pub fn display(&self) -> String {
        format!("{} {}", self.keyword, self.name)
    }
}

/// Source of the declarations visible to templates in a document.
pub trait DeclarationIndex: Send + Sync {
    /// All declarations of the document, ascending by position.
    fn declarations(&self, document: &Document) -> Vec<Declaration>;

    /// Declarations with exactly this name.
    fn resolve(&self, document: &Document, name: &str) -> Vec<Declaration> {
        self.declarations(document)
            .into_iter()
            .filter(|d| d.name == name)
            .collect()
    }
}

/// Declarations found by pattern over script source.
///
/// Comments and literals are skipped, so a declaration that only appears in a
/// template or a string does not count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDeclarations;

impl DeclarationIndex for ScriptDeclarations {
    fn declarations(&self, document: &Document) -> Vec<Declaration> {
        let source = document.text();
        let lexical = scan_lexical(source);
        let mut declarations = Vec::new();

        for caps in DECLARATION_PATTERN.captures_iter(source) {
            let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if is_inside(keyword.start(), &lexical) {
                continue;
            }
            let kind = match keyword.as_str() {
                "function" => ElementKind::Function,
                "class" => ElementKind::Class,
                _ => ElementKind::Variable,
            };
            declarations.push(Declaration {
                name: name.as_str().to_string(),
                keyword: keyword.as_str().to_string(),
                kind,
                span: TextSpan::from_bounds(name.start(), name.end()),
                context_span: TextSpan::from_bounds(keyword.start(), name.end()),
            });
        }

        for caps in PARAMETERS_PATTERN.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if is_inside(whole.start(), &lexical) {
                continue;
            }
            if let Some(single) = caps.get(3) {
                declarations.push(parameter(single.as_str(), single.start()));
                continue;
            }
            let Some(list) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            let mut offset = list.start();
            for piece in list.as_str().split(',') {
                if let Some(name) = PARAMETER_NAME.captures(piece).and_then(|c| c.get(1)) {
                    declarations.push(parameter(name.as_str(), offset + name.start()));
                }
                offset += piece.len() + 1;
            }
        }

        declarations.sort_by_key(|d| d.span.start);
        declarations
    }
}

fn parameter(name: &str, start: usize) -> Declaration {
    let span = TextSpan::new(start, name.len());
    Declaration {
        name: name.to_string(),
        keyword: "parameter".to_string(),
        kind: ElementKind::Variable,
        span,
        context_span: span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations(source: &str) -> Vec<(String, String)> {
        let document = Document::new("file:///a.ts", source.to_string(), 1);
        ScriptDeclarations
            .declarations(&document)
            .into_iter()
            .map(|d| (d.keyword, d.name))
            .collect()
    }

    fn pair(keyword: &str, name: &str) -> (String, String) {
        (keyword.to_string(), name.to_string())
    }

    #[test]
    fn finds_top_level_declarations() {
        let found = declarations("const count = 0;\nlet label = 'x';\nfunction save() {}\nclass UserCard {}");
        assert_eq!(
            found,
            vec![
                pair("const", "count"),
                pair("let", "label"),
                pair("function", "save"),
                pair("class", "UserCard"),
            ]
        );
    }

    #[test]
    fn finds_parameters() {
        let found = declarations("function render(items, ...rest) {}\nconst f = (a, b = 1) => a;\nlist.map(item => item);");
        let names: Vec<&str> = found.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["render", "items", "rest", "f", "a", "b", "item"]);
    }

    #[test]
    fn skips_comments_and_literals() {
        let found = declarations("// const hidden = 1;\nconst s = 'let fake = 2';\nconst t = html`<p>const no</p>`;");
        assert_eq!(found, vec![pair("const", "s"), pair("const", "t")]);
    }

    #[test]
    fn spans_point_at_the_name() {
        let document = Document::new("file:///a.ts", "  const total = 1;".to_string(), 1);
        let found = ScriptDeclarations.declarations(&document);
        assert_eq!(found[0].span, TextSpan::new(8, 5));
        assert_eq!(found[0].context_span, TextSpan::new(2, 11));
        assert_eq!(found[0].display(), "const total");
    }

    #[test]
    fn resolve_by_name() {
        let document = Document::new("file:///a.ts", "let a = 1; let b = 2;".to_string(), 1);
        let resolved = ScriptDeclarations.resolve(&document, "b");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].span.start, 15);
    }
}
