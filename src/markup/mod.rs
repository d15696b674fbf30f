//! Template-aware service for HTML-like markup templates.
//!
//! Understands elements, plain attributes, `:prop` bindings, `@event.modifier`
//! listeners and `{{ }}` interpolations. Names used in expressions resolve
//! against the declarations of the host document plus configured globals.

pub mod builtins;
mod completion;
pub mod declarations;
mod diagnostics;
mod layout;
mod navigation;
pub mod parts;

use std::collections::HashSet;
use std::sync::Arc;

use crate::document::{Document, Template};
use crate::error::ServiceResult;
use crate::service::{Capabilities, TemplateLanguageService};
use crate::types::*;

pub use declarations::{Declaration, DeclarationIndex, ScriptDeclarations};
pub use diagnostics::codes;
pub use parts::Markup;

/// A name an expression can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Declared(Declaration),
    Global(String),
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::Declared(declaration) => &declaration.name,
            Binding::Global(name) => name,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Binding::Declared(declaration) => declaration.kind,
            Binding::Global(_) => ElementKind::Variable,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Binding::Declared(declaration) => declaration.display(),
            Binding::Global(name) => format!("(global) {name}"),
        }
    }

    pub fn documentation(&self, document: &Document) -> String {
        match self {
            Binding::Declared(declaration) => {
                let line = document.line_index().line_of(declaration.span.start) + 1;
                format!("Declared on line {line}.")
            }
            Binding::Global(_) => "Configured global.".to_string(),
        }
    }
}

/// The markup template service.
pub struct MarkupService {
    declarations: Arc<dyn DeclarationIndex>,
    globals: Vec<String>,
    report_unknown_events: bool,
}

impl MarkupService {
    pub fn new(declarations: Arc<dyn DeclarationIndex>) -> Self {
        Self {
            declarations,
            globals: Vec::new(),
            report_unknown_events: true,
        }
    }

    /// Names that resolve without a declaration, such as `window`.
    pub fn with_globals<I, S>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globals = globals.into_iter().map(Into::into).collect();
        self
    }

    /// Whether listeners for events outside the built-in set are reported.
    pub fn with_unknown_events(mut self, report: bool) -> Self {
        self.report_unknown_events = report;
        self
    }

    /// Every binding visible in the document: declarations first (one per
    /// name), then globals not shadowed by a declaration.
    pub fn bindings(&self, document: &Document) -> Vec<Binding> {
        let mut seen = HashSet::new();
        let declared = self
            .declarations
            .declarations(document)
            .into_iter()
            .filter(|d| seen.insert(d.name.clone()))
            .map(Binding::Declared)
            .collect::<Vec<_>>();
        let globals = self
            .globals
            .iter()
            .filter(|g| seen.insert((*g).clone()))
            .map(|g| Binding::Global(g.clone()))
            .collect::<Vec<_>>();
        declared.into_iter().chain(globals).collect()
    }

    pub fn resolve(&self, document: &Document, name: &str) -> Option<Binding> {
        if let Some(declaration) = self.declarations.resolve(document, name).into_iter().next() {
            return Some(Binding::Declared(declaration));
        }
        self.globals
            .iter()
            .any(|g| g == name)
            .then(|| Binding::Global(name.to_string()))
    }

    /// Class declarations usable as component tags.
    pub fn components(&self, document: &Document) -> Vec<Declaration> {
        self.declarations
            .declarations(document)
            .into_iter()
            .filter(|d| d.kind == ElementKind::Class)
            .collect()
    }

    fn declarations_named(&self, document: &Document, name: &str) -> Vec<Declaration> {
        self.declarations.resolve(document, name)
    }
}

impl TemplateLanguageService for MarkupService {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            get_signature_help_items: false,
            get_jsx_closing_tag_at_position: false,
            ..Capabilities::all()
        }
    }

    fn get_completions_at_position(
        &self,
        template: &Template,
        position: usize,
        _options: &CompletionOptions,
    ) -> ServiceResult<Option<CompletionInfo>> {
        let markup = Markup::parse(template.text());
        Ok(completion::completions(self, template, &markup, position))
    }

    fn get_completion_entry_details(
        &self,
        template: &Template,
        position: usize,
        entry_name: &str,
        _source: Option<&str>,
    ) -> ServiceResult<Option<CompletionEntryDetails>> {
        let markup = Markup::parse(template.text());
        Ok(completion::details(self, template, &markup, position, entry_name))
    }

    fn get_quick_info_at_position(
        &self,
        template: &Template,
        position: usize,
    ) -> ServiceResult<Option<QuickInfo>> {
        let markup = Markup::parse(template.text());
        Ok(navigation::quick_info(self, template, &markup, position))
    }

    fn get_definition_at_position(
        &self,
        template: &Template,
        position: usize,
    ) -> ServiceResult<Option<Vec<DefinitionInfo>>> {
        let markup = Markup::parse(template.text());
        Ok(navigation::definition(self, template, &markup, position).map(|(defs, _)| defs))
    }

    fn get_definition_and_bound_span(
        &self,
        template: &Template,
        position: usize,
    ) -> ServiceResult<Option<DefinitionInfoAndBoundSpan>> {
        let markup = Markup::parse(template.text());
        Ok(
            navigation::definition(self, template, &markup, position).map(|(defs, bound)| {
                DefinitionInfoAndBoundSpan {
                    definitions: Some(defs),
                    text_span: bound.into(),
                }
            }),
        )
    }

    fn get_semantic_diagnostics(&self, template: &Template) -> ServiceResult<Vec<Diagnostic>> {
        let markup = Markup::parse(template.text());
        Ok(diagnostics::semantic(self, template, &markup))
    }

    fn get_syntactic_diagnostics(&self, template: &Template) -> ServiceResult<Vec<Diagnostic>> {
        let markup = Markup::parse(template.text());
        Ok(diagnostics::syntactic(template, &markup))
    }

    fn get_formatting_edits_for_range(
        &self,
        template: &Template,
        start: usize,
        end: usize,
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<TextChange>> {
        Ok(layout::trailing_whitespace_edits(template.text(), start, end))
    }

    fn get_code_fixes_at_position(
        &self,
        template: &Template,
        start: usize,
        end: usize,
        error_codes: &[u32],
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<CodeFixAction>> {
        let markup = Markup::parse(template.text());
        Ok(diagnostics::code_fixes(template, &markup, start, end, error_codes))
    }

    fn get_supported_code_fixes(&self) -> Vec<String> {
        vec![codes::UNKNOWN_EVENT.to_string()]
    }

    fn get_outlining_spans(&self, template: &Template) -> ServiceResult<Vec<OutliningSpan>> {
        let markup = Markup::parse(template.text());
        Ok(layout::outlining_spans(template, &markup))
    }

    fn find_references(
        &self,
        template: &Template,
        position: usize,
    ) -> ServiceResult<Option<Vec<ReferenceEntry>>> {
        let markup = Markup::parse(template.text());
        Ok(navigation::references(template, &markup, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_leave_out_signature_help_and_closing_tags() {
        let service = MarkupService::new(Arc::new(ScriptDeclarations));
        let capabilities = service.capabilities();
        assert!(!capabilities.get_signature_help_items);
        assert!(!capabilities.get_jsx_closing_tag_at_position);
        assert!(capabilities.find_references);
        assert!(capabilities.get_code_fixes_at_position);
        assert_eq!(service.get_supported_code_fixes(), vec!["9001"]);
    }

    #[test]
    fn declarations_shadow_globals() {
        let document = Document::new(
            "file:///a.ts",
            "const window = 1; let count = 2;".to_string(),
            1,
        );
        let service =
            MarkupService::new(Arc::new(ScriptDeclarations)).with_globals(["window", "console"]);

        let bindings = service.bindings(&document);
        let names: Vec<&str> = bindings
            .iter()
            .map(|b| match b {
                Binding::Declared(d) => d.name.as_str(),
                Binding::Global(g) => g.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["window", "count", "console"]);
        assert!(matches!(
            service.resolve(&document, "console"),
            Some(Binding::Global(_))
        ));
        assert!(matches!(
            service.resolve(&document, "window"),
            Some(Binding::Declared(_))
        ));
        assert_eq!(service.resolve(&document, "missing"), None);
    }
}
