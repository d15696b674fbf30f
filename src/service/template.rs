use crate::decorator::Operation;
use crate::document::Template;
use crate::error::ServiceResult;
use crate::types::*;

/// Which hooks a template-aware service implements.
///
/// Read once when the decorated service is built; an operation whose hook is
/// absent is never wrapped and always goes straight to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub get_completions_at_position: bool,
    pub get_completion_entry_details: bool,
    pub get_quick_info_at_position: bool,
    pub get_definition_at_position: bool,
    pub get_definition_and_bound_span: bool,
    pub get_semantic_diagnostics: bool,
    pub get_syntactic_diagnostics: bool,
    pub get_formatting_edits_for_range: bool,
    pub get_code_fixes_at_position: bool,
    pub get_supported_code_fixes: bool,
    pub get_signature_help_items: bool,
    pub get_outlining_spans: bool,
    pub find_references: bool,
    pub get_jsx_closing_tag_at_position: bool,
}

impl Capabilities {
    /// Every hook present.
    pub fn all() -> Self {
        Self {
            get_completions_at_position: true,
            get_completion_entry_details: true,
            get_quick_info_at_position: true,
            get_definition_at_position: true,
            get_definition_and_bound_span: true,
            get_semantic_diagnostics: true,
            get_syntactic_diagnostics: true,
            get_formatting_edits_for_range: true,
            get_code_fixes_at_position: true,
            get_supported_code_fixes: true,
            get_signature_help_items: true,
            get_outlining_spans: true,
            find_references: true,
            get_jsx_closing_tag_at_position: true,
        }
    }

    /// Whether the hook backing `operation` is present.
    pub fn has(&self, operation: Operation) -> bool {
        match operation {
            Operation::GetCompletionsAtPosition => self.get_completions_at_position,
            Operation::GetCompletionEntryDetails => self.get_completion_entry_details,
            Operation::GetQuickInfoAtPosition => self.get_quick_info_at_position,
            Operation::GetDefinitionAtPosition => self.get_definition_at_position,
            Operation::GetDefinitionAndBoundSpan => self.get_definition_and_bound_span,
            Operation::GetSemanticDiagnostics => self.get_semantic_diagnostics,
            Operation::GetSyntacticDiagnostics => self.get_syntactic_diagnostics,
            Operation::GetFormattingEditsForRange => self.get_formatting_edits_for_range,
            Operation::GetCodeFixesAtPosition => self.get_code_fixes_at_position,
            Operation::GetSupportedCodeFixes => self.get_supported_code_fixes,
            Operation::GetSignatureHelpItems => self.get_signature_help_items,
            Operation::GetOutliningSpans => self.get_outlining_spans,
            Operation::GetReferencesAtPosition => self.find_references,
            Operation::GetJsxClosingTagAtPosition => self.get_jsx_closing_tag_at_position,
        }
    }
}

/// Analysis service for the inside of template regions.
///
/// Same vocabulary as [`LanguageService`](super::LanguageService), but keyed by
/// a [`Template`] and an offset local to it. Every position in a returned
/// payload is local as well; the decorated service converts them back.
pub trait TemplateLanguageService: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    fn get_completions_at_position(
        &self,
        _template: &Template,
        _position: usize,
        _options: &CompletionOptions,
    ) -> ServiceResult<Option<CompletionInfo>> {
        Ok(None)
    }

    fn get_completion_entry_details(
        &self,
        _template: &Template,
        _position: usize,
        _entry_name: &str,
        _source: Option<&str>,
    ) -> ServiceResult<Option<CompletionEntryDetails>> {
        Ok(None)
    }

    fn get_quick_info_at_position(
        &self,
        _template: &Template,
        _position: usize,
    ) -> ServiceResult<Option<QuickInfo>> {
        Ok(None)
    }

    fn get_definition_at_position(
        &self,
        _template: &Template,
        _position: usize,
    ) -> ServiceResult<Option<Vec<DefinitionInfo>>> {
        Ok(None)
    }

    fn get_definition_and_bound_span(
        &self,
        _template: &Template,
        _position: usize,
    ) -> ServiceResult<Option<DefinitionInfoAndBoundSpan>> {
        Ok(None)
    }

    fn get_semantic_diagnostics(&self, _template: &Template) -> ServiceResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    fn get_syntactic_diagnostics(&self, _template: &Template) -> ServiceResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    /// `start..end` is the requested range clamped to the template, in local
    /// offsets.
    fn get_formatting_edits_for_range(
        &self,
        _template: &Template,
        _start: usize,
        _end: usize,
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<TextChange>> {
        Ok(Vec::new())
    }

    fn get_code_fixes_at_position(
        &self,
        _template: &Template,
        _start: usize,
        _end: usize,
        _error_codes: &[u32],
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<CodeFixAction>> {
        Ok(Vec::new())
    }

    fn get_supported_code_fixes(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_signature_help_items(
        &self,
        _template: &Template,
        _position: usize,
        _options: &SignatureHelpOptions,
    ) -> ServiceResult<Option<SignatureHelpItems>> {
        Ok(None)
    }

    fn get_outlining_spans(&self, _template: &Template) -> ServiceResult<Vec<OutliningSpan>> {
        Ok(Vec::new())
    }

    /// Backs the composite `get_references_at_position`.
    fn find_references(
        &self,
        _template: &Template,
        _position: usize,
    ) -> ServiceResult<Option<Vec<ReferenceEntry>>> {
        Ok(None)
    }

    fn get_jsx_closing_tag_at_position(
        &self,
        _template: &Template,
        _position: usize,
    ) -> ServiceResult<Option<JsxClosingTagInfo>> {
        Ok(None)
    }
}
