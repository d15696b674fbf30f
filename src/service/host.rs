use crate::error::ServiceResult;
use crate::types::*;

/// The general-purpose document analysis service.
///
/// Every operation is keyed by document name and global byte offset. Defaults
/// return "no result" so that simple services only implement what they support.
/// The decorated service implements every method, so callers cannot tell it
/// apart from a plain host.
pub trait LanguageService: Send + Sync {
    fn get_completions_at_position(
        &self,
        _file_name: &str,
        _position: usize,
        _options: &CompletionOptions,
    ) -> ServiceResult<Option<CompletionInfo>> {
        Ok(None)
    }

    fn get_completion_entry_details(
        &self,
        _file_name: &str,
        _position: usize,
        _entry_name: &str,
        _source: Option<&str>,
    ) -> ServiceResult<Option<CompletionEntryDetails>> {
        Ok(None)
    }

    fn get_quick_info_at_position(
        &self,
        _file_name: &str,
        _position: usize,
    ) -> ServiceResult<Option<QuickInfo>> {
        Ok(None)
    }

    fn get_definition_at_position(
        &self,
        _file_name: &str,
        _position: usize,
    ) -> ServiceResult<Option<Vec<DefinitionInfo>>> {
        Ok(None)
    }

    fn get_definition_and_bound_span(
        &self,
        _file_name: &str,
        _position: usize,
    ) -> ServiceResult<Option<DefinitionInfoAndBoundSpan>> {
        Ok(None)
    }

    fn get_semantic_diagnostics(&self, _file_name: &str) -> ServiceResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    fn get_syntactic_diagnostics(&self, _file_name: &str) -> ServiceResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    fn get_formatting_edits_for_range(
        &self,
        _file_name: &str,
        _start: usize,
        _end: usize,
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<TextChange>> {
        Ok(Vec::new())
    }

    fn get_code_fixes_at_position(
        &self,
        _file_name: &str,
        _start: usize,
        _end: usize,
        _error_codes: &[u32],
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<CodeFixAction>> {
        Ok(Vec::new())
    }

    /// Error codes this service can produce fixes for.
    fn get_supported_code_fixes(&self) -> Vec<String> {
        Vec::new()
    }

    fn get_signature_help_items(
        &self,
        _file_name: &str,
        _position: usize,
        _options: &SignatureHelpOptions,
    ) -> ServiceResult<Option<SignatureHelpItems>> {
        Ok(None)
    }

    fn get_outlining_spans(&self, _file_name: &str) -> ServiceResult<Vec<OutliningSpan>> {
        Ok(Vec::new())
    }

    fn get_references_at_position(
        &self,
        _file_name: &str,
        _position: usize,
    ) -> ServiceResult<Option<Vec<ReferenceEntry>>> {
        Ok(None)
    }

    fn get_jsx_closing_tag_at_position(
        &self,
        _file_name: &str,
        _position: usize,
    ) -> ServiceResult<Option<JsxClosingTagInfo>> {
        Ok(None)
    }

    /// Spans of the bracket pair around `position`.
    fn get_brace_matching_position(
        &self,
        _file_name: &str,
        _position: usize,
    ) -> ServiceResult<Vec<TextSpan>> {
        Ok(Vec::new())
    }

    /// Indentation (in columns) a new line at `position` should get.
    fn get_indentation_at_position(
        &self,
        _file_name: &str,
        _position: usize,
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<usize> {
        Ok(0)
    }
}
