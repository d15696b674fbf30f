//! The decoration layer.
//!
//! [`DecoratedService`] wraps a host [`LanguageService`] so that requests
//! landing inside embedded templates are answered by a
//! [`TemplateLanguageService`]. Which operations get wrapped is decided once,
//! from the template service's [`Capabilities`](crate::service::Capabilities);
//! how each wrapped operation combines the two services is the fixed
//! [`Operation::policy`] table. Everything else goes straight to the host.

mod policy;
mod registry;
mod translate;

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::document::{DocumentStore, Template};
use crate::error::ServiceResult;
use crate::locator::TemplateLocator;
use crate::service::{LanguageService, TemplateLanguageService};
use crate::types::*;

pub use policy::{Operation, Policy, WrapperTable};
pub use registry::FixRegistry;
pub use translate::{Payload, Translate};

/// What a request addresses in global coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    At(usize),
    Document,
    Range(Range<usize>),
}

impl Request {
    /// Offset used to pick the single template a positional request falls in.
    fn anchor(&self) -> Option<usize> {
        match self {
            Request::At(offset) => Some(*offset),
            Request::Range(range) => Some(range.start),
            Request::Document => None,
        }
    }

    fn applies_to(&self, template: &Template) -> bool {
        match self {
            Request::Range(range) => template.intersect_with(range.start, range.end),
            Request::At(_) | Request::Document => true,
        }
    }

    fn localize(&self, template: &Template) -> LocalRequest {
        match self {
            Request::At(offset) => {
                let offset = template.global_to_local(*offset).unwrap_or(0);
                LocalRequest {
                    offset,
                    range: offset..offset,
                }
            }
            Request::Document => LocalRequest {
                offset: 0,
                range: 0..template.len(),
            },
            Request::Range(range) => {
                let range = template.local_range(range.start, range.end);
                LocalRequest {
                    offset: range.start,
                    range,
                }
            }
        }
    }
}

/// A request translated into one template's local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LocalRequest {
    offset: usize,
    range: Range<usize>,
}

/// A host service decorated with template-aware behavior.
///
/// Implements [`LanguageService`] itself, so it can stand in for the host
/// anywhere.
pub struct DecoratedService {
    host: Arc<dyn LanguageService>,
    templates: Arc<dyn TemplateLanguageService>,
    locator: Arc<dyn TemplateLocator>,
    documents: Arc<DocumentStore>,
    wrappers: WrapperTable,
    fixes: Arc<FixRegistry>,
}

impl DecoratedService {
    pub fn new(
        host: Arc<dyn LanguageService>,
        templates: Arc<dyn TemplateLanguageService>,
        locator: Arc<dyn TemplateLocator>,
        documents: Arc<DocumentStore>,
    ) -> Self {
        let wrappers = WrapperTable::from_capabilities(&templates.capabilities());
        for operation in wrappers.operations() {
            debug!(
                operation = operation.method_name(),
                hook = operation.hook_name(),
                policy = ?operation.policy(),
                "installed template wrapper"
            );
        }

        let mut sources = vec![host.get_supported_code_fixes()];
        if wrappers.is_installed(Operation::GetSupportedCodeFixes) {
            sources.push(templates.get_supported_code_fixes());
        }
        let fixes = Arc::new(FixRegistry::new(sources));
        debug!(codes = ?fixes.codes(), "fix registry built");

        Self {
            host,
            templates,
            locator,
            documents,
            wrappers,
            fixes,
        }
    }

    /// The shared registry of supported fix codes.
    pub fn fixes(&self) -> Arc<FixRegistry> {
        Arc::clone(&self.fixes)
    }

    fn dispatch<R, H, T>(
        &self,
        operation: Operation,
        file_name: &str,
        request: Request,
        host: H,
        mut handler: T,
    ) -> ServiceResult<R>
    where
        R: Payload,
        H: FnOnce() -> ServiceResult<R>,
        T: FnMut(&Template, LocalRequest) -> ServiceResult<R>,
    {
        let Some(policy) = self.wrappers.policy(operation) else {
            return host();
        };
        let Some(document) = self.documents.get(file_name) else {
            return host();
        };

        match policy {
            Policy::ReplaceIfApplicable => {
                let template = request
                    .anchor()
                    .and_then(|offset| self.locator.find_template_at(&document, offset));
                let Some(template) = template else {
                    return host();
                };
                trace!(
                    operation = operation.method_name(),
                    file = file_name,
                    template = template.start(),
                    "answering from template"
                );
                let mut result = handler(&template, request.localize(&template))?;
                result.to_global(&template);
                Ok(result)
            }
            Policy::MergeWholeDocument | Policy::MergeRangeFiltered => {
                let mut result = host()?;
                for template in self.locator.find_all_templates(&document).iter() {
                    if policy == Policy::MergeRangeFiltered && !request.applies_to(template) {
                        continue;
                    }
                    trace!(
                        operation = operation.method_name(),
                        file = file_name,
                        template = template.start(),
                        "merging template result"
                    );
                    let mut part = handler(template, request.localize(template))?;
                    part.to_global(template);
                    result.append(part);
                }
                Ok(result)
            }
            Policy::AugmentRegistry => host(),
        }
    }
}

impl LanguageService for DecoratedService {
    fn get_completions_at_position(
        &self,
        file_name: &str,
        position: usize,
        options: &CompletionOptions,
    ) -> ServiceResult<Option<CompletionInfo>> {
        self.dispatch(
            Operation::GetCompletionsAtPosition,
            file_name,
            Request::At(position),
            || self.host.get_completions_at_position(file_name, position, options),
            |template, local| {
                self.templates
                    .get_completions_at_position(template, local.offset, options)
            },
        )
    }

    fn get_completion_entry_details(
        &self,
        file_name: &str,
        position: usize,
        entry_name: &str,
        source: Option<&str>,
    ) -> ServiceResult<Option<CompletionEntryDetails>> {
        self.dispatch(
            Operation::GetCompletionEntryDetails,
            file_name,
            Request::At(position),
            || {
                self.host
                    .get_completion_entry_details(file_name, position, entry_name, source)
            },
            |template, local| {
                self.templates.get_completion_entry_details(
                    template,
                    local.offset,
                    entry_name,
                    source,
                )
            },
        )
    }

    fn get_quick_info_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<QuickInfo>> {
        self.dispatch(
            Operation::GetQuickInfoAtPosition,
            file_name,
            Request::At(position),
            || self.host.get_quick_info_at_position(file_name, position),
            |template, local| {
                self.templates
                    .get_quick_info_at_position(template, local.offset)
            },
        )
    }

    fn get_definition_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<Vec<DefinitionInfo>>> {
        self.dispatch(
            Operation::GetDefinitionAtPosition,
            file_name,
            Request::At(position),
            || self.host.get_definition_at_position(file_name, position),
            |template, local| {
                self.templates
                    .get_definition_at_position(template, local.offset)
            },
        )
    }

    fn get_definition_and_bound_span(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<DefinitionInfoAndBoundSpan>> {
        self.dispatch(
            Operation::GetDefinitionAndBoundSpan,
            file_name,
            Request::At(position),
            || self.host.get_definition_and_bound_span(file_name, position),
            |template, local| {
                self.templates
                    .get_definition_and_bound_span(template, local.offset)
            },
        )
    }

    fn get_semantic_diagnostics(&self, file_name: &str) -> ServiceResult<Vec<Diagnostic>> {
        self.dispatch(
            Operation::GetSemanticDiagnostics,
            file_name,
            Request::Document,
            || self.host.get_semantic_diagnostics(file_name),
            |template, _| self.templates.get_semantic_diagnostics(template),
        )
    }

    fn get_syntactic_diagnostics(&self, file_name: &str) -> ServiceResult<Vec<Diagnostic>> {
        self.dispatch(
            Operation::GetSyntacticDiagnostics,
            file_name,
            Request::Document,
            || self.host.get_syntactic_diagnostics(file_name),
            |template, _| self.templates.get_syntactic_diagnostics(template),
        )
    }

    fn get_formatting_edits_for_range(
        &self,
        file_name: &str,
        start: usize,
        end: usize,
        settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<TextChange>> {
        self.dispatch(
            Operation::GetFormattingEditsForRange,
            file_name,
            Request::Range(start..end),
            || {
                self.host
                    .get_formatting_edits_for_range(file_name, start, end, settings)
            },
            |template, local| {
                self.templates.get_formatting_edits_for_range(
                    template,
                    local.range.start,
                    local.range.end,
                    settings,
                )
            },
        )
    }

    fn get_code_fixes_at_position(
        &self,
        file_name: &str,
        start: usize,
        end: usize,
        error_codes: &[u32],
        settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<CodeFixAction>> {
        self.dispatch(
            Operation::GetCodeFixesAtPosition,
            file_name,
            Request::Range(start..end),
            || {
                self.host
                    .get_code_fixes_at_position(file_name, start, end, error_codes, settings)
            },
            |template, local| {
                self.templates.get_code_fixes_at_position(
                    template,
                    local.range.start,
                    local.range.end,
                    error_codes,
                    settings,
                )
            },
        )
    }

    fn get_supported_code_fixes(&self) -> Vec<String> {
        self.fixes.codes().to_vec()
    }

    fn get_signature_help_items(
        &self,
        file_name: &str,
        position: usize,
        options: &SignatureHelpOptions,
    ) -> ServiceResult<Option<SignatureHelpItems>> {
        self.dispatch(
            Operation::GetSignatureHelpItems,
            file_name,
            Request::At(position),
            || self.host.get_signature_help_items(file_name, position, options),
            |template, local| {
                self.templates
                    .get_signature_help_items(template, local.offset, options)
            },
        )
    }

    fn get_outlining_spans(&self, file_name: &str) -> ServiceResult<Vec<OutliningSpan>> {
        self.dispatch(
            Operation::GetOutliningSpans,
            file_name,
            Request::Document,
            || self.host.get_outlining_spans(file_name),
            |template, _| self.templates.get_outlining_spans(template),
        )
    }

    fn get_references_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<Vec<ReferenceEntry>>> {
        self.dispatch(
            Operation::GetReferencesAtPosition,
            file_name,
            Request::At(position),
            || self.host.get_references_at_position(file_name, position),
            |template, local| self.templates.find_references(template, local.offset),
        )
    }

    fn get_jsx_closing_tag_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<JsxClosingTagInfo>> {
        self.dispatch(
            Operation::GetJsxClosingTagAtPosition,
            file_name,
            Request::At(position),
            || self.host.get_jsx_closing_tag_at_position(file_name, position),
            |template, local| {
                self.templates
                    .get_jsx_closing_tag_at_position(template, local.offset)
            },
        )
    }

    fn get_brace_matching_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Vec<TextSpan>> {
        self.host.get_brace_matching_position(file_name, position)
    }

    fn get_indentation_at_position(
        &self,
        file_name: &str,
        position: usize,
        settings: &FormatCodeSettings,
    ) -> ServiceResult<usize> {
        self.host
            .get_indentation_at_position(file_name, position, settings)
    }
}
