//! Template-aware language server.
//!
//! Decorates a script language service so that positions inside embedded
//! templates (tagged template literals) are answered by a markup-aware service,
//! and exposes the composite service over LSP.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService};
use tracing::{debug, info, warn};

pub mod baseline;
pub mod decorator;
pub mod document;
pub mod error;
pub mod locator;
mod lsp;
pub mod markup;
pub mod service;
pub mod settings;
pub mod types;

pub use baseline::BaselineService;
pub use decorator::DecoratedService;
pub use document::{Document, DocumentStore, LineIndex, Template};
pub use error::{ServiceError, ServiceResult};
pub use locator::{CachedLocator, TaggedTemplateLocator, TemplateLocator};
pub use markup::MarkupService;
pub use service::{Capabilities, LanguageService, TemplateLanguageService};
pub use settings::{discover_settings, load_settings, Settings};

use markup::ScriptDeclarations;

/// Build the composite service for the given settings.
pub fn build_service(
    settings: &Settings,
    documents: Arc<DocumentStore>,
    locator: Arc<CachedLocator<TaggedTemplateLocator>>,
) -> DecoratedService {
    let host = Arc::new(BaselineService::new(Arc::clone(&documents)));
    let templates = Arc::new(
        MarkupService::new(Arc::new(ScriptDeclarations))
            .with_globals(settings.analysis.globals.iter().cloned())
            .with_unknown_events(settings.analysis.unknown_events),
    );
    DecoratedService::new(host, templates, locator, documents)
}

fn internal_error(err: ServiceError) -> Error {
    warn!(error = %err, "request failed");
    let mut error = Error::internal_error();
    error.message = err.to_string().into();
    error
}

pub struct Backend {
    client: Client,
    documents: Arc<DocumentStore>,
    workspace_root: OnceLock<PathBuf>,
    locator: OnceLock<Arc<CachedLocator<TaggedTemplateLocator>>>,
    service: OnceLock<DecoratedService>,
}

impl Backend {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            workspace_root: OnceLock::new(),
            locator: OnceLock::new(),
            service: OnceLock::new(),
        }
    }

    /// Store the document and publish diagnostics.
    async fn on_document_change(&self, uri: Url, text: String, version: i32) {
        self.documents.open(uri.as_str(), text, version);
        self.publish_diagnostics_for(&uri, version).await;
    }

    /// Publish syntactic and semantic diagnostics for a document.
    async fn publish_diagnostics_for(&self, uri: &Url, version: i32) {
        let (Some(service), Some(document)) = (self.service.get(), self.documents.get(uri.as_str()))
        else {
            return;
        };

        let mut diagnostics = Vec::new();
        for result in [
            service.get_syntactic_diagnostics(uri.as_str()),
            service.get_semantic_diagnostics(uri.as_str()),
        ] {
            match result {
                Ok(found) => diagnostics.extend(found),
                Err(err) => warn!(uri = %uri, error = %err, "diagnostics failed"),
            }
        }
        debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");

        let diagnostics = lsp::to_diagnostics(&diagnostics, uri, document.line_index());
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;
    }

    /// The service and the byte offset of an LSP position in an open document.
    fn locate(&self, uri: &Url, position: Position) -> Option<(&DecoratedService, Arc<Document>, usize)> {
        let service = self.service.get()?;
        let document = self.documents.get(uri.as_str())?;
        let offset = document.line_index().position_to_offset(position)?;
        Some((service, document, offset))
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract workspace root from params
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .and_then(|f| f.uri.to_file_path().ok())
            .or_else(|| {
                #[allow(deprecated)]
                params.root_uri.as_ref()?.to_file_path().ok()
            });

        let settings = match workspace_root {
            Some(root) => {
                let _ = self.workspace_root.set(root.clone());
                let (settings, settings_dir) = settings::discover_settings(&root);
                info!(dir = %settings_dir.display(), "using settings");
                settings
            }
            None => Settings::default(),
        };

        let locator = Arc::new(CachedLocator::new(TaggedTemplateLocator::new(
            settings.templates.tags.iter().cloned(),
        )));
        let service = build_service(&settings, Arc::clone(&self.documents), Arc::clone(&locator));
        let _ = self.locator.set(locator);
        let _ = self.service.set(service);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(
                        ["<", "@", ":", ".", " "].iter().map(|c| c.to_string()).collect(),
                    ),
                    resolve_provider: Some(true),
                    ..Default::default()
                }),
                definition_provider: Some(OneOf::Left(true)),
                references_provider: Some(OneOf::Left(true)),
                signature_help_provider: Some(SignatureHelpOptions {
                    trigger_characters: Some(vec!["(".to_string(), ",".to_string()]),
                    ..Default::default()
                }),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                document_formatting_provider: Some(OneOf::Left(true)),
                document_range_formatting_provider: Some(OneOf::Left(true)),
                code_action_provider: Some(CodeActionProviderCapability::Options(
                    CodeActionOptions {
                        code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                        ..Default::default()
                    },
                )),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        if let Some(root) = self.workspace_root.get() {
            info!(root = %root.display(), "workspace initialized");
        }
        self.client
            .log_message(MessageType::INFO, "template language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.on_document_change(
            params.text_document.uri,
            params.text_document.text,
            params.text_document.version,
        )
        .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // We use FULL sync, so there's exactly one change with the full text
        if let Some(change) = params.content_changes.into_iter().next() {
            self.on_document_change(
                params.text_document.uri,
                change.text,
                params.text_document.version,
            )
            .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.close(uri.as_str());
        if let Some(locator) = self.locator.get() {
            locator.forget(uri.as_str());
        }
        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let params = params.text_document_position_params;
        let Some((service, document, offset)) = self.locate(&params.text_document.uri, params.position)
        else {
            return Ok(None);
        };

        let info = service
            .get_quick_info_at_position(document.name(), offset)
            .map_err(internal_error)?;
        Ok(info.map(|info| lsp::to_hover(&info, document.line_index())))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let Some((service, document, offset)) =
            self.locate(&position.text_document.uri, position.position)
        else {
            return Ok(None);
        };

        let options = types::CompletionOptions {
            trigger_character: params
                .context
                .and_then(|c| c.trigger_character)
                .and_then(|c| c.chars().next()),
        };
        let info = service
            .get_completions_at_position(document.name(), offset, &options)
            .map_err(internal_error)?;
        Ok(info.map(|info| {
            lsp::to_completion_response(info, document.name(), offset, document.line_index())
        }))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        let (Some(service), Some(data)) = (self.service.get(), lsp::ResolveData::from_item(&item))
        else {
            return Ok(item);
        };

        let details = service
            .get_completion_entry_details(&data.uri, data.offset, &item.label, None)
            .map_err(internal_error)?;
        Ok(match details {
            Some(details) => lsp::apply_details(item, details),
            None => item,
        })
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let params = params.text_document_position_params;
        let Some((service, document, offset)) = self.locate(&params.text_document.uri, params.position)
        else {
            return Ok(None);
        };

        let result = service
            .get_definition_and_bound_span(document.name(), offset)
            .map_err(internal_error)?;
        Ok(result.and_then(|result| {
            lsp::to_definition_response(result, &self.documents, document.line_index())
        }))
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let position = params.text_document_position;
        let Some((service, document, offset)) =
            self.locate(&position.text_document.uri, position.position)
        else {
            return Ok(None);
        };

        let references = service
            .get_references_at_position(document.name(), offset)
            .map_err(internal_error)?;
        Ok(references.map(|references| lsp::to_locations(&references, &self.documents)))
    }

    async fn signature_help(&self, params: SignatureHelpParams) -> Result<Option<SignatureHelp>> {
        let position = params.text_document_position_params;
        let Some((service, document, offset)) =
            self.locate(&position.text_document.uri, position.position)
        else {
            return Ok(None);
        };

        let options = types::SignatureHelpOptions {
            trigger_character: params
                .context
                .as_ref()
                .and_then(|c| c.trigger_character.as_deref())
                .and_then(|c| c.chars().next()),
            is_retrigger: params.context.as_ref().is_some_and(|c| c.is_retrigger),
        };
        let items = service
            .get_signature_help_items(document.name(), offset, &options)
            .map_err(internal_error)?;
        Ok(items.map(lsp::to_signature_help))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let (Some(service), Some(document)) = (
            self.service.get(),
            self.documents.get(params.text_document.uri.as_str()),
        ) else {
            return Ok(None);
        };

        let spans = service
            .get_outlining_spans(document.name())
            .map_err(internal_error)?;
        Ok(Some(lsp::to_folding_ranges(&spans, document.line_index())))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        let (Some(service), Some(document)) = (
            self.service.get(),
            self.documents.get(params.text_document.uri.as_str()),
        ) else {
            return Ok(None);
        };

        let settings = lsp::format_settings(&params.options);
        let changes = service
            .get_formatting_edits_for_range(document.name(), 0, document.len(), &settings)
            .map_err(internal_error)?;
        Ok(Some(lsp::to_text_edits(&changes, document.line_index())))
    }

    async fn range_formatting(
        &self,
        params: DocumentRangeFormattingParams,
    ) -> Result<Option<Vec<TextEdit>>> {
        let (Some(service), Some(document)) = (
            self.service.get(),
            self.documents.get(params.text_document.uri.as_str()),
        ) else {
            return Ok(None);
        };
        let Some(span) = document.line_index().range_to_span(params.range) else {
            return Ok(None);
        };

        let settings = lsp::format_settings(&params.options);
        let changes = service
            .get_formatting_edits_for_range(document.name(), span.start, span.end(), &settings)
            .map_err(internal_error)?;
        Ok(Some(lsp::to_text_edits(&changes, document.line_index())))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let (Some(service), Some(document)) = (
            self.service.get(),
            self.documents.get(params.text_document.uri.as_str()),
        ) else {
            return Ok(None);
        };
        let Some(span) = document.line_index().range_to_span(params.range) else {
            return Ok(None);
        };

        let fixes = service.fixes();
        if fixes.is_empty() {
            return Ok(None);
        }
        let codes: Vec<u32> = lsp::error_codes(&params.context.diagnostics)
            .into_iter()
            .filter(|code| fixes.supports(*code))
            .collect();
        if codes.is_empty() {
            return Ok(None);
        }

        let actions = service
            .get_code_fixes_at_position(
                document.name(),
                span.start,
                span.end(),
                &codes,
                &types::FormatCodeSettings::default(),
            )
            .map_err(internal_error)?;
        Ok(Some(lsp::to_code_actions(
            &actions,
            &params.context.diagnostics,
            &self.documents,
        )))
    }
}

pub fn create_service() -> (LspService<Backend>, tower_lsp::ClientSocket) {
    LspService::new(Backend::new)
}
