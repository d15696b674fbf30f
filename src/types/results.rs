//! Result payloads returned by language service operations.
//!
//! These mirror the shapes of a script language service API: positions are
//! global byte offsets when produced by the host, local offsets when produced by
//! a template-aware service, until the decoration layer translates them.

use super::span::TextSpan;

/// Kind of symbol an entry, quick info or definition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Keyword,
    Variable,
    Function,
    Class,
    Property,
    Element,
    Component,
    Attribute,
    Event,
    Modifier,
    Unknown,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Keyword => "keyword",
            ElementKind::Variable => "var",
            ElementKind::Function => "function",
            ElementKind::Class => "class",
            ElementKind::Property => "property",
            ElementKind::Element => "element",
            ElementKind::Component => "component",
            ElementKind::Attribute => "attribute",
            ElementKind::Event => "event",
            ElementKind::Modifier => "modifier",
            ElementKind::Unknown => "",
        }
    }
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub name: String,
    pub kind: ElementKind,
    pub sort_text: String,
    pub insert_text: Option<String>,
    /// Text replaced when the entry is accepted.
    pub replacement_span: Option<TextSpan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionInfo {
    pub is_global_completion: bool,
    pub is_member_completion: bool,
    pub is_new_identifier_location: bool,
    pub optional_replacement_span: Option<TextSpan>,
    pub entries: Vec<CompletionEntry>,
}

/// Resolved documentation for one completion entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntryDetails {
    pub name: String,
    pub kind: ElementKind,
    pub display: String,
    pub documentation: String,
    pub code_actions: Option<Vec<CodeAction>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickInfo {
    pub kind: ElementKind,
    pub text_span: TextSpan,
    pub display: String,
    pub documentation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
    pub file_name: String,
    pub text_span: TextSpan,
    pub kind: ElementKind,
    pub name: String,
    pub container_name: Option<String>,
    pub context_span: Option<TextSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfoAndBoundSpan {
    pub definitions: Option<Vec<DefinitionInfo>>,
    /// The span of the reference the request was made on.
    pub text_span: TextSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file_name: Option<String>,
    pub start: Option<usize>,
    pub length: Option<usize>,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file_name: Option<String>,
    pub start: Option<usize>,
    pub length: Option<usize>,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub source: Option<String>,
    pub related_information: Option<Vec<DiagnosticRelatedInformation>>,
}

impl Diagnostic {
    /// Span of the diagnostic, when it has a location.
    pub fn span(&self) -> Option<TextSpan> {
        Some(TextSpan::new(self.start?, self.length.unwrap_or(0)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub span: TextSpan,
    pub new_text: String,
}

impl TextChange {
    pub fn new(span: TextSpan, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }
}

/// All changes to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTextChanges {
    pub file_name: String,
    pub text_changes: Vec<TextChange>,
    pub is_new_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAction {
    pub description: String,
    pub changes: Vec<FileTextChanges>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFixAction {
    pub fix_name: String,
    pub description: String,
    pub changes: Vec<FileTextChanges>,
    pub fix_id: Option<String>,
    pub fix_all_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHelpParameter {
    pub name: String,
    pub documentation: String,
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHelpItem {
    pub prefix: String,
    pub suffix: String,
    pub separator: String,
    pub parameters: Vec<SignatureHelpParameter>,
    pub documentation: String,
}

impl SignatureHelpItem {
    /// Full signature label, e.g. `emit(name, detail)`.
    pub fn label(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        format!("{}{}{}", self.prefix, params.join(&self.separator), self.suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHelpItems {
    pub items: Vec<SignatureHelpItem>,
    pub applicable_span: TextSpan,
    pub selected_item_index: usize,
    pub argument_index: usize,
    pub argument_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutliningSpanKind {
    Comment,
    Region,
    Code,
    Imports,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutliningSpan {
    pub text_span: TextSpan,
    pub hint_span: TextSpan,
    pub banner_text: String,
    pub auto_collapse: bool,
    pub kind: OutliningSpanKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub file_name: String,
    pub text_span: TextSpan,
    pub is_write_access: bool,
    pub is_definition: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxClosingTagInfo {
    pub new_text: String,
}
