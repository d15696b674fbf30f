//! Request options and result payloads shared by every language service.
//!
//! This module provides:
//! - `TextSpan`, the position-bearing unit of every payload
//! - result structures (completions, diagnostics, navigation, edits, ...)
//! - option structures passed as trailing arguments to operations

mod options;
mod results;
mod span;

pub use options::{CompletionOptions, FormatCodeSettings, SignatureHelpOptions};
pub use results::{
    CodeAction, CodeFixAction, CompletionEntry, CompletionEntryDetails, CompletionInfo,
    DefinitionInfo, DefinitionInfoAndBoundSpan, Diagnostic, DiagnosticCategory,
    DiagnosticRelatedInformation, ElementKind, FileTextChanges, JsxClosingTagInfo,
    OutliningSpan, OutliningSpanKind, QuickInfo, ReferenceEntry, SignatureHelpItem,
    SignatureHelpItems, SignatureHelpParameter, TextChange,
};
pub use span::TextSpan;
