//! The fixed operation table: which operations are decorated and how.

use std::collections::BTreeMap;

use crate::service::Capabilities;

/// How a decorated operation combines host and template results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Inside a template only the template service answers; elsewhere the host.
    ReplaceIfApplicable,
    /// Host result plus the results of every template in the document.
    MergeWholeDocument,
    /// Host result plus the results of templates intersecting the request range.
    MergeRangeFiltered,
    /// Extends the supported fix code registry once, at construction.
    AugmentRegistry,
}

/// The operations the decoration layer knows how to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    GetCompletionsAtPosition,
    GetCompletionEntryDetails,
    GetQuickInfoAtPosition,
    GetDefinitionAtPosition,
    GetDefinitionAndBoundSpan,
    GetSemanticDiagnostics,
    GetSyntacticDiagnostics,
    GetFormattingEditsForRange,
    GetCodeFixesAtPosition,
    GetSupportedCodeFixes,
    GetSignatureHelpItems,
    GetOutliningSpans,
    GetReferencesAtPosition,
    GetJsxClosingTagAtPosition,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::GetCompletionsAtPosition,
        Operation::GetCompletionEntryDetails,
        Operation::GetQuickInfoAtPosition,
        Operation::GetDefinitionAtPosition,
        Operation::GetDefinitionAndBoundSpan,
        Operation::GetSemanticDiagnostics,
        Operation::GetSyntacticDiagnostics,
        Operation::GetFormattingEditsForRange,
        Operation::GetCodeFixesAtPosition,
        Operation::GetSupportedCodeFixes,
        Operation::GetSignatureHelpItems,
        Operation::GetOutliningSpans,
        Operation::GetReferencesAtPosition,
        Operation::GetJsxClosingTagAtPosition,
    ];

    /// Name of the operation on the host and composite surface.
    pub fn method_name(self) -> &'static str {
        match self {
            Operation::GetCompletionsAtPosition => "get_completions_at_position",
            Operation::GetCompletionEntryDetails => "get_completion_entry_details",
            Operation::GetQuickInfoAtPosition => "get_quick_info_at_position",
            Operation::GetDefinitionAtPosition => "get_definition_at_position",
            Operation::GetDefinitionAndBoundSpan => "get_definition_and_bound_span",
            Operation::GetSemanticDiagnostics => "get_semantic_diagnostics",
            Operation::GetSyntacticDiagnostics => "get_syntactic_diagnostics",
            Operation::GetFormattingEditsForRange => "get_formatting_edits_for_range",
            Operation::GetCodeFixesAtPosition => "get_code_fixes_at_position",
            Operation::GetSupportedCodeFixes => "get_supported_code_fixes",
            Operation::GetSignatureHelpItems => "get_signature_help_items",
            Operation::GetOutliningSpans => "get_outlining_spans",
            Operation::GetReferencesAtPosition => "get_references_at_position",
            Operation::GetJsxClosingTagAtPosition => "get_jsx_closing_tag_at_position",
        }
    }

    /// Name of the template service hook whose presence enables the wrapper.
    ///
    /// Matches [`method_name`](Self::method_name) except for references, which
    /// the template service provides as `find_references`.
    pub fn hook_name(self) -> &'static str {
        match self {
            Operation::GetReferencesAtPosition => "find_references",
            other => other.method_name(),
        }
    }

    pub fn policy(self) -> Policy {
        match self {
            Operation::GetCompletionsAtPosition
            | Operation::GetCompletionEntryDetails
            | Operation::GetQuickInfoAtPosition
            | Operation::GetDefinitionAtPosition
            | Operation::GetDefinitionAndBoundSpan
            | Operation::GetSignatureHelpItems
            | Operation::GetJsxClosingTagAtPosition
            | Operation::GetReferencesAtPosition => Policy::ReplaceIfApplicable,
            Operation::GetSyntacticDiagnostics
            | Operation::GetSemanticDiagnostics
            | Operation::GetOutliningSpans => Policy::MergeWholeDocument,
            Operation::GetFormattingEditsForRange | Operation::GetCodeFixesAtPosition => {
                Policy::MergeRangeFiltered
            }
            Operation::GetSupportedCodeFixes => Policy::AugmentRegistry,
        }
    }
}

/// Operations wrapped for one template service, decided at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapperTable {
    installed: BTreeMap<Operation, Policy>,
}

impl WrapperTable {
    /// Install a wrapper for every operation whose hook the service provides.
    pub fn from_capabilities(capabilities: &Capabilities) -> Self {
        let installed = Operation::ALL
            .into_iter()
            .filter(|op| capabilities.has(*op))
            .map(|op| (op, op.policy()))
            .collect();
        Self { installed }
    }

    /// The policy of an installed wrapper; `None` means pass-through.
    pub fn policy(&self, operation: Operation) -> Option<Policy> {
        self.installed.get(&operation).copied()
    }

    pub fn is_installed(&self, operation: Operation) -> bool {
        self.installed.contains_key(&operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.installed.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_has_a_distinct_method_name() {
        let mut names: Vec<&str> = Operation::ALL.iter().map(|op| op.method_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn references_hook_is_renamed() {
        let op = Operation::GetReferencesAtPosition;
        assert_eq!(op.method_name(), "get_references_at_position");
        assert_eq!(op.hook_name(), "find_references");
        assert_eq!(
            Operation::GetQuickInfoAtPosition.hook_name(),
            "get_quick_info_at_position"
        );
    }

    #[test]
    fn policy_table() {
        let count = |policy| {
            Operation::ALL
                .iter()
                .filter(|op| op.policy() == policy)
                .count()
        };
        assert_eq!(count(Policy::ReplaceIfApplicable), 8);
        assert_eq!(count(Policy::MergeWholeDocument), 3);
        assert_eq!(count(Policy::MergeRangeFiltered), 2);
        assert_eq!(count(Policy::AugmentRegistry), 1);
    }

    #[test]
    fn only_present_hooks_are_installed() {
        let capabilities = Capabilities {
            get_quick_info_at_position: true,
            find_references: true,
            get_outlining_spans: true,
            ..Default::default()
        };
        let table = WrapperTable::from_capabilities(&capabilities);

        let installed: Vec<Operation> = table.operations().collect();
        assert_eq!(
            installed,
            vec![
                Operation::GetQuickInfoAtPosition,
                Operation::GetOutliningSpans,
                Operation::GetReferencesAtPosition,
            ]
        );
        assert_eq!(
            table.policy(Operation::GetOutliningSpans),
            Some(Policy::MergeWholeDocument)
        );
        assert_eq!(table.policy(Operation::GetCompletionsAtPosition), None);
    }

    #[test]
    fn full_capabilities_install_everything() {
        let table = WrapperTable::from_capabilities(&Capabilities::all());
        assert_eq!(table.operations().count(), 14);
    }
}
