//! Formatting edits, folding ranges, code actions and signature help.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, Documentation, FoldingRange,
    FoldingRangeKind, FormattingOptions, ParameterInformation, ParameterLabel, SignatureHelp,
    SignatureInformation, TextEdit, Url, WorkspaceEdit,
};

use crate::document::{DocumentStore, LineIndex};
use crate::types::{
    CodeFixAction, FileTextChanges, FormatCodeSettings, OutliningSpan, OutliningSpanKind,
    SignatureHelpItems, TextChange,
};

/// Service formatting settings from the client's formatting options.
pub fn format_settings(options: &FormattingOptions) -> FormatCodeSettings {
    FormatCodeSettings {
        tab_size: options.tab_size,
        indent_size: options.tab_size,
        convert_tabs_to_spaces: options.insert_spaces,
        ..Default::default()
    }
}

pub fn to_text_edits(changes: &[TextChange], line_index: &LineIndex) -> Vec<TextEdit> {
    changes
        .iter()
        .map(|change| TextEdit::new(line_index.span_to_range(&change.span), change.new_text.clone()))
        .collect()
}

pub fn to_folding_ranges(spans: &[OutliningSpan], line_index: &LineIndex) -> Vec<FoldingRange> {
    spans
        .iter()
        .filter_map(|span| {
            let start_line = line_index.line_of(span.text_span.start) as u32;
            let end_line = line_index.line_of(span.text_span.end()) as u32;
            if end_line <= start_line {
                return None;
            }
            let kind = match span.kind {
                OutliningSpanKind::Comment => Some(FoldingRangeKind::Comment),
                OutliningSpanKind::Imports => Some(FoldingRangeKind::Imports),
                OutliningSpanKind::Region => Some(FoldingRangeKind::Region),
                OutliningSpanKind::Code => None,
            };
            Some(FoldingRange {
                start_line,
                end_line,
                kind,
                ..Default::default()
            })
        })
        .collect()
}

fn workspace_edit(changes: &[FileTextChanges], documents: &DocumentStore) -> WorkspaceEdit {
    let mut edits: HashMap<Url, Vec<TextEdit>> = HashMap::new();
    for change in changes {
        let (Ok(uri), Some(document)) = (Url::parse(&change.file_name), documents.get(&change.file_name))
        else {
            continue;
        };
        edits
            .entry(uri)
            .or_default()
            .extend(to_text_edits(&change.text_changes, document.line_index()));
    }
    WorkspaceEdit {
        changes: Some(edits),
        ..Default::default()
    }
}

/// Quick fixes, each attached to the diagnostics of the request.
pub fn to_code_actions(
    fixes: &[CodeFixAction],
    diagnostics: &[Diagnostic],
    documents: &DocumentStore,
) -> Vec<CodeActionOrCommand> {
    fixes
        .iter()
        .map(|fix| {
            CodeActionOrCommand::CodeAction(CodeAction {
                title: fix.description.clone(),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: (!diagnostics.is_empty()).then(|| diagnostics.to_vec()),
                edit: Some(workspace_edit(&fix.changes, documents)),
                ..Default::default()
            })
        })
        .collect()
}

pub fn to_signature_help(items: SignatureHelpItems) -> SignatureHelp {
    let signatures = items
        .items
        .iter()
        .map(|item| SignatureInformation {
            label: item.label(),
            documentation: (!item.documentation.is_empty())
                .then(|| Documentation::String(item.documentation.clone())),
            parameters: Some(
                item.parameters
                    .iter()
                    .map(|p| ParameterInformation {
                        label: ParameterLabel::Simple(p.name.clone()),
                        documentation: (!p.documentation.is_empty())
                            .then(|| Documentation::String(p.documentation.clone())),
                    })
                    .collect(),
            ),
            active_parameter: None,
        })
        .collect();

    SignatureHelp {
        signatures,
        active_signature: Some(items.selected_item_index as u32),
        active_parameter: Some(items.argument_index as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SignatureHelpItem, SignatureHelpParameter, TextSpan};
    use tower_lsp::lsp_types::{Position, Range};

    const FILE: &str = "file:///view.ts";

    #[test]
    fn folding_skips_single_line_spans() {
        let line_index = LineIndex::new("/*\n*/\nhtml`<p></p>`".to_string());
        let span = |start, length, kind| OutliningSpan {
            text_span: TextSpan::new(start, length),
            hint_span: TextSpan::new(start, length),
            banner_text: String::new(),
            auto_collapse: false,
            kind,
        };
        let ranges = to_folding_ranges(
            &[
                span(0, 5, OutliningSpanKind::Comment),
                span(11, 7, OutliningSpanKind::Code),
            ],
            &line_index,
        );
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].start_line, ranges[0].end_line), (0, 1));
        assert_eq!(ranges[0].kind, Some(FoldingRangeKind::Comment));
    }

    #[test]
    fn code_action_edits_open_documents() {
        let documents = DocumentStore::new();
        documents.open(FILE, "html`<b @clik=\"go\"></b>`".to_string(), 1);
        let fix = CodeFixAction {
            fix_name: "fixEventName".to_string(),
            description: "Change '@clik' to '@click'".to_string(),
            changes: vec![FileTextChanges {
                file_name: FILE.to_string(),
                text_changes: vec![TextChange::new(TextSpan::new(9, 4), "click")],
                is_new_file: false,
            }],
            fix_id: None,
            fix_all_description: None,
        };

        let actions = to_code_actions(&[fix], &[], &documents);
        let CodeActionOrCommand::CodeAction(action) = &actions[0] else {
            panic!("expected code action");
        };
        assert_eq!(action.title, "Change '@clik' to '@click'");
        assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
        let changes = action.edit.as_ref().unwrap().changes.as_ref().unwrap();
        let edits = &changes[&Url::parse(FILE).unwrap()];
        assert_eq!(
            edits,
            &vec![TextEdit::new(
                Range::new(Position::new(0, 9), Position::new(0, 13)),
                "click".to_string()
            )]
        );
    }

    #[test]
    fn signature_help_labels() {
        let help = to_signature_help(SignatureHelpItems {
            items: vec![SignatureHelpItem {
                prefix: "emit(".to_string(),
                suffix: ")".to_string(),
                separator: ", ".to_string(),
                parameters: vec![
                    SignatureHelpParameter {
                        name: "name".to_string(),
                        documentation: String::new(),
                        is_optional: false,
                    },
                    SignatureHelpParameter {
                        name: "detail".to_string(),
                        documentation: "Event payload.".to_string(),
                        is_optional: true,
                    },
                ],
                documentation: String::new(),
            }],
            applicable_span: TextSpan::new(0, 0),
            selected_item_index: 0,
            argument_index: 1,
            argument_count: 2,
        });
        assert_eq!(help.signatures[0].label, "emit(name, detail)");
        assert_eq!(help.active_parameter, Some(1));
    }

    #[test]
    fn formatting_options_map_to_settings() {
        let settings = format_settings(&FormattingOptions {
            tab_size: 2,
            insert_spaces: true,
            ..Default::default()
        });
        assert_eq!(settings.indent_size, 2);
        assert!(settings.convert_tabs_to_spaces);
    }
}
