//! Rewriting template-local positions in result payloads to global ones.
//!
//! Only fields known to carry a template-local offset are touched. Navigation
//! targets in other documents, and definitions (which always point at
//! declarations in host space), pass through unchanged.

use crate::document::Template;
use crate::types::*;

/// A payload whose template-local positions can be moved to global space.
pub trait Translate {
    fn to_global(&mut self, template: &Template);
}

/// A payload that can be merged with another of its kind.
pub trait Payload: Translate + Sized {
    fn append(&mut self, other: Self);
}

impl<T: Translate> Translate for Option<T> {
    fn to_global(&mut self, template: &Template) {
        if let Some(value) = self {
            value.to_global(template);
        }
    }
}

impl<T: Translate> Translate for Vec<T> {
    fn to_global(&mut self, template: &Template) {
        for value in self.iter_mut() {
            value.to_global(template);
        }
    }
}

impl<T: Translate> Payload for Option<T> {
    fn append(&mut self, other: Self) {
        if self.is_none() {
            *self = other;
        }
    }
}

impl<T: Translate> Payload for Vec<T> {
    fn append(&mut self, other: Self) {
        self.extend(other);
    }
}

impl Translate for TextSpan {
    fn to_global(&mut self, template: &Template) {
        self.start = template.local_to_global(self.start);
    }
}

impl Translate for CompletionInfo {
    fn to_global(&mut self, template: &Template) {
        self.optional_replacement_span.to_global(template);
        for entry in &mut self.entries {
            entry.replacement_span.to_global(template);
        }
    }
}

impl Translate for CompletionEntryDetails {
    fn to_global(&mut self, template: &Template) {
        if let Some(actions) = &mut self.code_actions {
            for action in actions {
                action.changes.to_global(template);
            }
        }
    }
}

impl Translate for QuickInfo {
    fn to_global(&mut self, template: &Template) {
        self.text_span.to_global(template);
    }
}

impl Translate for DefinitionInfo {
    /// Definitions name declarations, which live in host coordinates.
    fn to_global(&mut self, _template: &Template) {}
}

impl Translate for DefinitionInfoAndBoundSpan {
    fn to_global(&mut self, template: &Template) {
        self.text_span.to_global(template);
    }
}

impl Translate for Diagnostic {
    fn to_global(&mut self, template: &Template) {
        if let Some(start) = &mut self.start {
            *start = template.local_to_global(*start);
        }
        if let Some(related) = &mut self.related_information {
            for info in related.iter_mut() {
                let same_file = info
                    .file_name
                    .as_deref()
                    .map_or(true, |name| name == template.file_name());
                if same_file {
                    if let Some(start) = &mut info.start {
                        *start = template.local_to_global(*start);
                    }
                }
            }
        }
    }
}

impl Translate for TextChange {
    fn to_global(&mut self, template: &Template) {
        self.span.to_global(template);
    }
}

impl Translate for FileTextChanges {
    fn to_global(&mut self, template: &Template) {
        if self.file_name == template.file_name() {
            self.text_changes.to_global(template);
        }
    }
}

impl Translate for CodeFixAction {
    fn to_global(&mut self, template: &Template) {
        self.changes.to_global(template);
    }
}

impl Translate for SignatureHelpItems {
    fn to_global(&mut self, template: &Template) {
        self.applicable_span.to_global(template);
    }
}

impl Translate for OutliningSpan {
    fn to_global(&mut self, template: &Template) {
        self.text_span.to_global(template);
        self.hint_span.to_global(template);
    }
}

impl Translate for ReferenceEntry {
    fn to_global(&mut self, template: &Template) {
        if self.file_name == template.file_name() {
            self.text_span.to_global(template);
        }
    }
}

impl Translate for JsxClosingTagInfo {
    fn to_global(&mut self, _template: &Template) {}
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::Document;

    const FILE: &str = "file:///view.ts";

    fn template() -> Template {
        let text = "x".repeat(200);
        Template::new(Arc::new(Document::new(FILE, text, 1)), 100, 150, "html")
    }

    fn diagnostic(start: Option<usize>) -> Diagnostic {
        Diagnostic {
            file_name: Some(FILE.to_string()),
            start,
            length: Some(3),
            message_text: "m".to_string(),
            category: DiagnosticCategory::Error,
            code: 1,
            source: None,
            related_information: None,
        }
    }

    #[test]
    fn diagnostic_start_is_shifted_and_absent_stays_absent() {
        let mut located = diagnostic(Some(4));
        located.to_global(&template());
        assert_eq!(located.start, Some(104));
        assert_eq!(located.length, Some(3));

        let mut global = diagnostic(None);
        global.to_global(&template());
        assert_eq!(global.start, None);
    }

    #[test]
    fn related_information_in_other_files_is_untouched() {
        let mut diag = diagnostic(Some(0));
        diag.related_information = Some(vec![
            DiagnosticRelatedInformation {
                category: DiagnosticCategory::Message,
                code: 2,
                file_name: None,
                start: Some(5),
                length: Some(1),
                message_text: "here".to_string(),
            },
            DiagnosticRelatedInformation {
                category: DiagnosticCategory::Message,
                code: 2,
                file_name: Some("file:///other.ts".to_string()),
                start: Some(5),
                length: Some(1),
                message_text: "there".to_string(),
            },
        ]);
        diag.to_global(&template());
        let related = diag.related_information.unwrap();
        assert_eq!(related[0].start, Some(105));
        assert_eq!(related[1].start, Some(5));
    }

    #[test]
    fn nested_code_fix_edits_are_all_shifted() {
        let mut fix = CodeFixAction {
            fix_name: "f".to_string(),
            description: "d".to_string(),
            changes: vec![
                FileTextChanges {
                    file_name: FILE.to_string(),
                    text_changes: vec![
                        TextChange::new(TextSpan::new(0, 1), "a"),
                        TextChange::new(TextSpan::new(10, 2), "b"),
                    ],
                    is_new_file: false,
                },
                FileTextChanges {
                    file_name: FILE.to_string(),
                    text_changes: vec![TextChange::new(TextSpan::new(20, 0), "c")],
                    is_new_file: false,
                },
                FileTextChanges {
                    file_name: "file:///other.ts".to_string(),
                    text_changes: vec![TextChange::new(TextSpan::new(3, 0), "d")],
                    is_new_file: false,
                },
            ],
            fix_id: None,
            fix_all_description: None,
        };
        fix.to_global(&template());

        let starts: Vec<usize> = fix
            .changes
            .iter()
            .flat_map(|c| c.text_changes.iter().map(|t| t.span.start))
            .collect();
        assert_eq!(starts, vec![100, 110, 120, 3]);
    }

    #[test]
    fn definitions_keep_host_positions_but_bound_span_moves() {
        let definition = DefinitionInfo {
            file_name: FILE.to_string(),
            text_span: TextSpan::new(6, 4),
            kind: ElementKind::Variable,
            name: "name".to_string(),
            container_name: None,
            context_span: Some(TextSpan::new(0, 20)),
        };
        let mut bound = DefinitionInfoAndBoundSpan {
            definitions: Some(vec![definition.clone()]),
            text_span: TextSpan::new(2, 4),
        };
        bound.to_global(&template());

        assert_eq!(bound.text_span, TextSpan::new(102, 4));
        assert_eq!(bound.definitions.unwrap()[0], definition);
    }

    #[test]
    fn completion_spans_are_shifted() {
        let mut info = CompletionInfo {
            optional_replacement_span: Some(TextSpan::new(1, 2)),
            entries: vec![
                CompletionEntry {
                    name: "click".to_string(),
                    kind: ElementKind::Event,
                    sort_text: "0".to_string(),
                    insert_text: None,
                    replacement_span: Some(TextSpan::new(1, 2)),
                },
                CompletionEntry {
                    name: "input".to_string(),
                    kind: ElementKind::Event,
                    sort_text: "0".to_string(),
                    insert_text: None,
                    replacement_span: None,
                },
            ],
            ..Default::default()
        };
        info.to_global(&template());
        assert_eq!(info.optional_replacement_span, Some(TextSpan::new(101, 2)));
        assert_eq!(info.entries[0].replacement_span, Some(TextSpan::new(101, 2)));
        assert_eq!(info.entries[1].replacement_span, None);
    }

    #[test]
    fn option_payload_keeps_first_result() {
        let mut first: Option<QuickInfo> = None;
        let info = QuickInfo {
            kind: ElementKind::Event,
            text_span: TextSpan::new(0, 1),
            display: "a".to_string(),
            documentation: String::new(),
        };
        first.append(Some(info.clone()));
        first.append(Some(QuickInfo {
            display: "b".to_string(),
            ..info.clone()
        }));
        assert_eq!(first, Some(info));
    }
}
