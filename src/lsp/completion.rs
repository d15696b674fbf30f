//! Completion items from service completion info.
//!
//! Items carry the document and offset they were requested at in their `data`
//! field, so that `completionItem/resolve` can ask for entry details without
//! the client re-sending the position.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionResponse, CompletionTextEdit, Documentation,
    MarkupContent, MarkupKind, TextEdit,
};

use crate::document::LineIndex;
use crate::types::{CompletionEntryDetails, CompletionInfo, ElementKind};

/// Payload stored in `CompletionItem::data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveData {
    pub uri: String,
    pub offset: usize,
}

impl ResolveData {
    /// Read the payload back from a completion item, if it has one.
    pub fn from_item(item: &CompletionItem) -> Option<Self> {
        serde_json::from_value(item.data.clone()?).ok()
    }
}

fn item_kind(kind: ElementKind) -> CompletionItemKind {
    match kind {
        ElementKind::Keyword => CompletionItemKind::KEYWORD,
        ElementKind::Variable => CompletionItemKind::VARIABLE,
        ElementKind::Function => CompletionItemKind::FUNCTION,
        ElementKind::Class | ElementKind::Component => CompletionItemKind::CLASS,
        ElementKind::Property => CompletionItemKind::PROPERTY,
        ElementKind::Element => CompletionItemKind::STRUCT,
        ElementKind::Attribute => CompletionItemKind::FIELD,
        ElementKind::Event => CompletionItemKind::EVENT,
        ElementKind::Modifier => CompletionItemKind::ENUM_MEMBER,
        ElementKind::Unknown => CompletionItemKind::TEXT,
    }
}

/// Convert completion info to an LSP response.
pub fn to_completion_response(
    info: CompletionInfo,
    uri: &str,
    offset: usize,
    line_index: &LineIndex,
) -> CompletionResponse {
    let data = serde_json::to_value(ResolveData {
        uri: uri.to_string(),
        offset,
    })
    .ok();

    let items = info
        .entries
        .into_iter()
        .map(|entry| {
            let span = entry.replacement_span.or(info.optional_replacement_span);
            let new_text = entry.insert_text.unwrap_or_else(|| entry.name.clone());
            let text_edit = span.map(|span| {
                CompletionTextEdit::Edit(TextEdit::new(line_index.span_to_range(&span), new_text.clone()))
            });
            CompletionItem {
                label: entry.name,
                kind: Some(item_kind(entry.kind)),
                sort_text: Some(entry.sort_text),
                insert_text: text_edit.is_none().then_some(new_text),
                text_edit,
                data: data.clone(),
                ..Default::default()
            }
        })
        .collect();

    CompletionResponse::Array(items)
}

/// Fill in the detail and documentation of a resolved item.
pub fn apply_details(mut item: CompletionItem, details: CompletionEntryDetails) -> CompletionItem {
    item.detail = Some(details.display);
    if !details.documentation.is_empty() {
        item.documentation = Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: details.documentation,
        }));
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompletionEntry, TextSpan};
    use tower_lsp::lsp_types::{Position, Range};

    fn items(response: CompletionResponse) -> Vec<CompletionItem> {
        match response {
            CompletionResponse::Array(items) => items,
            CompletionResponse::List(list) => list.items,
        }
    }

    fn entry(name: &str, kind: ElementKind, span: Option<TextSpan>) -> CompletionEntry {
        CompletionEntry {
            name: name.to_string(),
            kind,
            sort_text: "0".to_string(),
            insert_text: None,
            replacement_span: span,
        }
    }

    #[test]
    fn items_replace_the_typed_prefix() {
        let line_index = LineIndex::new("html`<p @cl`".to_string());
        let info = CompletionInfo {
            entries: vec![entry("click", ElementKind::Event, Some(TextSpan::new(9, 2)))],
            ..Default::default()
        };

        let items = items(to_completion_response(info, "file:///a.ts", 11, &line_index));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "click");
        assert_eq!(items[0].kind, Some(CompletionItemKind::EVENT));
        assert_eq!(
            items[0].text_edit,
            Some(CompletionTextEdit::Edit(TextEdit::new(
                Range::new(Position::new(0, 9), Position::new(0, 11)),
                "click".to_string()
            )))
        );
        assert_eq!(items[0].insert_text, None);
        assert_eq!(
            ResolveData::from_item(&items[0]),
            Some(ResolveData {
                uri: "file:///a.ts".to_string(),
                offset: 11
            })
        );
    }

    #[test]
    fn items_without_span_insert_text() {
        let line_index = LineIndex::new(String::new());
        let info = CompletionInfo {
            entries: vec![entry("const", ElementKind::Keyword, None)],
            ..Default::default()
        };
        let items = items(to_completion_response(info, "file:///a.ts", 0, &line_index));
        assert_eq!(items[0].insert_text.as_deref(), Some("const"));
        assert_eq!(items[0].text_edit, None);
    }

    #[test]
    fn details_fill_detail_and_documentation() {
        let item = CompletionItem::new_simple("click".to_string(), String::new());
        let item = apply_details(
            item,
            CompletionEntryDetails {
                name: "click".to_string(),
                kind: ElementKind::Event,
                display: "(event) click".to_string(),
                documentation: "Fired when the element is activated.".to_string(),
                code_actions: None,
            },
        );
        assert_eq!(item.detail.as_deref(), Some("(event) click"));
        assert!(matches!(item.documentation, Some(Documentation::MarkupContent(_))));
    }
}
