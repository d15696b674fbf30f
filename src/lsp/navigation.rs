//! Definition and reference locations.
//!
//! Targets may lie in any open document, so conversion looks up the target's
//! line index in the store. Targets in documents that are not open are dropped.

use tower_lsp::lsp_types::{GotoDefinitionResponse, Location, LocationLink, Url};

use crate::document::{DocumentStore, LineIndex};
use crate::types::{DefinitionInfoAndBoundSpan, ReferenceEntry, TextSpan};

fn location(documents: &DocumentStore, file_name: &str, span: &TextSpan) -> Option<Location> {
    let uri = Url::parse(file_name).ok()?;
    let document = documents.get(file_name)?;
    Some(Location::new(uri, document.line_index().span_to_range(span)))
}

/// Convert a definition result to location links whose origin is the bound span.
pub fn to_definition_response(
    result: DefinitionInfoAndBoundSpan,
    documents: &DocumentStore,
    line_index: &LineIndex,
) -> Option<GotoDefinitionResponse> {
    let origin = line_index.span_to_range(&result.text_span);
    let links: Vec<LocationLink> = result
        .definitions?
        .iter()
        .filter_map(|definition| {
            let target = location(documents, &definition.file_name, &definition.text_span)?;
            let target_range = definition
                .context_span
                .and_then(|span| location(documents, &definition.file_name, &span))
                .map_or(target.range, |context| context.range);
            Some(LocationLink {
                origin_selection_range: Some(origin),
                target_uri: target.uri,
                target_range,
                target_selection_range: target.range,
            })
        })
        .collect();

    (!links.is_empty()).then_some(GotoDefinitionResponse::Link(links))
}

pub fn to_locations(references: &[ReferenceEntry], documents: &DocumentStore) -> Vec<Location> {
    references
        .iter()
        .filter_map(|reference| location(documents, &reference.file_name, &reference.text_span))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefinitionInfo, ElementKind};
    use tower_lsp::lsp_types::{Position, Range};

    const FILE: &str = "file:///view.ts";

    fn store() -> DocumentStore {
        let store = DocumentStore::new();
        store.open(FILE, "const count = 0;\nhtml`{{ count }}`".to_string(), 1);
        store
    }

    #[test]
    fn definition_links_carry_origin_and_context() {
        let documents = store();
        let document = documents.get(FILE).unwrap();
        let result = DefinitionInfoAndBoundSpan {
            definitions: Some(vec![DefinitionInfo {
                file_name: FILE.to_string(),
                text_span: TextSpan::new(6, 5),
                kind: ElementKind::Variable,
                name: "count".to_string(),
                container_name: None,
                context_span: Some(TextSpan::new(0, 11)),
            }]),
            text_span: TextSpan::new(25, 5),
        };

        let Some(GotoDefinitionResponse::Link(links)) =
            to_definition_response(result, &documents, document.line_index())
        else {
            panic!("expected links");
        };
        assert_eq!(
            links[0].origin_selection_range,
            Some(Range::new(Position::new(1, 8), Position::new(1, 13)))
        );
        assert_eq!(
            links[0].target_selection_range,
            Range::new(Position::new(0, 6), Position::new(0, 11))
        );
        assert_eq!(
            links[0].target_range,
            Range::new(Position::new(0, 0), Position::new(0, 11))
        );
    }

    #[test]
    fn definitions_in_closed_documents_are_dropped() {
        let documents = store();
        let document = documents.get(FILE).unwrap();
        let result = DefinitionInfoAndBoundSpan {
            definitions: Some(vec![DefinitionInfo {
                file_name: "file:///closed.ts".to_string(),
                text_span: TextSpan::new(0, 1),
                kind: ElementKind::Variable,
                name: "x".to_string(),
                container_name: None,
                context_span: None,
            }]),
            text_span: TextSpan::new(0, 1),
        };
        assert!(to_definition_response(result, &documents, document.line_index()).is_none());
    }

    #[test]
    fn references_become_locations() {
        let documents = store();
        let references = vec![ReferenceEntry {
            file_name: FILE.to_string(),
            text_span: TextSpan::new(25, 5),
            is_write_access: false,
            is_definition: false,
        }];
        let locations = to_locations(&references, &documents);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].uri.as_str(), FILE);
        assert_eq!(locations[0].range.start, Position::new(1, 8));
    }
}
