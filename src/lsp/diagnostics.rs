//! Diagnostics conversion from service diagnostics to LSP diagnostics.

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location, NumberOrString, Url,
};

use crate::document::LineIndex;
use crate::types::{self, DiagnosticCategory, TextSpan};

fn severity(category: DiagnosticCategory) -> DiagnosticSeverity {
    match category {
        DiagnosticCategory::Error => DiagnosticSeverity::ERROR,
        DiagnosticCategory::Warning => DiagnosticSeverity::WARNING,
        DiagnosticCategory::Suggestion => DiagnosticSeverity::HINT,
        DiagnosticCategory::Message => DiagnosticSeverity::INFORMATION,
    }
}

/// Related information that points into the same document.
fn related(
    info: &[types::DiagnosticRelatedInformation],
    uri: &Url,
    line_index: &LineIndex,
) -> Vec<DiagnosticRelatedInformation> {
    info.iter()
        .filter(|r| r.file_name.as_deref().map_or(true, |f| f == uri.as_str()))
        .filter_map(|r| {
            let span = TextSpan::new(r.start?, r.length.unwrap_or(0));
            Some(DiagnosticRelatedInformation {
                location: Location::new(uri.clone(), line_index.span_to_range(&span)),
                message: r.message_text.clone(),
            })
        })
        .collect()
}

/// Convert service diagnostics of one document to LSP diagnostics.
///
/// Diagnostics without a location are reported at the start of the document.
pub fn to_diagnostics(
    diagnostics: &[types::Diagnostic],
    uri: &Url,
    line_index: &LineIndex,
) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .map(|diagnostic| {
            let span = diagnostic.span().unwrap_or(TextSpan::new(0, 0));
            let related_information = diagnostic
                .related_information
                .as_deref()
                .map(|info| related(info, uri, line_index))
                .filter(|info| !info.is_empty());

            Diagnostic {
                range: line_index.span_to_range(&span),
                severity: Some(severity(diagnostic.category)),
                code: Some(NumberOrString::Number(diagnostic.code as i32)),
                code_description: None,
                source: diagnostic.source.clone(),
                message: diagnostic.message_text.clone(),
                related_information,
                tags: None,
                data: None,
            }
        })
        .collect()
}

/// Numeric error codes of LSP diagnostics, as sent back in code action requests.
pub fn error_codes(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics
        .iter()
        .filter_map(|d| match d.code.as_ref()? {
            NumberOrString::Number(n) => u32::try_from(*n).ok(),
            NumberOrString::String(s) => s.parse().ok(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Position;

    fn uri() -> Url {
        Url::parse("file:///view.ts").unwrap()
    }

    fn diagnostic(start: usize, length: usize, category: DiagnosticCategory) -> types::Diagnostic {
        types::Diagnostic {
            file_name: Some("file:///view.ts".to_string()),
            start: Some(start),
            length: Some(length),
            message_text: "Unknown event '@clik'.".to_string(),
            category,
            code: 9001,
            source: Some("markup".to_string()),
            related_information: None,
        }
    }

    #[test]
    fn converts_span_severity_and_code() {
        let line_index = LineIndex::new("const a = 1;\nhtml`<p @clik=\"a\">`".to_string());
        let diagnostics = to_diagnostics(
            &[diagnostic(22, 4, DiagnosticCategory::Warning)],
            &uri(),
            &line_index,
        );

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(1, 9));
        assert_eq!(diagnostics[0].range.end, Position::new(1, 13));
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostics[0].code, Some(NumberOrString::Number(9001)));
        assert_eq!(diagnostics[0].source.as_deref(), Some("markup"));
    }

    #[test]
    fn keeps_related_information_in_same_document() {
        let line_index = LineIndex::new("abcdef".to_string());
        let mut source = diagnostic(0, 1, DiagnosticCategory::Error);
        source.related_information = Some(vec![
            types::DiagnosticRelatedInformation {
                category: DiagnosticCategory::Message,
                code: 1,
                file_name: None,
                start: Some(2),
                length: Some(2),
                message_text: "here".to_string(),
            },
            types::DiagnosticRelatedInformation {
                category: DiagnosticCategory::Message,
                code: 1,
                file_name: Some("file:///other.ts".to_string()),
                start: Some(0),
                length: Some(1),
                message_text: "elsewhere".to_string(),
            },
        ]);

        let diagnostics = to_diagnostics(&[source], &uri(), &line_index);
        let related = diagnostics[0].related_information.as_ref().unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].message, "here");
        assert_eq!(related[0].location.range.start, Position::new(0, 2));
    }

    #[test]
    fn reads_error_codes_back() {
        let line_index = LineIndex::new("x".to_string());
        let mut diagnostics = to_diagnostics(
            &[diagnostic(0, 1, DiagnosticCategory::Error)],
            &uri(),
            &line_index,
        );
        diagnostics[0].code = Some(NumberOrString::String("1005".to_string()));
        diagnostics.push(Diagnostic::default());
        assert_eq!(error_codes(&diagnostics), vec![1005]);
    }
}
