use crate::document::Template;
use crate::types::*;

use super::parts::Markup;

/// Edits removing trailing whitespace from lines that end inside `start..end`.
///
/// The last line of the template is left alone: its trailing whitespace is the
/// indentation of the closing delimiter.
pub(super) fn trailing_whitespace_edits(text: &str, start: usize, end: usize) -> Vec<TextChange> {
    let mut edits = Vec::new();
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let line_end = line_start + line.len();
        if !line.ends_with('\n') {
            break;
        }
        let content = line.trim_end_matches(['\n', '\r']);
        let trimmed = content.trim_end_matches([' ', '\t']);
        let whitespace = line_start + trimmed.len()..line_start + content.len();

        let in_range = whitespace.start < end.max(start + 1) && whitespace.end > start;
        if !whitespace.is_empty() && in_range {
            edits.push(TextChange::new(whitespace.into(), ""));
        }
        line_start = line_end;
    }

    edits
}

/// Multi-line elements, plus the whole template when it spans lines.
pub(super) fn outlining_spans(template: &Template, markup: &Markup) -> Vec<OutliningSpan> {
    let text = template.text();
    let mut spans = Vec::new();

    if text.contains('\n') {
        let banner = match template.context() {
            Some(context) => format!("{context}: {}`...`", template.tag()),
            None => format!("{}`...`", template.tag()),
        };
        let whole = TextSpan::new(0, text.len());
        spans.push(OutliningSpan {
            text_span: whole,
            hint_span: whole,
            banner_text: banner,
            auto_collapse: false,
            kind: OutliningSpanKind::Region,
        });
    }

    for (open, close) in markup.structure().pairs {
        let element = &markup.elements[open];
        let closing = &markup.closings[close];
        let span = TextSpan::from_bounds(element.span.start, closing.span.end);
        if !text[span.start..span.end()].contains('\n') {
            continue;
        }
        spans.push(OutliningSpan {
            text_span: span,
            hint_span: TextSpan::from(element.span.clone()),
            banner_text: format!("<{}>...", element.name.text),
            auto_collapse: false,
            kind: OutliningSpanKind::Code,
        });
    }

    spans.sort_by_key(|s| s.text_span.start);
    spans
}
