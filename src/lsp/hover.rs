//! Hover information from quick info.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use crate::document::LineIndex;
use crate::types::QuickInfo;

/// Format quick info as markdown: the display line in a code block, then the
/// documentation.
fn format_quick_info(info: &QuickInfo) -> String {
    let mut value = format!("```\n{}\n```", info.display);
    if !info.documentation.is_empty() {
        value.push_str("\n\n");
        value.push_str(&info.documentation);
    }
    value
}

pub fn to_hover(info: &QuickInfo, line_index: &LineIndex) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format_quick_info(info),
        }),
        range: Some(line_index.span_to_range(&info.text_span)),
    }
}
