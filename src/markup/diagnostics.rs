use std::collections::HashSet;
use std::ops::Range;

use crate::document::Template;
use crate::types::*;

use super::builtins::{closest_event, EVENTS, MODIFIERS};
use super::parts::{AttributeKind, Markup, Named};
use super::MarkupService;

/// Diagnostic codes reported by the markup service.
pub mod codes {
    pub const UNKNOWN_EVENT: u32 = 9001;
    pub const UNKNOWN_MODIFIER: u32 = 9002;
    pub const UNRESOLVED_BINDING: u32 = 9003;

    pub const UNTERMINATED_INTERPOLATION: u32 = 9100;
    pub const UNTERMINATED_TAG: u32 = 9101;
    pub const UNMATCHED_CLOSING_TAG: u32 = 9102;
    pub const UNCLOSED_ELEMENT: u32 = 9103;
}

const SOURCE: &str = "markup";

fn diagnostic(
    template: &Template,
    span: Range<usize>,
    category: DiagnosticCategory,
    code: u32,
    message: String,
) -> Diagnostic {
    Diagnostic {
        file_name: Some(template.file_name().to_string()),
        start: Some(span.start),
        length: Some(span.len()),
        message_text: message,
        category,
        code,
        source: Some(SOURCE.to_string()),
        related_information: None,
    }
}

/// Structural problems: unterminated parts and unbalanced tags.
pub(super) fn syntactic(template: &Template, markup: &Markup) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let error = DiagnosticCategory::Error;

    for interpolation in markup.interpolations.iter().filter(|i| !i.terminated) {
        let start = interpolation.span.start;
        diagnostics.push(diagnostic(
            template,
            start..start + 2,
            error,
            codes::UNTERMINATED_INTERPOLATION,
            "Unterminated interpolation; expected '}}'.".to_string(),
        ));
    }

    for element in markup.elements.iter().filter(|e| !e.terminated) {
        diagnostics.push(diagnostic(
            template,
            element.span.start..element.name.span.end,
            error,
            codes::UNTERMINATED_TAG,
            format!("Unterminated tag '<{}'; expected '>'.", element.name.text),
        ));
    }
    for closing in markup.closings.iter().filter(|c| !c.terminated) {
        diagnostics.push(diagnostic(
            template,
            closing.span.clone(),
            error,
            codes::UNTERMINATED_TAG,
            format!("Unterminated closing tag '</{}'; expected '>'.", closing.name.text),
        ));
    }

    let structure = markup.structure();
    for &index in &structure.unmatched {
        let closing = &markup.closings[index];
        diagnostics.push(diagnostic(
            template,
            closing.span.clone(),
            error,
            codes::UNMATCHED_CLOSING_TAG,
            format!("Closing tag '</{}>' has no matching opening tag.", closing.name.text),
        ));
    }
    for &index in &structure.unclosed {
        let element = &markup.elements[index];
        diagnostics.push(diagnostic(
            template,
            element.name.span.clone(),
            error,
            codes::UNCLOSED_ELEMENT,
            format!("Element '<{}>' is never closed.", element.name.text),
        ));
    }

    diagnostics.sort_by_key(|d| (d.start, d.code));
    diagnostics
}

/// Unknown events and modifiers, and names that do not resolve.
pub(super) fn semantic(
    service: &MarkupService,
    template: &Template,
    markup: &Markup,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let warning = DiagnosticCategory::Warning;

    for attribute in markup.elements.iter().flat_map(|e| e.attributes.iter()) {
        if attribute.kind != AttributeKind::Event {
            continue;
        }
        let name = &attribute.name;
        if service.report_unknown_events
            && !name.text.is_empty()
            && !EVENTS.contains_key(name.text.as_str())
        {
            diagnostics.push(diagnostic(
                template,
                name.span.clone(),
                warning,
                codes::UNKNOWN_EVENT,
                format!("Unknown event '@{}'.", name.text),
            ));
        }
        for modifier in &attribute.modifiers {
            if !modifier.text.is_empty() && !MODIFIERS.contains_key(modifier.text.as_str()) {
                diagnostics.push(diagnostic(
                    template,
                    modifier.span.clone(),
                    warning,
                    codes::UNKNOWN_MODIFIER,
                    format!("Unknown event modifier '.{}'.", modifier.text),
                ));
            }
        }
    }

    let known: HashSet<String> = service
        .bindings(template.document())
        .iter()
        .map(|b| b.name().to_string())
        .collect();
    for identifier in markup.identifiers() {
        if !known.contains(&identifier.name) {
            diagnostics.push(diagnostic(
                template,
                identifier.span,
                DiagnosticCategory::Error,
                codes::UNRESOLVED_BINDING,
                format!("Cannot find name '{}'.", identifier.name),
            ));
        }
    }

    diagnostics.sort_by_key(|d| (d.start, d.code));
    diagnostics
}

fn touches_range(name: &Named, start: usize, end: usize) -> bool {
    name.span.start <= end && start <= name.span.end
}

/// Fixes for misspelled event names in `start..end`.
pub(super) fn code_fixes(
    template: &Template,
    markup: &Markup,
    start: usize,
    end: usize,
    error_codes: &[u32],
) -> Vec<CodeFixAction> {
    if !error_codes.contains(&codes::UNKNOWN_EVENT) {
        return Vec::new();
    }

    markup
        .elements
        .iter()
        .flat_map(|e| e.attributes.iter())
        .filter(|a| a.kind == AttributeKind::Event)
        .map(|a| &a.name)
        .filter(|name| touches_range(name, start, end))
        .filter(|name| !EVENTS.contains_key(name.text.as_str()))
        .filter_map(|name| {
            let replacement = closest_event(&name.text)?;
            Some(CodeFixAction {
                fix_name: "fixEventName".to_string(),
                description: format!("Change '@{}' to '@{}'", name.text, replacement),
                changes: vec![FileTextChanges {
                    file_name: template.file_name().to_string(),
                    text_changes: vec![TextChange::new(name.span.clone().into(), replacement)],
                    is_new_file: false,
                }],
                fix_id: None,
                fix_all_description: None,
            })
        })
        .collect()
}
