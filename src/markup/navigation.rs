use std::ops::Range;

use crate::document::Template;
use crate::types::*;

use super::builtins::{BuiltinDef, ATTRIBUTES, ELEMENTS, EVENTS, MODIFIERS};
use super::parts::{AttributeKind, Markup, Part};
use super::MarkupService;

fn builtin_info(kind: ElementKind, def: &BuiltinDef, span: Range<usize>) -> QuickInfo {
    QuickInfo {
        kind,
        text_span: span.into(),
        display: format!("({}) {}", kind.as_str(), def.name),
        documentation: def.description.to_string(),
    }
}

/// Quick info for a tag name: built-in element first, then a component class.
fn tag_info(
    service: &MarkupService,
    template: &Template,
    name: &str,
    span: Range<usize>,
) -> Option<QuickInfo> {
    if let Some(def) = ELEMENTS.get(name.to_ascii_lowercase().as_str()) {
        return Some(builtin_info(ElementKind::Element, def, span));
    }
    let component = service
        .components(template.document())
        .into_iter()
        .find(|c| c.name == name)?;
    Some(QuickInfo {
        kind: ElementKind::Component,
        text_span: span.into(),
        display: component.display(),
        documentation: "Component.".to_string(),
    })
}

pub(super) fn quick_info(
    service: &MarkupService,
    template: &Template,
    markup: &Markup,
    position: usize,
) -> Option<QuickInfo> {
    match markup.part_at(position)? {
        Part::TagName(element) => {
            tag_info(service, template, &element.name.text, element.name.span.clone())
        }
        Part::ClosingTagName(closing) => {
            tag_info(service, template, &closing.name.text, closing.name.span.clone())
        }
        Part::AttributeName(_, attribute) => {
            let span = attribute.name.span.clone();
            match attribute.kind {
                AttributeKind::Event => EVENTS
                    .get(attribute.name.text.as_str())
                    .map(|def| builtin_info(ElementKind::Event, def, span)),
                AttributeKind::Plain | AttributeKind::Binding => ATTRIBUTES
                    .get(attribute.name.text.as_str())
                    .map(|def| builtin_info(ElementKind::Attribute, def, span)),
            }
        }
        Part::Modifier(_, modifier) => MODIFIERS
            .get(modifier.text.as_str())
            .map(|def| builtin_info(ElementKind::Modifier, def, modifier.span.clone())),
        Part::AttributeValue(..) | Part::Interpolation(_) => {
            let identifier = markup.identifier_at(position)?;
            let document = template.document();
            let binding = service.resolve(document, &identifier.name)?;
            Some(QuickInfo {
                kind: binding.kind(),
                text_span: identifier.span.into(),
                display: binding.display(),
                documentation: binding.documentation(document),
            })
        }
        Part::AttributeSlot(_) => None,
    }
}

/// Declarations for the name at `position`, with the span of that name.
///
/// Identifiers resolve to declarations of the host document, tag names to
/// component classes. Targets stay in host coordinates.
pub(super) fn definition(
    service: &MarkupService,
    template: &Template,
    markup: &Markup,
    position: usize,
) -> Option<(Vec<DefinitionInfo>, Range<usize>)> {
    let document = template.document();
    let (name, bound) = match markup.part_at(position)? {
        Part::TagName(element) => (element.name.text.clone(), element.name.span.clone()),
        Part::ClosingTagName(closing) => (closing.name.text.clone(), closing.name.span.clone()),
        Part::AttributeValue(..) | Part::Interpolation(_) => {
            let identifier = markup.identifier_at(position)?;
            (identifier.name, identifier.span)
        }
        _ => return None,
    };

    let definitions: Vec<DefinitionInfo> = service
        .declarations_named(document, &name)
        .into_iter()
        .map(|declaration| DefinitionInfo {
            file_name: template.file_name().to_string(),
            text_span: declaration.span,
            kind: declaration.kind,
            name: declaration.name,
            container_name: None,
            context_span: Some(declaration.context_span),
        })
        .collect();

    (!definitions.is_empty()).then_some((definitions, bound))
}

/// Every use of the identifier at `position` inside the template.
pub(super) fn references(
    template: &Template,
    markup: &Markup,
    position: usize,
) -> Option<Vec<ReferenceEntry>> {
    let target = markup.identifier_at(position)?;
    let references = markup
        .identifiers()
        .into_iter()
        .filter(|identifier| identifier.name == target.name)
        .map(|identifier| ReferenceEntry {
            file_name: template.file_name().to_string(),
            text_span: identifier.span.into(),
            is_write_access: false,
            is_definition: false,
        })
        .collect();
    Some(references)
}
