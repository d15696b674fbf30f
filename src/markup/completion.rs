use std::collections::HashMap;
use std::ops::Range;

use crate::document::Template;
use crate::types::*;

use super::builtins::{
    sorted_names, BuiltinDef, ATTRIBUTES, ELEMENTS, EVENTS, MODIFIERS, STYLE_PROPERTIES,
};
use super::parts::{AttributeKind, Markup, Named, Part};
use super::{Binding, MarkupService};

/// What kind of name is being typed at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Element,
    Attribute,
    Event,
    Modifier,
    StyleProperty,
    Binding,
}

/// The completion context at `offset` and the span of the typed prefix.
fn context_at(markup: &Markup, text: &str, offset: usize) -> Option<(Context, Range<usize>)> {
    match markup.part_at(offset) {
        Some(Part::Interpolation(_)) => expression_context(text, offset),
        Some(Part::AttributeValue(_, attribute, value)) => {
            if attribute.has_expression() {
                expression_context(text, offset)
            } else if attribute.name.text == "style" {
                style_context(text, value, offset)
            } else {
                None
            }
        }
        Some(Part::AttributeName(_, attribute)) => {
            let context = match attribute.kind {
                AttributeKind::Event => Context::Event,
                AttributeKind::Plain | AttributeKind::Binding => Context::Attribute,
            };
            Some((context, attribute.name.span.start..offset))
        }
        Some(Part::Modifier(_, modifier)) => Some((Context::Modifier, modifier.span.start..offset)),
        Some(Part::TagName(element)) => Some((Context::Element, element.name.span.start..offset)),
        Some(Part::AttributeSlot(_)) => Some((Context::Attribute, offset..offset)),
        Some(Part::ClosingTagName(_)) => None,
        None => text
            .get(..offset)
            .is_some_and(|before| before.ends_with('<'))
            .then_some((Context::Element, offset..offset)),
    }
}

fn expression_context(text: &str, offset: usize) -> Option<(Context, Range<usize>)> {
    let before = text.get(..offset)?;
    let prefix_len = before
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'$')
        .count();
    let start = offset - prefix_len;
    if before[..start].trim_end().ends_with('.') {
        return None;
    }
    Some((Context::Binding, start..offset))
}

/// Inside `style="..."`, only the property name position completes.
fn style_context(text: &str, value: &Named, offset: usize) -> Option<(Context, Range<usize>)> {
    let declaration = text.get(value.span.start..offset)?;
    let declaration = declaration.rsplit(';').next().unwrap_or(declaration);
    if declaration.contains(':') {
        return None;
    }
    let prefix_len = declaration
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_alphabetic() || *b == b'-')
        .count();
    Some((Context::StyleProperty, offset - prefix_len..offset))
}

fn dataset(context: Context) -> Option<&'static HashMap<&'static str, BuiltinDef>> {
    match context {
        Context::Element => Some(&*ELEMENTS),
        Context::Attribute => Some(&*ATTRIBUTES),
        Context::Event => Some(&*EVENTS),
        Context::Modifier => Some(&*MODIFIERS),
        Context::StyleProperty => Some(&*STYLE_PROPERTIES),
        Context::Binding => None,
    }
}

fn dataset_kind(context: Context) -> ElementKind {
    match context {
        Context::Element => ElementKind::Element,
        Context::Attribute => ElementKind::Attribute,
        Context::Event => ElementKind::Event,
        Context::Modifier => ElementKind::Modifier,
        Context::StyleProperty => ElementKind::Property,
        Context::Binding => ElementKind::Variable,
    }
}

fn entry(name: &str, kind: ElementKind, sort_text: &str, span: TextSpan) -> CompletionEntry {
    CompletionEntry {
        name: name.to_string(),
        kind,
        sort_text: sort_text.to_string(),
        insert_text: None,
        replacement_span: Some(span),
    }
}

pub(super) fn completions(
    service: &MarkupService,
    template: &Template,
    markup: &Markup,
    position: usize,
) -> Option<CompletionInfo> {
    let text = template.text();
    let (context, prefix) = context_at(markup, text, position.min(text.len()))?;
    let typed = &text[prefix.clone()];
    let span = TextSpan::from(prefix);
    let document = template.document();

    let mut entries: Vec<CompletionEntry> = match dataset(context) {
        Some(dataset) => sorted_names(dataset)
            .into_iter()
            .map(|name| entry(name, dataset_kind(context), "0", span))
            .collect(),
        None => service
            .bindings(document)
            .iter()
            .map(|binding| {
                let sort_text = match binding {
                    Binding::Global(_) => "1",
                    Binding::Declared(_) => "0",
                };
                entry(binding.name(), binding.kind(), sort_text, span)
            })
            .collect(),
    };
    if context == Context::Element {
        entries.extend(
            service
                .components(document)
                .iter()
                .map(|component| entry(&component.name, ElementKind::Component, "1", span)),
        );
    }
    entries.retain(|e| e.name.starts_with(typed));

    Some(CompletionInfo {
        is_global_completion: context == Context::Binding,
        is_member_completion: false,
        is_new_identifier_location: false,
        optional_replacement_span: Some(span),
        entries,
    })
}

pub(super) fn details(
    service: &MarkupService,
    template: &Template,
    markup: &Markup,
    position: usize,
    entry_name: &str,
) -> Option<CompletionEntryDetails> {
    let text = template.text();
    let (context, _) = context_at(markup, text, position.min(text.len()))?;
    let document = template.document();

    if context == Context::Binding {
        let binding = service.resolve(document, entry_name)?;
        return Some(CompletionEntryDetails {
            name: entry_name.to_string(),
            kind: binding.kind(),
            display: binding.display(),
            documentation: binding.documentation(document),
            code_actions: None,
        });
    }

    if let Some(def) = dataset(context).and_then(|d| d.get(entry_name)) {
        let kind = dataset_kind(context);
        return Some(CompletionEntryDetails {
            name: entry_name.to_string(),
            kind,
            display: format!("({}) {}", kind.as_str(), def.name),
            documentation: def.description.to_string(),
            code_actions: None,
        });
    }

    let component = service
        .components(document)
        .into_iter()
        .find(|c| context == Context::Element && c.name == entry_name)?;
    Some(CompletionEntryDetails {
        name: entry_name.to_string(),
        kind: ElementKind::Component,
        display: component.display(),
        documentation: Binding::Declared(component).documentation(document),
        code_actions: None,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::Document;
    use crate::markup::ScriptDeclarations;

    /// Document with a single template whose text is `body`; `|` marks the cursor.
    fn at_cursor(prelude: &str, body: &str) -> (Template, usize) {
        let cursor = body.find('|').unwrap();
        let body = body.replace('|', "");
        let source = format!("{prelude}\nconst view = html`{body}`;");
        let start = source.find('`').unwrap() + 1;
        let document = Arc::new(Document::new("file:///view.ts", source, 1));
        let end = start + body.len();
        (Template::new(document, start, end, "html"), cursor)
    }

    fn service() -> MarkupService {
        MarkupService::new(Arc::new(ScriptDeclarations)).with_globals(["console"])
    }

    fn complete(prelude: &str, body: &str) -> Option<CompletionInfo> {
        let (template, cursor) = at_cursor(prelude, body);
        let markup = Markup::parse(template.text());
        completions(&service(), &template, &markup, cursor)
    }

    fn names(info: &CompletionInfo) -> Vec<&str> {
        info.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn events_after_at_sign() {
        let info = complete("", "<button @cl|>").unwrap();
        assert_eq!(names(&info), vec!["click"]);
        assert_eq!(info.optional_replacement_span, Some(TextSpan::new(9, 2)));
        assert_eq!(info.entries[0].kind, ElementKind::Event);
    }

    #[test]
    fn modifiers_after_event() {
        let info = complete("", "<form @submit.p|>").unwrap();
        assert_eq!(names(&info), vec!["passive", "prevent"]);
    }

    #[test]
    fn bindings_in_interpolation() {
        let info = complete("const count = 1;\nfunction compute() {}", "<p>{{ co| }}</p>").unwrap();
        assert_eq!(names(&info), vec!["count", "compute", "console"]);
        assert!(info.is_global_completion);
        let sort: Vec<&str> = info.entries.iter().map(|e| e.sort_text.as_str()).collect();
        assert_eq!(sort, vec!["0", "0", "1"]);
    }

    #[test]
    fn no_member_completions() {
        assert!(complete("const user = {};", "<p>{{ user.| }}</p>").is_none());
    }

    #[test]
    fn elements_and_components_after_angle_bracket() {
        let info = complete("class Sidebar {}", "<div>\n  <s|</div>").unwrap();
        // component names are matched case-sensitively
        assert_eq!(names(&info), vec!["section", "select", "slot", "span"]);

        let info = complete("class Sidebar {}", "<div>\n  <|\n</div>").unwrap();
        assert!(names(&info).contains(&"Sidebar"));
        assert!(names(&info).contains(&"div"));
    }

    #[test]
    fn style_properties_only_in_name_position() {
        let info = complete("", r#"<p style="color: red; ma|"></p>"#).unwrap();
        assert_eq!(names(&info), vec!["margin"]);
        assert!(complete("", r#"<p style="color: r|"></p>"#).is_none());
    }

    #[test]
    fn attributes_in_tag() {
        let info = complete("", "<input |>").unwrap();
        assert!(names(&info).contains(&"placeholder"));
        let info = complete("", "<input ty|>").unwrap();
        assert_eq!(names(&info), vec!["type"]);
    }

    #[test]
    fn nothing_in_plain_text() {
        assert!(complete("", "<p>hello wor|ld</p>").is_none());
    }

    #[test]
    fn details_for_event_and_binding() {
        let (template, cursor) = at_cursor("let total = 0;", "<a @cli|>{{ tot }}</a>");
        let markup = Markup::parse(template.text());
        let event = details(&service(), &template, &markup, cursor, "click").unwrap();
        assert_eq!(event.display, "(event) click");
        assert!(event.documentation.contains("pressed and released"));

        let binding_cursor = template.text().find("tot").unwrap() + 3;
        let binding = details(&service(), &template, &markup, binding_cursor, "total").unwrap();
        assert_eq!(binding.display, "let total");
        assert_eq!(binding.documentation, "Declared on line 1.");
        assert!(details(&service(), &template, &markup, binding_cursor, "nope").is_none());
    }
}
