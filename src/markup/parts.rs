//! Scanner for the markup template language.
//!
//! The scan is tolerant: malformed input never fails, it produces parts marked
//! as unterminated so diagnostics can point at them. All offsets are local to
//! the template text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::builtins::{is_void_element, EXPRESSION_KEYWORDS};

/// Identifiers in an expression, `$event` included.
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").unwrap());

/// A piece of template text with its local span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Named {
    pub text: String,
    pub span: Range<usize>,
}

impl Named {
    fn new(source: &str, span: Range<usize>) -> Self {
        Self {
            text: source[span.clone()].to_string(),
            span,
        }
    }

    /// Whether `offset` touches the span, either end included.
    pub fn touches(&self, offset: usize) -> bool {
        self.span.start <= offset && offset <= self.span.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// `name="value"`
    Plain,
    /// `:prop="expr"`
    Binding,
    /// `@event.modifier="handler"`
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub kind: AttributeKind,
    /// Name without its `:`/`@` prefix.
    pub name: Named,
    pub modifiers: Vec<Named>,
    /// Value without quotes.
    pub value: Option<Named>,
}

impl Attribute {
    /// Whether the value holds an expression rather than plain text.
    pub fn has_expression(&self) -> bool {
        self.kind != AttributeKind::Plain
    }
}

/// An opening (or self-closing) tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: Named,
    /// From `<` to after `>`, or to where scanning stopped when unterminated.
    pub span: Range<usize>,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
    pub terminated: bool,
}

impl Element {
    /// Whether this tag opens an element that needs a closing tag.
    pub fn opens_scope(&self) -> bool {
        self.terminated && !self.self_closing && !is_void_element(&self.name.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingTag {
    pub name: Named,
    pub span: Range<usize>,
    pub terminated: bool,
}

/// `{{ expr }}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    pub span: Range<usize>,
    pub expression: Named,
    pub terminated: bool,
}

/// An identifier referenced from an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Range<usize>,
}

/// What the text at an offset is part of.
#[derive(Debug, Clone, Copy)]
pub enum Part<'a> {
    TagName(&'a Element),
    ClosingTagName(&'a ClosingTag),
    AttributeName(&'a Element, &'a Attribute),
    Modifier(&'a Attribute, &'a Named),
    AttributeValue(&'a Element, &'a Attribute, &'a Named),
    /// Inside a tag, between attributes.
    AttributeSlot(&'a Element),
    Interpolation(&'a Interpolation),
}

/// Result of matching opening and closing tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    /// Indices into `elements` and `closings` of matched pairs.
    pub pairs: Vec<(usize, usize)>,
    /// Elements never closed.
    pub unclosed: Vec<usize>,
    /// Closing tags without an opening tag.
    pub unmatched: Vec<usize>,
}

/// Scanned template text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub elements: Vec<Element>,
    pub closings: Vec<ClosingTag>,
    pub interpolations: Vec<Interpolation>,
}

impl Markup {
    pub fn parse(source: &str) -> Self {
        Scanner::new(source).run()
    }

    /// The part under `offset`.
    pub fn part_at(&self, offset: usize) -> Option<Part<'_>> {
        if let Some(interpolation) = self
            .interpolations
            .iter()
            .find(|i| i.expression.touches(offset))
        {
            return Some(Part::Interpolation(interpolation));
        }

        if let Some(closing) = self.closings.iter().find(|c| c.name.touches(offset)) {
            return Some(Part::ClosingTagName(closing));
        }

        let element = self.elements.iter().find(|e| {
            let inside_end = if e.terminated {
                offset < e.span.end
            } else {
                offset <= e.span.end
            };
            e.span.start < offset && inside_end
        })?;

        if element.name.touches(offset) {
            return Some(Part::TagName(element));
        }
        for attribute in &element.attributes {
            if attribute.name.touches(offset) {
                return Some(Part::AttributeName(element, attribute));
            }
            if let Some(modifier) = attribute.modifiers.iter().find(|m| m.touches(offset)) {
                return Some(Part::Modifier(attribute, modifier));
            }
            if let Some(value) = attribute.value.as_ref().filter(|v| v.touches(offset)) {
                return Some(Part::AttributeValue(element, attribute, value));
            }
        }
        Some(Part::AttributeSlot(element))
    }

    /// Every expression in the template: interpolations, then attribute values
    /// of bindings and events, in source order within each group.
    pub fn expressions(&self) -> impl Iterator<Item = &Named> {
        let interpolations = self.interpolations.iter().map(|i| &i.expression);
        let values = self
            .elements
            .iter()
            .flat_map(|e| e.attributes.iter())
            .filter(|a| a.has_expression())
            .filter_map(|a| a.value.as_ref());
        interpolations.chain(values)
    }

    /// Identifiers referenced by every expression, ascending by offset.
    pub fn identifiers(&self) -> Vec<Identifier> {
        let mut identifiers: Vec<Identifier> =
            self.expressions().flat_map(expression_identifiers).collect();
        identifiers.sort_by_key(|i| i.span.start);
        identifiers
    }

    /// The identifier whose span touches `offset`.
    pub fn identifier_at(&self, offset: usize) -> Option<Identifier> {
        self.expressions()
            .filter(|e| e.touches(offset))
            .flat_map(expression_identifiers)
            .find(|i| i.span.start <= offset && offset <= i.span.end)
    }

    /// Match opening and closing tags in source order.
    ///
    /// A closing tag closes the innermost open element with the same name
    /// (ignoring case); any elements opened after it are left unclosed.
    pub fn structure(&self) -> Structure {
        let mut structure = Structure::default();
        let mut stack: Vec<usize> = Vec::new();
        let mut next_element = 0;

        for (closing_index, closing) in self.closings.iter().enumerate() {
            while next_element < self.elements.len()
                && self.elements[next_element].span.start < closing.span.start
            {
                if self.elements[next_element].opens_scope() {
                    stack.push(next_element);
                }
                next_element += 1;
            }

            let name = &closing.name.text;
            match stack
                .iter()
                .rposition(|&e| self.elements[e].name.text.eq_ignore_ascii_case(name))
            {
                Some(depth) => {
                    structure.unclosed.extend(stack.drain(depth + 1..));
                    if let Some(open) = stack.pop() {
                        structure.pairs.push((open, closing_index));
                    }
                }
                None => structure.unmatched.push(closing_index),
            }
        }

        structure.unclosed.extend(stack);
        structure.unclosed.extend(
            self.elements[next_element..]
                .iter()
                .enumerate()
                .filter(|(_, e)| e.opens_scope())
                .map(|(i, _)| next_element + i),
        );
        structure.unclosed.sort_unstable();
        structure
    }
}

/// Root identifiers of one expression.
///
/// Member names (`user.name` yields only `user`), keywords and anything inside
/// string literals are left out.
pub fn expression_identifiers(expression: &Named) -> Vec<Identifier> {
    let text = expression.text.as_str();
    let strings = string_ranges(text);

    IDENTIFIER_PATTERN
        .find_iter(text)
        .filter(|m| !strings.iter().any(|r| r.contains(&m.start())))
        .filter(|m| !text[..m.start()].trim_end().ends_with('.'))
        .filter(|m| !EXPRESSION_KEYWORDS.contains(&m.as_str()))
        .map(|m| Identifier {
            name: m.as_str().to_string(),
            span: expression.span.start + m.start()..expression.span.start + m.end(),
        })
        .collect()
}

/// Quoted literals in an expression, quotes included.
fn string_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let quote = bytes[pos];
        if matches!(quote, b'\'' | b'"' | b'`') {
            let start = pos;
            pos += 1;
            while pos < bytes.len() && bytes[pos] != quote {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            pos = (pos + 1).min(bytes.len());
            ranges.push(start..pos);
        } else {
            pos += 1;
        }
    }
    ranges
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_tag_name_byte(b: u8) -> bool {
    is_name_byte(b) || b == b'.' || b == b':'
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    markup: Markup,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            markup: Markup::default(),
        }
    }

    fn run(mut self) -> Markup {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos..].starts_with(b"{{") {
                self.interpolation();
            } else if self.bytes[self.pos] == b'<' {
                match self.peek(1) {
                    Some(b'/') => self.closing_tag(),
                    Some(b) if b.is_ascii_alphabetic() => self.opening_tag(),
                    _ => self.pos += 1,
                }
            } else {
                self.pos += 1;
            }
        }
        self.markup
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> Range<usize> {
        let start = self.pos;
        while self.pos < self.bytes.len() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
        start..self.pos
    }

    fn skip_whitespace(&mut self) {
        self.take_while(|b| b.is_ascii_whitespace());
    }

    fn interpolation(&mut self) {
        let start = self.pos;
        let body_start = start + 2;
        let (body_end, end, terminated) = match self.bytes[body_start..]
            .windows(2)
            .position(|pair| pair == b"}}")
        {
            Some(found) => (body_start + found, body_start + found + 2, true),
            None => (self.bytes.len(), self.bytes.len(), false),
        };
        self.markup.interpolations.push(Interpolation {
            span: start..end,
            expression: Named::new(self.source, body_start..body_end),
            terminated,
        });
        self.pos = end;
    }

    fn closing_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name = self.take_while(is_tag_name_byte);
        self.skip_whitespace();
        let terminated = self.peek(0) == Some(b'>');
        if terminated {
            self.pos += 1;
        }
        self.markup.closings.push(ClosingTag {
            name: Named::new(self.source, name),
            span: start..self.pos,
            terminated,
        });
    }

    fn opening_tag(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let name = self.take_while(is_tag_name_byte);
        let mut attributes = Vec::new();
        let mut self_closing = false;
        let mut terminated = false;

        loop {
            self.skip_whitespace();
            match self.peek(0) {
                None | Some(b'<') => break,
                Some(b'>') => {
                    self.pos += 1;
                    terminated = true;
                    break;
                }
                Some(b'/') if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    self_closing = true;
                    terminated = true;
                    break;
                }
                Some(_) => match self.attribute() {
                    Some(attribute) => attributes.push(attribute),
                    None => self.pos += 1,
                },
            }
        }

        self.markup.elements.push(Element {
            name: Named::new(self.source, name),
            span: start..self.pos,
            attributes,
            self_closing,
            terminated,
        });
    }

    /// One attribute at the current position; `None` on a stray character.
    fn attribute(&mut self) -> Option<Attribute> {
        let kind = match self.peek(0) {
            Some(b':') => AttributeKind::Binding,
            Some(b'@') => AttributeKind::Event,
            _ => AttributeKind::Plain,
        };
        if kind != AttributeKind::Plain {
            self.pos += 1;
        }

        let name = match kind {
            AttributeKind::Event => self.take_while(is_name_byte),
            _ => self.take_while(|b| is_name_byte(b) || b == b'.' || b == b':'),
        };
        if name.is_empty() && kind == AttributeKind::Plain {
            return None;
        }

        let mut modifiers = Vec::new();
        if kind == AttributeKind::Event {
            while self.peek(0) == Some(b'.') {
                self.pos += 1;
                let modifier = self.take_while(is_name_byte);
                modifiers.push(Named::new(self.source, modifier));
            }
        }

        let before_value = self.pos;
        self.skip_whitespace();
        let value = if self.peek(0) == Some(b'=') {
            self.pos += 1;
            self.skip_whitespace();
            Some(self.attribute_value())
        } else {
            self.pos = before_value;
            None
        };

        Some(Attribute {
            kind,
            name: Named::new(self.source, name),
            modifiers,
            value,
        })
    }

    fn attribute_value(&mut self) -> Named {
        match self.peek(0) {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let value = self.take_while(|b| b != quote);
                if self.peek(0) == Some(quote) {
                    self.pos += 1;
                }
                Named::new(self.source, value)
            }
            _ => {
                let value = self.take_while(|b| !b.is_ascii_whitespace() && b != b'>' && b != b'<');
                Named::new(self.source, value)
            }
        }
    }
}
