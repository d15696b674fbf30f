//! Baseline host service for script documents.
//!
//! A lightweight, pattern-based analysis of the script around templates:
//! keywords and declarations for completion, declaration lookup for
//! navigation, bracket balance for diagnostics, outlining and indentation, and
//! trailing whitespace cleanup. It never looks inside string or template
//! literals, which is what lets template-aware results be merged alongside.

use std::sync::Arc;

use crate::document::lexical::{is_inside, scan_lexical, LexicalKind, LexicalRange};
use crate::document::{Document, DocumentStore};
use crate::error::{ServiceError, ServiceResult};
use crate::markup::{Declaration, DeclarationIndex, ScriptDeclarations};
use crate::service::LanguageService;
use crate::types::*;

const SOURCE: &str = "script";

/// Codes of the diagnostics this service reports.
pub mod codes {
    pub const UNTERMINATED_STRING: u32 = 1002;
    pub const UNTERMINATED_TEMPLATE: u32 = 1160;
    pub const UNTERMINATED_COMMENT: u32 = 1010;
    pub const UNCLOSED_BRACKET: u32 = 1005;
    pub const UNEXPECTED_BRACKET: u32 = 1128;
}

const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "class", "const", "continue", "default", "else", "export",
    "extends", "false", "for", "function", "if", "import", "let", "new", "null", "return",
    "switch", "this", "true", "try", "typeof", "undefined", "var", "while",
];

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn closer_of(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

/// Bracket structure of the code outside comments and literals.
#[derive(Debug, Default)]
struct Brackets {
    pairs: Vec<(usize, usize)>,
    unclosed: Vec<usize>,
    unexpected: Vec<usize>,
}

impl Brackets {
    fn scan(source: &str, lexical: &[LexicalRange]) -> Self {
        let mut brackets = Brackets::default();
        let mut stack: Vec<usize> = Vec::new();
        let bytes = source.as_bytes();

        for (pos, &b) in bytes.iter().enumerate() {
            if !matches!(b, b'(' | b'[' | b'{' | b')' | b']' | b'}') || is_inside(pos, lexical) {
                continue;
            }
            if matches!(b, b'(' | b'[' | b'{') {
                stack.push(pos);
                continue;
            }
            match stack.iter().rposition(|&open| closer_of(bytes[open]) == b) {
                Some(depth) => {
                    brackets.unclosed.extend(stack.drain(depth + 1..));
                    if let Some(open) = stack.pop() {
                        brackets.pairs.push((open, pos));
                    }
                }
                None => brackets.unexpected.push(pos),
            }
        }

        brackets.unclosed.extend(stack);
        brackets.unclosed.sort_unstable();
        brackets
    }
}

/// Host service over the documents in a [`DocumentStore`].
pub struct BaselineService {
    documents: Arc<DocumentStore>,
    declarations: Arc<dyn DeclarationIndex>,
}

impl BaselineService {
    pub fn new(documents: Arc<DocumentStore>) -> Self {
        Self {
            documents,
            declarations: Arc::new(ScriptDeclarations),
        }
    }

    fn document(&self, file_name: &str) -> ServiceResult<Arc<Document>> {
        self.documents
            .get(file_name)
            .ok_or_else(|| ServiceError::UnknownDocument(file_name.to_string()))
    }

    /// The document, with `position` checked against its length.
    fn document_at(&self, file_name: &str, position: usize) -> ServiceResult<Arc<Document>> {
        let document = self.document(file_name)?;
        if position > document.len() {
            return Err(ServiceError::OffsetOutOfRange {
                file_name: file_name.to_string(),
                offset: position,
                length: document.len(),
            });
        }
        if !document.text().is_char_boundary(position) {
            return Err(ServiceError::InsideCharacter {
                file_name: file_name.to_string(),
                offset: position,
            });
        }
        Ok(document)
    }

    /// The identifier around `position` in code (not in comments or literals).
    fn identifier_at(document: &Document, position: usize) -> Option<(String, TextSpan)> {
        let source = document.text();
        let bytes = source.as_bytes();
        if is_inside(position, &scan_lexical(source)) {
            return None;
        }
        let start = position - bytes[..position].iter().rev().take_while(|b| is_identifier_byte(**b)).count();
        let end = position + bytes[position..].iter().take_while(|b| is_identifier_byte(**b)).count();
        if start == end || bytes[start].is_ascii_digit() {
            return None;
        }
        Some((source[start..end].to_string(), TextSpan::from_bounds(start, end)))
    }

    fn definitions(&self, document: &Document, name: &str) -> Vec<DefinitionInfo> {
        self.declarations
            .resolve(document, name)
            .into_iter()
            .map(|declaration: Declaration| DefinitionInfo {
                file_name: document.name().to_string(),
                text_span: declaration.span,
                kind: declaration.kind,
                name: declaration.name,
                container_name: None,
                context_span: Some(declaration.context_span),
            })
            .collect()
    }

    /// Parameters of a declared function, from its declaration's parameter list.
    fn parameters_of(&self, document: &Document, function: &Declaration) -> Vec<String> {
        let source = document.text();
        let Some(open) = source[function.span.end()..].find('(').map(|i| function.span.end() + i) else {
            return Vec::new();
        };
        let close = source[open..].find(')').map_or(source.len(), |i| open + i);
        self.declarations
            .declarations(document)
            .into_iter()
            .filter(|d| d.keyword == "parameter" && d.span.start > open && d.span.start < close)
            .map(|d| d.name)
            .collect()
    }
}

fn diagnostic(document: &Document, span: TextSpan, code: u32, message: &str) -> Diagnostic {
    Diagnostic {
        file_name: Some(document.name().to_string()),
        start: Some(span.start),
        length: Some(span.length),
        message_text: message.to_string(),
        category: DiagnosticCategory::Error,
        code,
        source: Some(SOURCE.to_string()),
        related_information: None,
    }
}

impl LanguageService for BaselineService {
    fn get_completions_at_position(
        &self,
        file_name: &str,
        position: usize,
        _options: &CompletionOptions,
    ) -> ServiceResult<Option<CompletionInfo>> {
        let document = self.document_at(file_name, position)?;
        let source = document.text();
        if is_inside(position, &scan_lexical(source)) {
            return Ok(None);
        }

        let bytes = source.as_bytes();
        let start = position - bytes[..position].iter().rev().take_while(|b| is_identifier_byte(**b)).count();
        if source[..start].trim_end().ends_with('.') {
            return Ok(None);
        }
        let typed = &source[start..position];
        let span = TextSpan::from_bounds(start, position);

        let mut entries: Vec<CompletionEntry> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for declaration in self.declarations.declarations(&document) {
            if seen.insert(declaration.name.clone()) {
                entries.push(CompletionEntry {
                    name: declaration.name,
                    kind: declaration.kind,
                    sort_text: "0".to_string(),
                    insert_text: None,
                    replacement_span: Some(span),
                });
            }
        }
        entries.extend(KEYWORDS.iter().map(|keyword| CompletionEntry {
            name: keyword.to_string(),
            kind: ElementKind::Keyword,
            sort_text: "1".to_string(),
            insert_text: None,
            replacement_span: Some(span),
        }));
        entries.retain(|e| e.name.starts_with(typed));

        Ok(Some(CompletionInfo {
            is_global_completion: true,
            is_member_completion: false,
            is_new_identifier_location: false,
            optional_replacement_span: Some(span),
            entries,
        }))
    }

    fn get_quick_info_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<QuickInfo>> {
        let document = self.document_at(file_name, position)?;
        let Some((name, span)) = Self::identifier_at(&document, position) else {
            return Ok(None);
        };

        if KEYWORDS.contains(&name.as_str()) {
            return Ok(Some(QuickInfo {
                kind: ElementKind::Keyword,
                text_span: span,
                display: format!("(keyword) {name}"),
                documentation: String::new(),
            }));
        }

        Ok(self
            .declarations
            .resolve(&document, &name)
            .into_iter()
            .next()
            .map(|declaration| QuickInfo {
                kind: declaration.kind,
                text_span: span,
                display: declaration.display(),
                documentation: String::new(),
            }))
    }

    fn get_definition_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<Vec<DefinitionInfo>>> {
        let document = self.document_at(file_name, position)?;
        let Some((name, _)) = Self::identifier_at(&document, position) else {
            return Ok(None);
        };
        let definitions = self.definitions(&document, &name);
        Ok((!definitions.is_empty()).then_some(definitions))
    }

    fn get_definition_and_bound_span(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<DefinitionInfoAndBoundSpan>> {
        let document = self.document_at(file_name, position)?;
        let Some((name, span)) = Self::identifier_at(&document, position) else {
            return Ok(None);
        };
        let definitions = self.definitions(&document, &name);
        if definitions.is_empty() {
            return Ok(None);
        }
        Ok(Some(DefinitionInfoAndBoundSpan {
            definitions: Some(definitions),
            text_span: span,
        }))
    }

    fn get_syntactic_diagnostics(&self, file_name: &str) -> ServiceResult<Vec<Diagnostic>> {
        let document = self.document(file_name)?;
        let source = document.text();
        let lexical = scan_lexical(source);
        let mut diagnostics = Vec::new();

        for range in lexical.iter().filter(|r| !r.terminated) {
            let (code, message) = match range.kind {
                LexicalKind::String => (codes::UNTERMINATED_STRING, "Unterminated string literal."),
                LexicalKind::Template => (codes::UNTERMINATED_TEMPLATE, "Unterminated template literal."),
                LexicalKind::BlockComment => (codes::UNTERMINATED_COMMENT, "'*/' expected."),
                LexicalKind::LineComment => continue,
            };
            let span = TextSpan::new(range.range.start, 1);
            diagnostics.push(diagnostic(&document, span, code, message));
        }

        let brackets = Brackets::scan(source, &lexical);
        let bytes = source.as_bytes();
        for &open in &brackets.unclosed {
            let message = format!("'{}' expected.", closer_of(bytes[open]) as char);
            diagnostics.push(diagnostic(&document, TextSpan::new(open, 1), codes::UNCLOSED_BRACKET, &message));
        }
        for &close in &brackets.unexpected {
            let message = format!("Unexpected '{}'.", bytes[close] as char);
            diagnostics.push(diagnostic(&document, TextSpan::new(close, 1), codes::UNEXPECTED_BRACKET, &message));
        }

        diagnostics.sort_by_key(|d| (d.start, d.code));
        Ok(diagnostics)
    }

    fn get_semantic_diagnostics(&self, file_name: &str) -> ServiceResult<Vec<Diagnostic>> {
        self.document(file_name)?;
        Ok(Vec::new())
    }

    fn get_formatting_edits_for_range(
        &self,
        file_name: &str,
        start: usize,
        end: usize,
        _settings: &FormatCodeSettings,
    ) -> ServiceResult<Vec<TextChange>> {
        let document = self.document(file_name)?;
        let source = document.text();
        let literals: Vec<LexicalRange> = scan_lexical(source)
            .into_iter()
            .filter(|r| matches!(r.kind, LexicalKind::String | LexicalKind::Template))
            .collect();

        let mut edits = Vec::new();
        let mut line_start = 0;
        for line in source.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            let trimmed = content.trim_end_matches([' ', '\t']);
            let whitespace = line_start + trimmed.len()..line_start + content.len();
            line_start += line.len();

            if whitespace.is_empty() || is_inside(whitespace.start, &literals) {
                continue;
            }
            if whitespace.start < end.max(start + 1) && whitespace.end > start {
                edits.push(TextChange::new(whitespace.into(), ""));
            }
        }
        Ok(edits)
    }

    fn get_signature_help_items(
        &self,
        file_name: &str,
        position: usize,
        _options: &SignatureHelpOptions,
    ) -> ServiceResult<Option<SignatureHelpItems>> {
        let document = self.document_at(file_name, position)?;
        let prefix = &document.text()[..position];
        let lexical = scan_lexical(prefix);
        if is_inside(position, &lexical) {
            return Ok(None);
        }

        let bytes = prefix.as_bytes();
        let brackets = Brackets::scan(prefix, &lexical);
        let Some(&open) = brackets.unclosed.last().filter(|&&open| bytes[open] == b'(') else {
            return Ok(None);
        };
        let callee = prefix[..open].trim_end();
        let name_len = callee.bytes().rev().take_while(|b| is_identifier_byte(*b)).count();
        let name = &callee[callee.len() - name_len..];
        if name.is_empty() || KEYWORDS.contains(&name) {
            return Ok(None);
        }

        let Some(function) = self
            .declarations
            .resolve(&document, name)
            .into_iter()
            .find(|d| d.kind == ElementKind::Function)
        else {
            return Ok(None);
        };

        let mut depth = 0usize;
        let mut argument_index = 0;
        for (pos, &b) in bytes.iter().enumerate().skip(open + 1) {
            if is_inside(pos, &lexical) {
                continue;
            }
            match b {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => argument_index += 1,
                _ => {}
            }
        }

        let parameters: Vec<SignatureHelpParameter> = self
            .parameters_of(&document, &function)
            .into_iter()
            .map(|name| SignatureHelpParameter {
                name,
                documentation: String::new(),
                is_optional: false,
            })
            .collect();
        let argument_count = parameters.len().max(argument_index + 1);

        Ok(Some(SignatureHelpItems {
            items: vec![SignatureHelpItem {
                prefix: format!("{name}("),
                suffix: ")".to_string(),
                separator: ", ".to_string(),
                parameters,
                documentation: String::new(),
            }],
            applicable_span: TextSpan::from_bounds(open + 1, position),
            selected_item_index: 0,
            argument_index,
            argument_count,
        }))
    }

    fn get_outlining_spans(&self, file_name: &str) -> ServiceResult<Vec<OutliningSpan>> {
        let document = self.document(file_name)?;
        let source = document.text();
        let lexical = scan_lexical(source);
        let mut spans = Vec::new();

        for range in lexical.iter().filter(|r| r.kind == LexicalKind::BlockComment) {
            if source[range.range.clone()].contains('\n') {
                let span = TextSpan::from(range.range.clone());
                spans.push(OutliningSpan {
                    text_span: span,
                    hint_span: span,
                    banner_text: "/* ... */".to_string(),
                    auto_collapse: false,
                    kind: OutliningSpanKind::Comment,
                });
            }
        }

        let bytes = source.as_bytes();
        for (open, close) in Brackets::scan(source, &lexical).pairs {
            if bytes[open] != b'{' || !source[open..close].contains('\n') {
                continue;
            }
            spans.push(OutliningSpan {
                text_span: TextSpan::from_bounds(open, close + 1),
                hint_span: TextSpan::from_bounds(open, close + 1),
                banner_text: "{...}".to_string(),
                auto_collapse: false,
                kind: OutliningSpanKind::Code,
            });
        }

        spans.sort_by_key(|s| s.text_span.start);
        Ok(spans)
    }

    fn get_references_at_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Option<Vec<ReferenceEntry>>> {
        let document = self.document_at(file_name, position)?;
        let Some((name, _)) = Self::identifier_at(&document, position) else {
            return Ok(None);
        };
        let source = document.text();
        let bytes = source.as_bytes();
        let lexical = scan_lexical(source);
        let declared: Vec<usize> = self
            .declarations
            .resolve(&document, &name)
            .iter()
            .map(|d| d.span.start)
            .collect();

        let references = source
            .match_indices(name.as_str())
            .map(|(start, _)| start)
            .filter(|&start| {
                let end = start + name.len();
                let before_ok = start == 0 || !is_identifier_byte(bytes[start - 1]);
                let after_ok = end == bytes.len() || !is_identifier_byte(bytes[end]);
                before_ok && after_ok && !is_inside(start, &lexical)
            })
            .map(|start| ReferenceEntry {
                file_name: file_name.to_string(),
                text_span: TextSpan::new(start, name.len()),
                is_write_access: declared.contains(&start),
                is_definition: declared.contains(&start),
            })
            .collect();
        Ok(Some(references))
    }

    fn get_brace_matching_position(
        &self,
        file_name: &str,
        position: usize,
    ) -> ServiceResult<Vec<TextSpan>> {
        let document = self.document_at(file_name, position)?;
        let source = document.text();
        let pairs = Brackets::scan(source, &scan_lexical(source)).pairs;

        let hit = |offset: usize| {
            pairs
                .iter()
                .find(|(open, close)| *open == offset || *close == offset)
                .map(|(open, close)| vec![TextSpan::new(*open, 1), TextSpan::new(*close, 1)])
        };
        Ok(hit(position)
            .or_else(|| position.checked_sub(1).and_then(&hit))
            .unwrap_or_default())
    }

    fn get_indentation_at_position(
        &self,
        file_name: &str,
        position: usize,
        settings: &FormatCodeSettings,
    ) -> ServiceResult<usize> {
        let document = self.document_at(file_name, position)?;
        let source = &document.text()[..position];
        let brackets = Brackets::scan(source, &scan_lexical(source));
        Ok(brackets.unclosed.len() * settings.indent_size as usize)
    }
}
