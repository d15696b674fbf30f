//! Lexical scan of host source text.
//!
//! Finds the comment and literal ranges of a script-like host document so that
//! callers can tell real code apart from text that only looks like code. Template
//! literals are reported as single opaque ranges; their `${ ... }` substitutions
//! are skipped with brace counting.

use std::ops::Range;

/// What kind of opaque region a [`LexicalRange`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalKind {
    LineComment,
    BlockComment,
    /// Single or double quoted string.
    String,
    /// Backtick template literal.
    Template,
}

/// A comment or literal, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalRange {
    pub kind: LexicalKind,
    pub range: Range<usize>,
    /// False when the input ended before the closing delimiter.
    pub terminated: bool,
}

impl LexicalRange {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, LexicalKind::LineComment | LexicalKind::BlockComment)
    }
}

/// Scan the whole source, returning comment and literal ranges in ascending order.
pub fn scan_lexical(source: &str) -> Vec<LexicalRange> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        match bytes[pos] {
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos += 2;
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1;
                }
                ranges.push(LexicalRange {
                    kind: LexicalKind::LineComment,
                    range: start..pos,
                    terminated: true,
                });
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                let mut terminated = false;
                while pos < bytes.len() {
                    if bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/') {
                        pos += 2;
                        terminated = true;
                        break;
                    }
                    pos += 1;
                }
                ranges.push(LexicalRange {
                    kind: LexicalKind::BlockComment,
                    range: start..pos.min(bytes.len()),
                    terminated,
                });
            }
            quote @ (b'"' | b'\'') => {
                let (end, terminated) = skip_quoted(bytes, pos + 1, quote);
                pos = end;
                ranges.push(LexicalRange {
                    kind: LexicalKind::String,
                    range: start..end,
                    terminated,
                });
            }
            b'`' => {
                let (end, terminated) = skip_template(bytes, pos + 1);
                pos = end;
                ranges.push(LexicalRange {
                    kind: LexicalKind::Template,
                    range: start..end,
                    terminated,
                });
            }
            _ => pos += 1,
        }
    }

    ranges
}

/// Skip a quoted string body. Returns the offset after the closing quote.
/// Strings do not span lines; a newline ends an unterminated string.
fn skip_quoted(bytes: &[u8], mut pos: usize, quote: u8) -> (usize, bool) {
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return (pos, false),
            c if c == quote => return (pos + 1, true),
            _ => pos += 1,
        }
    }
    (bytes.len(), false)
}

/// Skip a template literal body. Returns the offset after the closing backtick.
fn skip_template(bytes: &[u8], mut pos: usize) -> (usize, bool) {
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'`' => return (pos + 1, true),
            b'$' if bytes.get(pos + 1) == Some(&b'{') => {
                pos = skip_substitution(bytes, pos + 2);
            }
            _ => pos += 1,
        }
    }
    (bytes.len(), false)
}

/// Skip a `${ ... }` substitution body, returning the offset after its `}`.
fn skip_substitution(bytes: &[u8], mut pos: usize) -> usize {
    let mut depth = 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return pos + 1;
                }
            }
            quote @ (b'"' | b'\'') => {
                pos = skip_quoted(bytes, pos + 1, quote).0;
                continue;
            }
            b'`' => {
                pos = skip_template(bytes, pos + 1).0;
                continue;
            }
            _ => {}
        }
        pos += 1;
    }
    bytes.len()
}

/// Whether `offset` falls inside any of the given ranges.
pub fn is_inside(offset: usize, ranges: &[LexicalRange]) -> bool {
    ranges.iter().any(|r| r.range.contains(&offset))
}
