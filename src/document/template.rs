//! Embedded template regions and their coordinate model.
//!
//! A [`Template`] is one delimited region of a host document. Positions inside
//! it are expressed in two coordinate spaces: global offsets count from the start
//! of the host document, local offsets count from the start of the template
//! body. Local offset 0 is global offset `start`.

use std::fmt;
use std::sync::Arc;

use super::state::Document;

/// One embedded template region of a document.
#[derive(Clone)]
pub struct Template {
    document: Arc<Document>,
    start: usize,
    end: usize,
    tag: String,
    context: Option<String>,
}

impl Template {
    /// Create a template over `start..end` of the document.
    ///
    /// The range is clamped to the document so that `start <= end <= len`
    /// always holds.
    pub fn new(document: Arc<Document>, start: usize, end: usize, tag: impl Into<String>) -> Self {
        let end = end.min(document.len());
        let start = start.min(end);
        Self {
            document,
            start,
            end,
            tag: tag.into(),
            context: None,
        }
    }

    /// Attach the name of the declaration that owns this template.
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn file_name(&self) -> &str {
        self.document.name()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Tag that introduced the template (e.g. `html`).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Name of the owning declaration, if one could be determined.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The template body in local coordinates.
    pub fn text(&self) -> &str {
        &self.document.text()[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the global offset lies in `[start, end)`.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Convert a global offset to a local one.
    ///
    /// Defined for `start <= offset <= end`; anything else would land in another
    /// region's coordinate space and yields `None`.
    pub fn global_to_local(&self, offset: usize) -> Option<usize> {
        (self.start..=self.end)
            .contains(&offset)
            .then(|| offset - self.start)
    }

    /// Convert a local offset to a global one.
    pub fn local_to_global(&self, offset: usize) -> usize {
        offset + self.start
    }

    /// Whether the global range `[start, end)` overlaps this template.
    ///
    /// An empty range is treated as a point and intersects when the point is
    /// inside the template.
    pub fn intersect_with(&self, start: usize, end: usize) -> bool {
        if start >= end {
            return self.contains(start);
        }
        start < self.end && end > self.start
    }

    /// Clamp a global range to this template and convert it to local offsets.
    pub fn local_range(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        let start = start.clamp(self.start, self.end);
        let end = end.clamp(start, self.end);
        (start - self.start)..(end - self.start)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("file_name", &self.file_name())
            .field("version", &self.document.version())
            .field("start", &self.start)
            .field("end", &self.end)
            .field("tag", &self.tag)
            .field("context", &self.context)
            .finish()
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.file_name() == other.file_name()
            && self.document.version() == other.document.version()
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Template {}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str, start: usize, end: usize) -> Template {
        let document = Arc::new(Document::new("file:///view.ts", text.to_string(), 1));
        Template::new(document, start, end, "html")
    }

    #[test]
    fn local_text_is_document_slice() {
        let t = template("x = html`<p></p>`;", 9, 16);
        assert_eq!(t.text(), "<p></p>");
        assert_eq!(t.len(), 7);
    }

    #[test]
    fn offsets_round_trip_inside_template() {
        let t = template("0123456789abcdef", 4, 10);
        for offset in 4..=10 {
            let local = t.global_to_local(offset).unwrap();
            assert_eq!(t.local_to_global(local), offset);
        }
        assert_eq!(t.global_to_local(4), Some(0));
    }

    #[test]
    fn offsets_outside_template_do_not_convert() {
        let t = template("0123456789abcdef", 4, 10);
        assert_eq!(t.global_to_local(3), None);
        assert_eq!(t.global_to_local(11), None);
    }

    #[test]
    fn contains_is_half_open() {
        let t = template("0123456789abcdef", 4, 10);
        assert!(!t.contains(3));
        assert!(t.contains(4));
        assert!(t.contains(9));
        assert!(!t.contains(10));
    }

    #[test]
    fn intersection() {
        let t = template("0123456789abcdef", 4, 10);
        // entirely before, touching the start
        assert!(!t.intersect_with(0, 4));
        assert!(!t.intersect_with(0, 2));
        // at or after the end
        assert!(!t.intersect_with(10, 14));
        assert!(!t.intersect_with(12, 16));
        // partial and full overlap
        assert!(t.intersect_with(0, 5));
        assert!(t.intersect_with(9, 12));
        assert!(t.intersect_with(5, 7));
        assert!(t.intersect_with(0, 16));
        // empty ranges behave like points
        assert!(t.intersect_with(6, 6));
        assert!(!t.intersect_with(10, 10));
    }

    #[test]
    fn local_range_is_clamped() {
        let t = template("0123456789abcdef", 4, 10);
        assert_eq!(t.local_range(0, 16), 0..6);
        assert_eq!(t.local_range(6, 8), 2..4);
        assert_eq!(t.local_range(8, 40), 4..6);
    }

    #[test]
    fn range_is_clamped_to_document() {
        let t = template("abc", 2, 10);
        assert_eq!((t.start(), t.end()), (2, 3));
        let t = template("abc", 9, 10);
        assert_eq!((t.start(), t.end()), (3, 3));
    }
}
