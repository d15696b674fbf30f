//! Template discovery.
//!
//! A [`TemplateLocator`] finds the embedded template regions of a document. The
//! regions it returns are disjoint and sorted by start offset, which makes the
//! lookup at a single offset a binary search.

mod cache;
mod tagged;

use std::sync::Arc;

use crate::document::{Document, Template};

pub use cache::CachedLocator;
pub use tagged::TaggedTemplateLocator;

/// Finds the templates embedded in a document.
///
/// Implementations never fail: a document without templates, or with template
/// text too malformed to delimit, yields an empty result.
pub trait TemplateLocator: Send + Sync {
    /// All templates of the document, ascending by start, pairwise disjoint.
    fn find_all_templates(&self, document: &Arc<Document>) -> Arc<[Template]>;

    /// The template whose `[start, end)` contains the global offset.
    fn find_template_at(&self, document: &Arc<Document>, offset: usize) -> Option<Template> {
        let templates = self.find_all_templates(document);
        let index = templates.partition_point(|t| t.end() <= offset);
        templates
            .get(index)
            .filter(|t| t.contains(offset))
            .cloned()
    }
}
