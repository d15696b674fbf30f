use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tracing::trace;

use crate::document::{Document, Template};

use super::TemplateLocator;

#[derive(Debug)]
struct CachedTemplates {
    version: i32,
    document: Weak<Document>,
    templates: Arc<[Template]>,
}

/// Caches another locator's results per document version.
///
/// An entry is only reused for the same document snapshot: the version must be
/// unchanged and the document must be the one the entry was computed from. A
/// reopen under the same version recomputes.
#[derive(Debug)]
pub struct CachedLocator<L> {
    inner: L,
    entries: DashMap<String, CachedTemplates>,
}

impl<L: TemplateLocator> CachedLocator<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
        }
    }

    /// Drop the cached templates of a closed document.
    pub fn forget(&self, name: &str) {
        self.entries.remove(name);
    }

    fn cached(&self, document: &Arc<Document>) -> Option<Arc<[Template]>> {
        let entry = self.entries.get(document.name())?;
        let same = entry.version == document.version()
            && entry
                .document
                .upgrade()
                .is_some_and(|cached| Arc::ptr_eq(&cached, document));
        same.then(|| Arc::clone(&entry.templates))
    }
}

impl<L: TemplateLocator> TemplateLocator for CachedLocator<L> {
    fn find_all_templates(&self, document: &Arc<Document>) -> Arc<[Template]> {
        if let Some(templates) = self.cached(document) {
            return templates;
        }

        let templates = self.inner.find_all_templates(document);
        trace!(
            document = document.name(),
            version = document.version(),
            count = templates.len(),
            "located templates"
        );
        self.entries.insert(
            document.name().to_string(),
            CachedTemplates {
                version: document.version(),
                document: Arc::downgrade(document),
                templates: Arc::clone(&templates),
            },
        );
        templates
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::locator::TaggedTemplateLocator;

    /// Counts how often the wrapped locator actually runs.
    struct Counting {
        inner: TaggedTemplateLocator,
        calls: AtomicUsize,
    }

    impl TemplateLocator for Counting {
        fn find_all_templates(&self, document: &Arc<Document>) -> Arc<[Template]> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all_templates(document)
        }
    }

    fn counting() -> CachedLocator<Counting> {
        CachedLocator::new(Counting {
            inner: TaggedTemplateLocator::default(),
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn same_version_is_served_from_cache() {
        let locator = counting();
        let document = Arc::new(Document::new("file:///a.ts", "html`<p></p>`".into(), 1));

        assert_eq!(locator.find_all_templates(&document).len(), 1);
        assert_eq!(locator.find_all_templates(&document).len(), 1);
        assert!(locator.find_template_at(&document, 6).is_some());
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_version_invalidates() {
        let locator = counting();
        let v1 = Arc::new(Document::new("file:///a.ts", "html`<p></p>`".into(), 1));
        let v2 = Arc::new(Document::new(
            "file:///a.ts",
            "html`<p></p>`; html`<b></b>`".into(),
            2,
        ));

        assert_eq!(locator.find_all_templates(&v1).len(), 1);
        assert_eq!(locator.find_all_templates(&v2).len(), 2);
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn reopen_with_same_version_recomputes() {
        let locator = counting();
        let first = Arc::new(Document::new("file:///a.ts", "html`<p></p>`".into(), 1));
        let reopened = Arc::new(Document::new(
            "file:///a.ts",
            "let x = 1; html`<b></b>`".into(),
            1,
        ));

        assert_eq!(locator.find_all_templates(&first)[0].start(), 5);
        let templates = locator.find_all_templates(&reopened);
        assert_eq!(templates[0].start(), 16);
        assert_eq!(templates[0].text(), "<b></b>");
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn forget_drops_entry() {
        let locator = counting();
        let document = Arc::new(Document::new("file:///a.ts", "html`<p></p>`".into(), 1));

        locator.find_all_templates(&document);
        locator.forget("file:///a.ts");
        locator.find_all_templates(&document);
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 2);
    }
}
