//! Open document storage.

use std::sync::Arc;

use dashmap::DashMap;

use super::text::LineIndex;

/// One version of a host document.
///
/// Documents are immutable snapshots: an edit replaces the whole value in the
/// [`DocumentStore`], so anything holding an `Arc<Document>` keeps seeing the
/// version it started with.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    version: i32,
    line_index: LineIndex,
}

impl Document {
    pub fn new(name: impl Into<String>, text: String, version: i32) -> Self {
        Self {
            name: name.into(),
            version,
            line_index: LineIndex::new(text),
        }
    }

    /// Stable document name (the client URI).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        self.line_index.source()
    }

    pub fn len(&self) -> usize {
        self.text().len()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}

/// Thread-safe storage for open documents, keyed by name.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<String, Arc<Document>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open or replace a document, returning the stored snapshot.
    pub fn open(&self, name: impl Into<String>, text: String, version: i32) -> Arc<Document> {
        let document = Arc::new(Document::new(name, text, version));
        self.documents
            .insert(document.name().to_string(), Arc::clone(&document));
        document
    }

    pub fn close(&self, name: &str) {
        self.documents.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<Arc<Document>> {
        self.documents.get(name).map(|r| Arc::clone(&r))
    }
}
