//! In-memory document index for retrieval over deck text.
//!
//! Plain keyword matching, no ranking: callers get every document whose
//! text contains the query, in the order the documents were added.

use crate::types::DeckDocument;
use std::collections::HashMap;

/// Insertion-ordered store of indexable deck documents.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    documents: Vec<DeckDocument>,
    by_id: HashMap<String, usize>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document. Re-adding an id replaces the stored text but keeps
    /// the document's original position.
    pub fn add(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.add_document(DeckDocument {
            id: id.into(),
            text: text.into(),
        });
    }

    pub fn add_document(&mut self, document: DeckDocument) {
        match self.by_id.get(&document.id) {
            Some(&slot) => self.documents[slot] = document,
            None => {
                self.by_id
                    .insert(document.id.clone(), self.documents.len());
                self.documents.push(document);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&DeckDocument> {
        self.by_id.get(id).map(|&slot| &self.documents[slot])
    }

    /// Case-insensitive substring search over document text. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<&DeckDocument> {
        let needle = query.to_lowercase();
        self.documents
            .iter()
            .filter(|doc| doc.text.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
