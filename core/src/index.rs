use crate::error::IndexError;
use crate::tokenizer::tokenize;
use std::collections::HashMap;

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<String>) -> Self {
        Self { id, text: text.into() }
    }
}

/// How often a term occurs in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub doc_id: DocId,
    pub frequency: u32,
}

/// In-memory store of the indexed documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: HashMap<DocId, Document>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, id: DocId) -> Option<&Document> { self.docs.get(&id) }

    pub fn contains(&self, id: DocId) -> bool { self.docs.contains_key(&id) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    /// Store a document, replacing any previous one with the same id.
    pub fn add(&mut self, document: Document) -> &Document {
        let id = document.id;
        self.docs.insert(id, document);
        &self.docs[&id]
    }

    pub fn remove(&mut self, id: DocId) -> Option<Document> { self.docs.remove(&id) }

    pub fn iter(&self) -> impl Iterator<Item = &Document> { self.docs.values() }
}

/// Inverted index from term to the documents it appears in.
///
/// Posting lists keep document indexing order. Each document contributes at
/// most one [`Appearance`] per term, and every referenced document lives in
/// the owned [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Appearance>>,
    docs: DocumentStore,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Tokenize a document, append its appearances and store it.
    pub fn index_document(&mut self, document: Document) -> Result<&Document, IndexError> {
        if self.docs.contains(document.id) {
            return Err(IndexError::DuplicateDocument(document.id));
        }

        // Count the whole document before touching the table so its postings land together.
        let mut counts: Vec<(String, u32)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for term in tokenize(&document.text) {
            match slots.get(&term) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(term.clone(), counts.len());
                    counts.push((term, 1));
                }
            }
        }

        for (term, frequency) in counts {
            self.postings
                .entry(term)
                .or_default()
                .push(Appearance { doc_id: document.id, frequency });
        }

        tracing::trace!(doc_id = document.id, terms = slots.len(), "indexed document");
        Ok(self.docs.add(document))
    }

    /// Posting list for a term, empty when the term was never indexed.
    pub fn lookup(&self, term: &str) -> &[Appearance] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove a document and every appearance that points at it.
    pub fn evict(&mut self, id: DocId) -> Option<Document> {
        let document = self.docs.remove(id)?;
        self.postings.retain(|_, list| {
            list.retain(|a| a.doc_id != id);
            !list.is_empty()
        });
        Some(document)
    }

    pub fn document(&self, id: DocId) -> Option<&Document> { self.docs.get(id) }

    pub fn documents(&self) -> &DocumentStore { &self.docs }

    /// Corpus size N.
    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}
