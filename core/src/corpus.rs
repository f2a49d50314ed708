use crate::error::CorpusError;
use crate::index::{DocId, Document, InvertedIndex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const PROGRESS_EVERY: usize = 1000;

/// Build an index from a line-oriented source: each line is one document and
/// its zero-based line number is the document id.
pub fn load_corpus<R: BufRead>(reader: R) -> Result<InvertedIndex, CorpusError> {
    let mut index = InvertedIndex::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let id = DocId::try_from(lineno).map_err(|_| CorpusError::TooLarge { max: DocId::MAX as u64 + 1 })?;
        index.index_document(Document::new(id, line))?;
        if (lineno + 1) % PROGRESS_EVERY == 0 {
            tracing::info!(loaded = lineno + 1, terms = index.num_terms(), "loading corpus");
        }
    }
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "corpus loaded");
    Ok(index)
}

pub fn load_corpus_file<P: AsRef<Path>>(path: P) -> Result<InvertedIndex, CorpusError> {
    let f = File::open(path)?;
    load_corpus(BufReader::new(f))
}
