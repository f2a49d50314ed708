//! Error types for poemdex-core.

use crate::index::DocId;
use thiserror::Error;

/// Errors raised while building the index.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    /// A document with this id was already indexed.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(DocId),
}

/// Errors raised while loading a line-oriented corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("I/O error reading corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// The corpus has more lines than a document id can address.
    #[error("corpus exceeds {max} documents")]
    TooLarge { max: u64 },
}

/// Why a keyword record (or a whole payload) was rejected.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The JSON did not have the expected shape.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// A required field was absent or null.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// Confidence scores live in [0, 1].
    #[error("score {score} out of range for keyword `{keyword}`")]
    ScoreOutOfRange { keyword: String, score: f64 },
}
