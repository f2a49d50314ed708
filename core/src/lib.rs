pub mod corpus;
pub mod error;
pub mod index;
pub mod keywords;
pub mod query;
pub mod rank;
pub mod tokenizer;

pub use corpus::{load_corpus, load_corpus_file};
pub use error::{CorpusError, IndexError, RecordError};
pub use index::*;
pub use query::{evaluate, parse_query, Matches, Mode};
pub use rank::{rank, RankedDocument};

/// Evaluate and rank a query in one step. `None` is a no-match.
pub fn search(index: &InvertedIndex, raw: &str) -> Option<Vec<RankedDocument>> {
    let matches = evaluate(index, raw)?;
    rank(&matches, index.num_docs())
}
