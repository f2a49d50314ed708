use anyhow::Result;
use poemdex_core::DocId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::format_description::well_known::Rfc3339;

/// Outcome of matching one image against the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub image: String,
    pub query: String,
    /// `None` when the query matched nothing.
    pub doc_id: Option<DocId>,
    pub poem: Option<String>,
    pub score: f64,
    pub matched_at: String,
}

impl MatchRecord {
    pub fn now(image: String, query: String, best: Option<(DocId, String, f64)>) -> Result<Self> {
        let matched_at = time::OffsetDateTime::now_utc().format(&Rfc3339)?;
        let (doc_id, poem, score) = match best {
            Some((id, text, score)) => (Some(id), Some(text), score),
            None => (None, None, 0.0),
        };
        Ok(Self { image, query, doc_id, poem, score, matched_at })
    }
}

/// Image to poem mappings, keyed by image descriptor. Later records for the
/// same image replace earlier ones.
pub struct MatchSink {
    db: sled::Db,
}

impl MatchSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { db: sled::open(path)? })
    }

    pub fn record(&self, rec: &MatchRecord) -> Result<()> {
        let bytes = bincode::serialize(rec)?;
        self.db.insert(rec.image.as_bytes(), bytes)?;
        Ok(())
    }

    pub fn get(&self, image: &str) -> Result<Option<MatchRecord>> {
        match self.db.get(image.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize { self.db.len() }

    pub fn is_empty(&self) -> bool { self.db.is_empty() }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}
