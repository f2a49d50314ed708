//! Image keyword payloads and the queries generated from them.
//!
//! A payload is a JSON array of records, one per image:
//!
//! ```json
//! [{ "image": "beach.jpg", "result": [{ "keyword": "海滩", "score": 0.82 }] }]
//! ```
//!
//! Each record decodes on its own so one bad record never sinks the batch.

use crate::error::RecordError;
use crate::query::or_query;
use crate::tokenizer::word_runs;
use serde::Deserialize;

/// Keywords at or below this confidence are dropped.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredKeyword {
    pub keyword: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    pub image: String,
    pub keywords: Vec<ScoredKeyword>,
}

#[derive(Deserialize)]
struct RawRecord {
    image: Option<String>,
    result: Option<Vec<RawKeyword>>,
}

#[derive(Deserialize)]
struct RawKeyword {
    keyword: Option<String>,
    score: Option<f64>,
}

pub fn decode_record(value: serde_json::Value) -> Result<KeywordRecord, RecordError> {
    let raw: RawRecord = serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))?;
    let image = raw.image.ok_or(RecordError::MissingField("image"))?;
    let mut keywords = Vec::new();
    for k in raw.result.ok_or(RecordError::MissingField("result"))? {
        let keyword = k.keyword.ok_or(RecordError::MissingField("keyword"))?;
        let score = k.score.ok_or(RecordError::MissingField("score"))?;
        if !(0.0..=1.0).contains(&score) {
            return Err(RecordError::ScoreOutOfRange { keyword, score });
        }
        keywords.push(ScoredKeyword { keyword, score });
    }
    Ok(KeywordRecord { image, keywords })
}

/// Decode a payload into per-record results. Only a payload that is not JSON,
/// or is neither an array nor a single record, fails as a whole.
pub fn decode_payload(json: &str) -> Result<Vec<Result<KeywordRecord, RecordError>>, RecordError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| RecordError::Malformed(e.to_string()))?;
    match value {
        serde_json::Value::Array(arr) => Ok(arr.into_iter().map(decode_record).collect()),
        obj @ serde_json::Value::Object(_) => Ok(vec![decode_record(obj)]),
        other => Err(RecordError::Malformed(format!("expected an array of records, got {other}"))),
    }
}

/// Splits an accepted keyword into search sub-tokens.
pub trait Segmenter {
    fn segment(&self, keyword: &str) -> Vec<String>;
}

/// Search-oriented segmentation without a dictionary: every word run yields
/// its two-character windows (for runs longer than two) and then the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchSegmenter;

impl Segmenter for SearchSegmenter {
    fn segment(&self, keyword: &str) -> Vec<String> {
        let mut out = Vec::new();
        for run in word_runs(keyword) {
            let chars: Vec<char> = run.chars().collect();
            if chars.len() > 2 {
                out.extend(chars.windows(2).map(|w| w.iter().collect::<String>()));
            }
            out.push(run.to_string());
        }
        out
    }
}

impl KeywordRecord {
    /// Keywords whose score is strictly above `threshold`.
    pub fn accepted(&self, threshold: f64) -> impl Iterator<Item = &ScoredKeyword> {
        self.keywords.iter().filter(move |k| k.score > threshold)
    }

    /// OR query over the segmented accepted keywords. Empty when nothing
    /// passes the threshold.
    pub fn to_query<S: Segmenter + ?Sized>(&self, threshold: f64, segmenter: &S) -> String {
        for k in self.keywords.iter().filter(|k| k.score <= threshold) {
            tracing::debug!(image = %self.image, keyword = %k.keyword, score = k.score, "keyword below threshold");
        }
        or_query(self.accepted(threshold).flat_map(|k| segmenter.segment(&k.keyword)))
    }
}
