use anyhow::{anyhow, Context, Result};
use poemdex_core::keywords::{KeywordRecord, Segmenter};
use poemdex_core::{search, InvertedIndex, RecordError};
use reqwest::{header, Client};
use std::time::Duration;
use url::Url;

pub mod sink;

use sink::{MatchRecord, MatchSink};

/// Counts reported after a matching run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub matched: usize,
    pub unmatched: usize,
    pub skipped: usize,
}

/// Read a keyword payload from a local path or an http(s) URL.
pub async fn fetch_payload(source: &str, timeout_secs: u64, user_agent: &str) -> Result<String> {
    let url = match Url::parse(source) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => u,
        _ => return tokio::fs::read_to_string(source).await.with_context(|| format!("reading keyword payload {source}")),
    };

    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    let mut req = client.get(url.clone());
    if let Ok(token) = std::env::var("KEYWORD_SERVICE_TOKEN") {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let resp = req.send().await.with_context(|| format!("keyword service unreachable at {url}"))?;
    if !resp.status().is_success() {
        return Err(anyhow!("keyword service returned {} for {url}", resp.status()));
    }
    Ok(resp.text().await?)
}

/// Match every decoded record against the corpus and store the best poem per
/// image. Records that failed to decode are logged and skipped.
pub fn match_records<S, I>(index: &InvertedIndex, records: I, threshold: f64, segmenter: &S, sink: &MatchSink) -> Result<Summary>
where
    S: Segmenter + ?Sized,
    I: IntoIterator<Item = Result<KeywordRecord, RecordError>>,
{
    let mut summary = Summary::default();
    for (i, record) in records.into_iter().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(record = i, error = %e, "skipping keyword record");
                summary.skipped += 1;
                continue;
            }
        };

        let query = record.to_query(threshold, segmenter);
        let best = search(index, &query).and_then(|ranked| ranked.into_iter().next()).and_then(|top| {
            index.document(top.doc_id).map(|doc| (top.doc_id, doc.text.clone(), top.score))
        });
        match &best {
            Some((doc_id, _, score)) => {
                tracing::info!(image = %record.image, doc_id, score, "matched poem");
                summary.matched += 1;
            }
            None => {
                tracing::info!(image = %record.image, query = %query, "no match");
                summary.unmatched += 1;
            }
        }
        sink.record(&MatchRecord::now(record.image, query, best)?)?;
    }
    Ok(summary)
}
