//! Flat boolean queries: a list of terms joined by a single mode.

use crate::index::{Appearance, DocId, InvertedIndex};
use crate::tokenizer::word_runs;
use std::collections::{BTreeMap, HashSet};

/// Presence of this character anywhere in a query selects AND mode.
pub const AND_MARKER: char = '&';
/// Separator used when generating OR queries.
pub const OR_MARKER: char = '@';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Distinct terms in order of first appearance.
    pub terms: Vec<String>,
    pub mode: Mode,
}

pub fn parse_query(raw: &str) -> ParsedQuery {
    let mut seen = HashSet::new();
    let terms = word_runs(raw)
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect();
    let mode = if raw.contains(AND_MARKER) { Mode::And } else { Mode::Or };
    ParsedQuery { terms, mode }
}

/// Join terms into an OR query string.
pub fn or_query<I, S>(terms: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for term in terms {
        if !out.is_empty() { out.push(OR_MARKER); }
        out.push_str(term.as_ref());
    }
    out
}

/// Query terms found in the index, with their posting lists, and the
/// documents that satisfy the query mode.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    pub terms: Vec<(String, &'a [Appearance])>,
    pub mode: Mode,
    /// Ascending by id; the ranker decides the final order.
    pub candidates: Vec<DocId>,
}

impl<'a> Matches<'a> {
    pub fn is_empty(&self) -> bool { self.candidates.is_empty() }
}

/// Evaluate a raw query. `None` means no query term exists in the index.
pub fn evaluate<'a>(index: &'a InvertedIndex, raw: &str) -> Option<Matches<'a>> {
    let parsed = parse_query(raw);
    let terms: Vec<(String, &'a [Appearance])> = parsed
        .terms
        .into_iter()
        .filter_map(|term| {
            let postings = index.lookup(&term);
            (!postings.is_empty()).then(|| (term, postings))
        })
        .collect();
    if terms.is_empty() {
        tracing::debug!(query = raw, "no query term is indexed");
        return None;
    }

    let mut occurrences: BTreeMap<DocId, usize> = BTreeMap::new();
    for (_, postings) in &terms {
        for appearance in postings.iter() {
            *occurrences.entry(appearance.doc_id).or_insert(0) += 1;
        }
    }

    let candidates = match parsed.mode {
        Mode::Or => occurrences.into_keys().collect(),
        Mode::And => occurrences
            .into_iter()
            .filter(|&(_, count)| count == terms.len())
            .map(|(doc_id, _)| doc_id)
            .collect(),
    };

    tracing::debug!(query = raw, matched_terms = terms.len(), "evaluated query");
    Some(Matches { terms, mode: parsed.mode, candidates })
}
