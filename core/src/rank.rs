//! Dot-product ranking over raw term frequencies.
//!
//! Each matched term gets a global weight `N / df`, where `df` is the length
//! of its posting list. A candidate's score is the dot product of its
//! per-term frequencies with those weights. Vectors are not normalized, so
//! this is not cosine similarity; long documents full of rare terms win.

use crate::index::DocId;
use crate::query::Matches;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    pub doc_id: DocId,
    pub score: f64,
    /// Query terms whose posting lists contain this document.
    pub matched_terms: Vec<String>,
}

/// Weight of a term that occurs in `doc_freq` of `corpus_size` documents.
pub fn term_weight(corpus_size: usize, doc_freq: usize) -> f64 {
    if doc_freq == 0 { return 0.0; }
    corpus_size as f64 / doc_freq as f64
}

/// Score and order the candidates, best first. `None` when there is nothing
/// to rank.
pub fn rank(matches: &Matches<'_>, corpus_size: usize) -> Option<Vec<RankedDocument>> {
    if matches.candidates.is_empty() {
        return None;
    }

    let weights: Vec<f64> = matches
        .terms
        .iter()
        .map(|(_, postings)| term_weight(corpus_size, postings.len()))
        .collect();
    let frequencies: Vec<HashMap<DocId, u32>> = matches
        .terms
        .iter()
        .map(|(_, postings)| postings.iter().map(|a| (a.doc_id, a.frequency)).collect())
        .collect();

    let mut ranked: Vec<RankedDocument> = matches
        .candidates
        .iter()
        .map(|&doc_id| {
            let mut score = 0.0;
            let mut matched_terms = Vec::new();
            for (t, (term, _)) in matches.terms.iter().enumerate() {
                if let Some(&tf) = frequencies[t].get(&doc_id) {
                    score += tf as f64 * weights[t];
                    matched_terms.push(term.clone());
                }
            }
            RankedDocument { doc_id, score, matched_terms }
        })
        .collect();

    // Stable: equal scores keep ascending id order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Some(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Appearance;
    use crate::query::Mode;

    #[test]
    fn weight_is_corpus_over_doc_freq() {
        assert_eq!(term_weight(10, 2), 5.0);
        assert_eq!(term_weight(10, 0), 0.0);
    }

    #[test]
    fn score_is_weighted_frequency() {
        let x = [Appearance { doc_id: 3, frequency: 3 }, Appearance { doc_id: 4, frequency: 1 }];
        let m = Matches { terms: vec![("x".into(), &x[..])], mode: Mode::Or, candidates: vec![3, 4] };
        let ranked = rank(&m, 10).unwrap();
        assert_eq!(ranked[0].doc_id, 3);
        assert_eq!(ranked[0].score, 15.0);
        assert_eq!(ranked[1].score, 5.0);
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let common = [
            Appearance { doc_id: 0, frequency: 2 },
            Appearance { doc_id: 1, frequency: 1 },
            Appearance { doc_id: 2, frequency: 1 },
            Appearance { doc_id: 3, frequency: 1 },
        ];
        let rare = [Appearance { doc_id: 1, frequency: 1 }];
        let m = Matches {
            terms: vec![("c".into(), &common[..]), ("r".into(), &rare[..])],
            mode: Mode::Or,
            candidates: vec![0, 1, 2, 3],
        };
        let ranked = rank(&m, 4).unwrap();
        // doc 1: 1*1 + 1*4 = 5, doc 0: 2*1 = 2
        assert_eq!(ranked[0].doc_id, 1);
        assert_eq!(ranked[0].matched_terms, vec!["c", "r"]);
        assert_eq!(ranked[1].doc_id, 0);
        assert_eq!(ranked[2].doc_id, 2);
        assert_eq!(ranked[3].doc_id, 3);
    }

    #[test]
    fn empty_candidates_is_no_match() {
        let a = [Appearance { doc_id: 0, frequency: 1 }];
        let m = Matches { terms: vec![("a".into(), &a[..])], mode: Mode::And, candidates: vec![] };
        assert!(rank(&m, 1).is_none());
    }
}
