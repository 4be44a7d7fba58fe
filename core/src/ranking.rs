//! Field-weighted scoring of adjacency matches.
//!
//! Every matched pair `(p - 1, p)` contributes, for each of its two positions,
//! `weight * ln(N / df)` where `weight` depends on whether the owning term is a
//! header or body occurrence, `df` is the number of documents containing the
//! bare term and `N` is how many times the bare term occurs in the scored
//! document. `N` is a per-document count, so frequent-in-document terms score
//! above zero and single occurrences of common terms score below it.

use crate::error::{EngineError, Result};
use crate::index::PositionalIndex;
use crate::positional::AdjacencyMatches;
use crate::tokenizer::{bare_term, Field};
use crate::{DocId, Position};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const HEADER_WEIGHT: f64 = 0.8;
pub const BODY_WEIGHT: f64 = 0.2;

impl Field {
    pub fn weight(self) -> f64 {
        match self {
            Field::Header => HEADER_WEIGHT,
            Field::Body => BODY_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Score every matched document, best first. Equal scores keep ascending id order.
///
/// `index` is the field-aware positional index and `collapsed` its
/// [`PositionalIndex::collapse_fields`] view.
pub fn rank(matches: &AdjacencyMatches, index: &PositionalIndex, collapsed: &PositionalIndex) -> Result<Vec<ScoredDoc>> {
    let mut scored = Vec::with_capacity(matches.len());
    for (&doc_id, ends) in matches {
        let mut score = 0.0;
        for &end in ends {
            let start = end
                .checked_sub(1)
                .ok_or(EngineError::DegenerateRankingInput { doc_id, position: end })?;
            score += position_score(doc_id, start, index, collapsed)?;
            score += position_score(doc_id, end, index, collapsed)?;
        }
        scored.push(ScoredDoc { doc_id, score });
    }
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    tracing::debug!(docs = scored.len(), "ranked adjacency matches");
    Ok(scored)
}

fn position_score(doc_id: DocId, position: Position, index: &PositionalIndex, collapsed: &PositionalIndex) -> Result<f64> {
    let degenerate = EngineError::DegenerateRankingInput { doc_id, position };
    let term = index.term_at(doc_id, position).ok_or_else(|| degenerate.clone())?;
    let bare = bare_term(term);
    let df = collapsed.document_frequency(bare);
    let n = collapsed.term_frequency(bare, doc_id);
    if df == 0 || n == 0 {
        return Err(degenerate);
    }
    Ok(Field::of(term).weight() * (n as f64 / df as f64).ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positional::query_adjacent;

    fn ranked(docs: &[&str], terms: &[&str]) -> Vec<ScoredDoc> {
        let index = PositionalIndex::build(docs);
        let collapsed = index.collapse_fields();
        let matches = query_adjacent(terms, &collapsed).unwrap();
        rank(&matches, &index, &collapsed).unwrap()
    }

    #[test]
    fn header_pair_outranks_body_pair() {
        let out = ranked(
            &[
                "rome forum rome forum rome forum",
                "<header>rome forum</header> rome forum rome forum",
            ],
            &["rome", "forum"],
        );
        assert_eq!(out[0].doc_id, 2);
        assert_eq!(out[1].doc_id, 1);
        assert!(out[0].score > out[1].score);
    }

    #[test]
    fn scores_follow_the_log_ratio() {
        // rome: df 2, N 3 in both documents
        let out = ranked(
            &[
                "rome forum rome forum rome forum",
                "<header>rome forum</header> rome forum rome forum",
            ],
            &["rome", "forum"],
        );
        let ln = 1.5f64.ln();
        assert!((out[0].score - (2.0 * HEADER_WEIGHT + 4.0 * BODY_WEIGHT) * ln).abs() < 1e-9);
        assert!((out[1].score - 6.0 * BODY_WEIGHT * ln).abs() < 1e-9);
    }

    #[test]
    fn single_occurrence_of_shared_term_scores_negative() {
        // N = 1, df = 2: ln(1/2) < 0, reproduced as-is
        let out = ranked(&["rome forum", "rome forum", "senate"], &["rome", "forum"]);
        let expected = 2.0 * BODY_WEIGHT * 0.5f64.ln();
        assert!(out.iter().all(|s| (s.score - expected).abs() < 1e-9));
        assert_eq!(out.iter().map(|s| s.doc_id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn unowned_position_is_degenerate() {
        let index = PositionalIndex::build(&["rome forum"]);
        let collapsed = index.collapse_fields();
        let mut matches = AdjacencyMatches::new();
        matches.insert(1, vec![5]);
        assert_eq!(
            rank(&matches, &index, &collapsed),
            Err(EngineError::DegenerateRankingInput { doc_id: 1, position: 4 })
        );
        matches.insert(1, vec![0]);
        assert_eq!(
            rank(&matches, &index, &collapsed),
            Err(EngineError::DegenerateRankingInput { doc_id: 1, position: 0 })
        );
    }

    #[test]
    fn empty_matches_rank_to_nothing() {
        let index = PositionalIndex::build(&["rome forum"]);
        let out = rank(&AdjacencyMatches::new(), &index, &index.collapse_fields()).unwrap();
        assert!(out.is_empty());
    }
}
