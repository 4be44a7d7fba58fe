use crate::DocId;
use serde::Serialize;
use std::collections::HashSet;

/// Precision and recall of a result list against a user-supplied ground truth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalStats {
    /// Distinct ids from the result, in first-seen order.
    pub found: Vec<DocId>,
    pub matched: usize,
    /// `matched / found`; `None` when nothing was found.
    pub precision: Option<f64>,
    /// `matched / ground truth`; `None` when the ground truth is empty.
    pub recall: Option<f64>,
}

impl RetrievalStats {
    pub fn compute(results: &[DocId], ground_truth: &[DocId]) -> Self {
        let mut seen = HashSet::new();
        let found: Vec<DocId> = results.iter().copied().filter(|id| seen.insert(*id)).collect();
        let matched = found.iter().filter(|id| ground_truth.contains(id)).count();
        let ratio = |den: usize| (den > 0).then(|| matched as f64 / den as f64);
        Self { precision: ratio(found.len()), recall: ratio(ground_truth.len()), found, matched }
    }
}
