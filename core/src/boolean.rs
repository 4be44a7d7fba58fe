//! AND-only boolean queries over a [`BooleanIndex`].
//!
//! A query of `n >= 2` terms intersects the first two posting lists, then folds
//! every further term's list into the running result, stopping as soon as the
//! result is empty. Two merge algorithms are available and always agree:
//!
//! - [`MergeStrategy::Linear`]: classic two-pointer merge.
//! - [`MergeStrategy::SkipPointers`]: the lagging pointer may jump `skip_by`
//!   entries at once from indexes that are multiples of `skip_by`.

use crate::error::{EngineError, Result};
use crate::index::BooleanIndex;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::num::NonZeroUsize;

pub const DEFAULT_SKIP_BY: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeStrategy {
    #[default]
    Linear,
    SkipPointers { skip_by: NonZeroUsize },
}

impl MergeStrategy {
    /// Skip-pointer merge with the given stride; a stride of 0 is rejected.
    pub fn skip_pointers(skip_by: usize) -> Result<Self> {
        let skip_by = NonZeroUsize::new(skip_by).ok_or(EngineError::InvalidSkipStride)?;
        Ok(MergeStrategy::SkipPointers { skip_by })
    }

    fn stride(self) -> Option<usize> {
        match self {
            MergeStrategy::Linear => None,
            MergeStrategy::SkipPointers { skip_by } => Some(skip_by.get()),
        }
    }
}

/// Counters collected while merging, reported through tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub comparisons: usize,
    pub skips: usize,
    /// Pairwise merges performed; a query of `n` terms needs at most `n - 1`.
    pub merges: usize,
}

/// Where the lagging pointer at `at` may jump while chasing `target`.
///
/// The jump also requires the entry just before the landing slot to be below
/// `target`, so a run of equal ids is never stepped over.
fn skip_target(list: &[DocId], at: usize, stride: usize, target: DocId) -> Option<usize> {
    if at % stride != 0 { return None; }
    let to = at + stride;
    match list.get(to) {
        Some(&landing) if landing <= target && list[to - 1] < target => Some(to),
        _ => None,
    }
}

fn merge(first: &[DocId], second: &[DocId], stride: Option<usize>, stats: &mut MergeStats) -> Vec<DocId> {
    stats.merges += 1;
    let mut results = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < first.len() && j < second.len() {
        stats.comparisons += 1;
        let (top, bottom) = (first[i], second[j]);
        match top.cmp(&bottom) {
            Ordering::Equal => {
                results.push(top);
                i += 1;
                j += 1;
            }
            Ordering::Greater => match stride.and_then(|s| skip_target(second, j, s, top)) {
                Some(to) => {
                    stats.skips += 1;
                    j = to;
                    if second[j] == top {
                        results.push(top);
                        i += 1;
                        j += 1;
                    }
                }
                None => j += 1,
            },
            Ordering::Less => match stride.and_then(|s| skip_target(first, i, s, bottom)) {
                Some(to) => {
                    stats.skips += 1;
                    i = to;
                    if first[i] == bottom {
                        results.push(bottom);
                        i += 1;
                        j += 1;
                    }
                }
                None => i += 1,
            },
        }
    }
    results
}

/// Two-pointer intersection of two ascending posting lists.
pub fn intersect(first: &[DocId], second: &[DocId]) -> Vec<DocId> {
    merge(first, second, None, &mut MergeStats::default())
}

/// Same result as [`intersect`], scanning with skip pointers every `skip_by` entries.
pub fn intersect_with_skips(first: &[DocId], second: &[DocId], skip_by: NonZeroUsize) -> Vec<DocId> {
    merge(first, second, Some(skip_by.get()), &mut MergeStats::default())
}

/// Evaluate the conjunction of `terms` against `index`.
///
/// Unknown terms have empty posting lists, so they make the whole result empty.
/// Skip pointers, when selected, are used at every step of the fold.
pub fn evaluate<T: AsRef<str>>(terms: &[T], index: &BooleanIndex, strategy: MergeStrategy) -> Result<Vec<DocId>> {
    evaluate_with_stats(terms, index, strategy).map(|(results, _)| results)
}

pub fn evaluate_with_stats<T: AsRef<str>>(
    terms: &[T],
    index: &BooleanIndex,
    strategy: MergeStrategy,
) -> Result<(Vec<DocId>, MergeStats)> {
    if terms.len() < 2 {
        return Err(EngineError::InsufficientTerms { expected: "at least 2", got: terms.len() });
    }
    let stride = strategy.stride();
    let mut stats = MergeStats::default();

    let mut results = merge(
        index.postings(terms[0].as_ref()),
        index.postings(terms[1].as_ref()),
        stride,
        &mut stats,
    );
    for term in &terms[2..] {
        if results.is_empty() { break; }
        results = merge(index.postings(term.as_ref()), &results, stride, &mut stats);
    }

    tracing::debug!(
        ?strategy,
        terms = terms.len(),
        merges = stats.merges,
        hits = results.len(),
        comparisons = stats.comparisons,
        skips = stats.skips,
        "boolean query evaluated"
    );
    Ok((results, stats))
}

/// Conjunction with the plain two-pointer merge.
pub fn query<T: AsRef<str>>(terms: &[T], index: &BooleanIndex) -> Result<Vec<DocId>> {
    evaluate(terms, index, MergeStrategy::Linear)
}

/// Conjunction with skip pointers every `skip_by` entries.
pub fn query_with_skips<T: AsRef<str>>(terms: &[T], index: &BooleanIndex, skip_by: usize) -> Result<Vec<DocId>> {
    evaluate(terms, index, MergeStrategy::skip_pointers(skip_by)?)
}
