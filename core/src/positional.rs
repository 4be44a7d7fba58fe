use crate::error::{EngineError, Result};
use crate::index::PositionalIndex;
use crate::{DocId, Position};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Document id to the positions of the second term wherever it directly follows the first.
pub type AdjacencyMatches = BTreeMap<DocId, Vec<Position>>;

/// Find documents where `terms[1]` occurs right after `terms[0]`.
pub fn query_adjacent<T: AsRef<str>>(terms: &[T], index: &PositionalIndex) -> Result<AdjacencyMatches> {
    let [first, second] = terms else {
        return Err(EngineError::InsufficientTerms { expected: "exactly 2", got: terms.len() });
    };
    let (first, second) = (first.as_ref(), second.as_ref());
    let mut matches = AdjacencyMatches::new();
    let (Some(first_docs), Some(second_docs)) = (index.postings(first), index.postings(second)) else {
        return Ok(matches);
    };

    let left: Vec<DocId> = first_docs.keys().copied().collect();
    let right: Vec<DocId> = second_docs.keys().copied().collect();
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Equal => {
                let doc_id = left[i];
                let following = &second_docs[&doc_id];
                let ends: Vec<Position> = first_docs[&doc_id]
                    .iter()
                    .map(|p| p + 1)
                    .filter(|end| following.binary_search(end).is_ok())
                    .collect();
                if !ends.is_empty() {
                    matches.insert(doc_id, ends);
                }
                i += 1;
                j += 1;
            }
            Ordering::Greater => j += 1,
            Ordering::Less => i += 1,
        }
    }

    tracing::debug!(first, second, docs = matches.len(), "adjacency query evaluated");
    Ok(matches)
}
