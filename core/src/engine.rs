use crate::boolean::{self, MergeStrategy};
use crate::error::Result;
use crate::index::{combined_tokens, BooleanIndex, PositionalIndex};
use crate::positional::{query_adjacent, AdjacencyMatches};
use crate::ranking::{rank, ScoredDoc};
use crate::DocId;

/// Every index for one immutable document collection, built in a single pass.
///
/// Queries borrow the engine immutably, so one engine can serve any number of
/// readers at once.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    boolean: BooleanIndex,
    positional: PositionalIndex,
    collapsed: PositionalIndex,
    num_docs: usize,
}

impl SearchEngine {
    /// Document ids are assigned 1..=N in input order.
    pub fn build<S: AsRef<str>>(docs: &[S]) -> Self {
        let tokens = combined_tokens(docs);
        let boolean = BooleanIndex::from_tokens(&tokens);
        let positional = PositionalIndex::from_tokens(&tokens);
        let collapsed = positional.collapse_fields();
        tracing::info!(
            num_docs = docs.len(),
            num_tokens = tokens.len(),
            num_terms = boolean.len(),
            num_field_terms = positional.len(),
            "built indexes"
        );
        Self { boolean, positional, collapsed, num_docs: docs.len() }
    }

    pub fn num_docs(&self) -> usize { self.num_docs }

    pub fn boolean_index(&self) -> &BooleanIndex { &self.boolean }

    pub fn positional_index(&self) -> &PositionalIndex { &self.positional }

    pub fn collapsed_index(&self) -> &PositionalIndex { &self.collapsed }

    /// AND of all terms over the boolean index.
    pub fn boolean<T: AsRef<str>>(&self, terms: &[T], strategy: MergeStrategy) -> Result<Vec<DocId>> {
        boolean::evaluate(terms, &self.boolean, strategy)
    }

    /// Adjacency over the field-aware index: header and body occurrences do not pair up.
    pub fn adjacent<T: AsRef<str>>(&self, terms: &[T]) -> Result<AdjacencyMatches> {
        query_adjacent(terms, &self.positional)
    }

    /// Adjacency over the collapsed index, scored with field weights.
    pub fn ranked_adjacent<T: AsRef<str>>(&self, terms: &[T]) -> Result<Vec<ScoredDoc>> {
        let matches = query_adjacent(terms, &self.collapsed)?;
        rank(&matches, &self.positional, &self.collapsed)
    }
}
