use crate::{DocId, Position};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Boolean queries need two or more terms, adjacency queries exactly two.
    #[error("query requires {expected} terms, got {got}")]
    InsufficientTerms { expected: &'static str, got: usize },

    /// No indexed term owns a matched position, so `ln(N / df)` is undefined.
    #[error("cannot score position {position} of document {doc_id}: no indexed term owns it")]
    DegenerateRankingInput { doc_id: DocId, position: Position },

    #[error("skip stride must be at least 1")]
    InvalidSkipStride,
}

pub type Result<T> = std::result::Result<T, EngineError>;
