//! In-memory indexing and query evaluation for a small teaching search engine.
//!
//! Documents are tokenized into field-tagged terms, folded into a boolean
//! inverted index and a positional index, and queried with AND-only boolean
//! merges or two-term adjacency lookups whose results can be ranked.

pub mod boolean;
pub mod engine;
pub mod error;
pub mod index;
pub mod positional;
pub mod ranking;
pub mod stats;
pub mod tokenizer;

pub type DocId = u32;
pub type Position = u32;

pub use boolean::{MergeStrategy, DEFAULT_SKIP_BY};
pub use engine::SearchEngine;
pub use error::{EngineError, Result};
pub use index::{BooleanIndex, DocPositions, PositionalIndex, Token};
pub use positional::AdjacencyMatches;
pub use ranking::ScoredDoc;
pub use stats::RetrievalStats;
pub use tokenizer::{bare_term, normalize_query, tokenize, Field};
