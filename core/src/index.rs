use crate::tokenizer::{bare_term, tokenize};
use crate::{DocId, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One term occurrence: `position` is the index in the document's filtered term stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub term: String,
    pub doc_id: DocId,
    pub position: Position,
}

fn token_at(doc_id: DocId, position: usize, term: String) -> Option<Token> {
    let position = Position::try_from(position).ok()?;
    Some(Token { term, doc_id, position })
}

/// Tokens of a single document, in reading order.
///
/// Positions are `u32`; a document longer than `u32::MAX + 1` terms is cut
/// off there rather than wrapping.
pub fn document_tokens(doc_id: DocId, text: &str) -> impl Iterator<Item = Token> + '_ {
    tokenize(text)
        .enumerate()
        .map_while(move |(position, term)| token_at(doc_id, position, term))
}

/// All tokens of the collection sorted by term, then document id. Ids are 1-based by input order.
pub fn combined_tokens<S: AsRef<str>>(docs: &[S]) -> Vec<Token> {
    let mut tokens: Vec<Token> = docs
        .iter()
        .zip(1..)
        .flat_map(|(doc, doc_id)| document_tokens(doc_id, doc.as_ref()).collect::<Vec<_>>())
        .collect();
    // stable: positions stay in reading order within a term+document run
    tokens.sort_by(|a, b| a.term.cmp(&b.term).then(a.doc_id.cmp(&b.doc_id)));
    tokens
}

/// Term to document ids, keyed by bare term. Lists are ascending and keep one
/// id per occurrence, so a term repeated in a document repeats its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BooleanIndex {
    postings: BTreeMap<String, Vec<DocId>>,
}

impl BooleanIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build<S: AsRef<str>>(docs: &[S]) -> Self {
        Self::from_tokens(&combined_tokens(docs))
    }

    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut postings: BTreeMap<String, Vec<DocId>> = BTreeMap::new();
        for token in tokens {
            postings.entry(bare_term(&token.term).to_string()).or_default().push(token.doc_id);
        }
        for list in postings.values_mut() {
            list.sort_unstable();
        }
        Self { postings }
    }

    /// Posting list for a term; unknown terms have an empty list.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.postings.iter().map(|(t, l)| (t.as_str(), l.as_slice()))
    }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}

pub type DocPositions = BTreeMap<DocId, Vec<Position>>;

/// Term to document to strictly ascending positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionalIndex {
    postings: BTreeMap<String, DocPositions>,
}

impl PositionalIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build<S: AsRef<str>>(docs: &[S]) -> Self {
        Self::from_tokens(&combined_tokens(docs))
    }

    /// Keys are the terms as tokenized, so header and body occurrences stay apart.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut postings: BTreeMap<String, DocPositions> = BTreeMap::new();
        for token in tokens {
            postings
                .entry(token.term.clone())
                .or_default()
                .entry(token.doc_id)
                .or_default()
                .push(token.position);
        }
        let mut index = Self { postings };
        index.normalize();
        index
    }

    /// Merge every field variant of a term under its bare key.
    pub fn collapse_fields(&self) -> PositionalIndex {
        let mut postings: BTreeMap<String, DocPositions> = BTreeMap::new();
        for (term, docs) in &self.postings {
            let merged = postings.entry(bare_term(term).to_string()).or_default();
            for (doc_id, positions) in docs {
                merged.entry(*doc_id).or_default().extend_from_slice(positions);
            }
        }
        let mut index = Self { postings };
        index.normalize();
        index
    }

    fn normalize(&mut self) {
        for positions in self.postings.values_mut().flat_map(|docs| docs.values_mut()) {
            positions.sort_unstable();
            positions.dedup();
        }
    }

    pub fn postings(&self, term: &str) -> Option<&DocPositions> {
        self.postings.get(term)
    }

    pub fn positions(&self, term: &str, doc_id: DocId) -> &[Position] {
        self.postings
            .get(term)
            .and_then(|docs| docs.get(&doc_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The term key that occupies `position` in `doc_id`, if any.
    pub fn term_at(&self, doc_id: DocId, position: Position) -> Option<&str> {
        self.postings
            .iter()
            .find(|(_, docs)| {
                docs.get(&doc_id)
                    .map_or(false, |positions| positions.binary_search(&position).is_ok())
            })
            .map(|(term, _)| term.as_str())
    }

    /// Number of documents containing the term.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |docs| docs.len())
    }

    /// Number of positions the term has in one document.
    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> usize {
        self.positions(term, doc_id).len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocPositions)> {
        self.postings.iter().map(|(t, d)| (t.as_str(), d))
    }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}
