use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

pub const HEADER_OPEN: &str = "<header>";
pub const HEADER_CLOSE: &str = "</header>";
/// Prefix carried by terms that occur between the header markers.
pub const HEADER_PREFIX: &str = "header.";

lazy_static! {
    static ref SEPARATORS: Regex = Regex::new(r#"[,.\s'"]+"#).expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","all","an","and","any","are","as",
            "be","been","but","by",
            "few","for",
            "have","he","her","here","him","his","how",
            "i","in","is","it","its",
            "many","me","my",
            "none",
            "of","on","or","our",
            "she","some",
            "the","their","them","there","they","that","this",
            "us",
            "was","what","when","where","which","who","why","will","with",
            "you","your"
        ];
        words.iter().copied().collect()
    };
}

/// Stop-words are matched against the raw token, before lowercasing.
fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Which part of a document a term occurrence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Body,
    Header,
}

impl Field {
    /// Recover the field from an indexed term key.
    pub fn of(term: &str) -> Field {
        if term.starts_with(HEADER_PREFIX) { Field::Header } else { Field::Body }
    }

    fn tag(self, term: String) -> String {
        match self {
            Field::Body => term,
            Field::Header => format!("{HEADER_PREFIX}{term}"),
        }
    }
}

/// Strip the field marker from a term key.
pub fn bare_term(term: &str) -> &str {
    term.strip_prefix(HEADER_PREFIX).unwrap_or(term)
}

/// Header tracking for one document's token stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum HeaderState {
    #[default]
    Outside,
    Inside,
}

impl HeaderState {
    /// Returns the field the token belongs to and the state for the tokens after it.
    /// A close marker seen while outside a header leaves the state unchanged.
    fn step(self, token: &str) -> (Field, HeaderState) {
        let current = if token.contains(HEADER_OPEN) { HeaderState::Inside } else { self };
        let next = if token.contains(HEADER_CLOSE) { HeaderState::Outside } else { current };
        let field = match current {
            HeaderState::Inside => Field::Header,
            HeaderState::Outside => Field::Body,
        };
        (field, next)
    }
}

/// Lazy stream of normalized terms for one document.
///
/// The stream owns its text and header state, so cloning it before iterating
/// replays exactly the same terms.
#[derive(Debug, Clone)]
pub struct Terms {
    text: String,
    offset: usize,
    state: HeaderState,
}

impl Terms {
    fn next_piece(&mut self) -> Option<(usize, usize)> {
        if self.offset > self.text.len() { return None; }
        let start = self.offset;
        match SEPARATORS.find_at(&self.text, start) {
            Some(sep) => {
                self.offset = sep.end();
                Some((start, sep.start()))
            }
            None => {
                self.offset = self.text.len() + 1;
                Some((start, self.text.len()))
            }
        }
    }
}

impl Iterator for Terms {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some((start, end)) = self.next_piece() {
            let piece = &self.text[start..end];
            if piece.is_empty() || is_stopword(piece) { continue; }

            let (field, next) = self.state.step(piece);
            self.state = next;

            // A bare marker still takes a position, as an empty term.
            let word = piece.replace(HEADER_OPEN, "").replace(HEADER_CLOSE, "");
            let stem = if word.is_empty() {
                String::new()
            } else {
                STEMMER.stem(&word.to_lowercase()).into_owned()
            };
            return Some(field.tag(stem));
        }
        None
    }
}

/// Tokenize a document into field-tagged terms: NFKC normalization, splitting on
/// whitespace and `, . ' "`, stop-word removal, header tracking, stemming, lowercase.
pub fn tokenize(text: &str) -> Terms {
    Terms { text: text.nfkc().collect(), offset: 0, state: HeaderState::default() }
}

/// Normalize free query text into the terms the evaluators expect.
pub fn normalize_query(text: &str) -> Vec<String> {
    tokenize(text).collect()
}
