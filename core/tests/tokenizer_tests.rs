use ircore::tokenizer::tokenize;
use ircore::{normalize_query, Field};

#[test]
fn it_normalizes_and_stems() {
    let words: Vec<String> = tokenize("Running Runners RUN! The café's menu.").collect();
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // Unicode normalization keeps the accent, then the apostrophe splits "café's"
    assert!(words.contains(&"café".to_string()));
    assert!(words.contains(&"menu".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words: Vec<String> = tokenize("the quick brown fox and the lazy dog").collect();
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn empty_and_stopword_only_documents_yield_nothing() {
    assert_eq!(tokenize("").count(), 0);
    assert_eq!(tokenize("  ,.. '\" ").count(), 0);
    assert_eq!(tokenize("the and of it was").count(), 0);
}

#[test]
fn tokenizing_twice_is_deterministic() {
    let text = "<header>It was rumored</header> that Caesar was the father of Servilia's son";
    let a: Vec<String> = tokenize(text).collect();
    let b: Vec<String> = tokenize(text).collect();
    assert_eq!(a, b);
    assert_eq!(Field::of(&a[0]), Field::Header);
    assert_eq!(Field::of(&a[2]), Field::Body);
}

#[test]
fn query_normalization_drops_operators_that_are_stopwords() {
    assert_eq!(normalize_query("caesar and father"), vec!["caesar", "father"]);
}
