use ircore::boolean::{query, query_with_skips};
use ircore::positional::query_adjacent;
use ircore::ranking::rank;
use ircore::{normalize_query, BooleanIndex, MergeStrategy, PositionalIndex, SearchEngine, DEFAULT_SKIP_BY};

const ROME: [&str; 3] = [
    "On his return, Caesar married Pompeia, a granddaughter of Sulla. Their marriage ended in scandal.",
    "It was rumored that Caesar was the father of Servilia's son",
    "son and father relationship that was an open secret at Rome.",
];

const WEDDING: [&str; 3] = [
    "Caesar at the wedding",
    "<header>And we had Caesar at the wedding</header> Caesar at",
    "asdds",
];

fn both(text: &str) -> (Vec<u32>, Vec<u32>) {
    let index = BooleanIndex::build(&ROME);
    let q = normalize_query(text);
    (query(&q, &index).unwrap(), query_with_skips(&q, &index, DEFAULT_SKIP_BY).unwrap())
}

#[test]
fn and_of_two_words() {
    assert_eq!(both("caesar and father"), (vec![2], vec![2]));
}

#[test]
fn and_with_unknown_word() {
    assert_eq!(both("caesar and not_in_the_docs"), (vec![], vec![]));
}

#[test]
fn and_of_three_words_no_match() {
    assert_eq!(both("caesar and father and granddaughter"), (vec![], vec![]));
}

#[test]
fn and_of_three_words_with_stopword() {
    // "it" is a stop-word in lowercase, leaving caesar AND father
    assert_eq!(both("caesar and father and it"), (vec![2], vec![2]));
}

#[test]
fn and_chain_with_number_never_matches() {
    assert_eq!(both("caesar and father and it and 6546546"), (vec![], vec![]));
}

#[test]
fn long_and_chain_matches_one_document() {
    let text = "caesar and father and it and rumor and s and son and servilia";
    assert_eq!(both(text), (vec![2], vec![2]));
}

#[test]
fn engine_strategies_agree_on_scenarios() {
    let engine = SearchEngine::build(&ROME);
    let q = normalize_query("son and father");
    let linear = engine.boolean(&q, MergeStrategy::Linear).unwrap();
    let skips = engine.boolean(&q, MergeStrategy::skip_pointers(2).unwrap()).unwrap();
    assert_eq!(linear, vec![2, 3]);
    assert_eq!(linear, skips);
}

#[test]
fn positional_query_finds_both_documents() {
    let index = PositionalIndex::build(&WEDDING);
    let matches = query_adjacent(&normalize_query("Caesar at"), &index).unwrap();
    assert_eq!(matches.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(matches[&1], vec![1]);
    assert_eq!(matches[&2], vec![7]);
}

#[test]
fn ranking_puts_header_document_first() {
    let index = PositionalIndex::build(&WEDDING);
    let collapsed = index.collapse_fields();
    let matches = query_adjacent(&normalize_query("Caesar at"), &collapsed).unwrap();
    assert_eq!(matches[&2], vec![4, 7]);

    let ranking = rank(&matches, &index, &collapsed).unwrap();
    let order: Vec<u32> = ranking.iter().map(|s| s.doc_id).collect();
    assert_eq!(order, vec![2, 1]);

    // Known quirk: N is the per-document count, so document 2 lands on ln(2/2) = 0
    // and the single-occurrence document 1 goes negative.
    assert!(ranking[0].score.abs() < 1e-12);
    assert!((ranking[1].score - 0.4 * 0.5f64.ln()).abs() < 1e-12);
}

#[test]
fn engine_ranked_adjacent_matches_manual_pipeline() {
    let engine = SearchEngine::build(&WEDDING);
    let ranked = engine.ranked_adjacent(&normalize_query("Caesar at")).unwrap();
    assert_eq!(ranked.iter().map(|s| s.doc_id).collect::<Vec<_>>(), vec![2, 1]);
}

#[test]
fn indexes_serialize_as_plain_maps() {
    let engine = SearchEngine::build(&WEDDING);
    let json = serde_json::to_value(engine.boolean_index()).unwrap();
    assert_eq!(json["caesar"], serde_json::json!([1, 2, 2]));
    let json = serde_json::to_value(engine.positional_index()).unwrap();
    assert_eq!(json["header.caesar"]["2"], serde_json::json!([3]));
}
