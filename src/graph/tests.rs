//! Tests for tokens, the token table, anchors and normalization

use super::*;
use crate::corpus::RegionGraph;
use crate::lexicon::{SynonymLexicon, SynonymSet};

fn table(words: &[&str]) -> TokenTable {
    TokenTable::from_words(words, &SynonymLexicon::new())
}

// === Normalization ===

#[test]
fn normalize_text_collapses_whitespace_and_lowercases() {
    assert_eq!(normalize_text("  A   Red\tFire  Hydrant "), "a red fire hydrant");
}

#[test]
fn normalize_text_strips_double_quotes() {
    assert_eq!(normalize_text("the \"STOP\" sign"), "the stop sign");
    assert_eq!(normalize_text("\"quoted\""), "quoted");
}

#[test]
fn normalize_text_of_blank_is_empty() {
    assert_eq!(normalize_text("   "), "");
    assert_eq!(normalize_text(""), "");
}

#[test]
fn processed_graph_normalizes_every_tuple_element() {
    let raw = RegionGraph::new("A  DOG chases the \"Ball\"")
        .with_object("Dog")
        .with_object(" Red  Ball ")
        .with_attribute("Dog", ["Brown ", "VERY  small"])
        .with_relationship("DOG", "Chases ", "red ball");

    let graph = ProcessedGraph::from_region(&raw);

    assert_eq!(graph.phrase, "a dog chases the ball");
    assert_eq!(graph.words, vec!["a", "dog", "chases", "the", "ball"]);
    assert_eq!(graph.objects, vec!["dog", "red ball"]);
    assert_eq!(
        graph.attributes,
        vec![AttributePair {
            object: "dog".into(),
            words: vec!["brown".into(), "very small".into()],
        }]
    );
    assert_eq!(
        graph.relations,
        vec![RelationTriple {
            subject: "dog".into(),
            predicate: "chases".into(),
            object: "red ball".into(),
        }]
    );
}

#[test]
fn processed_graph_passes_empty_inputs_through() {
    let graph = ProcessedGraph::from_region(&RegionGraph::new(""));
    assert!(graph.words.is_empty());
    assert!(graph.objects.is_empty());
    assert!(graph.attributes.is_empty());
    assert!(graph.relations.is_empty());
}

// === Token table ===

#[test]
fn token_ids_are_one_based_positions() {
    let t = table(&["the", "cat", "sat"]);
    assert_eq!(t.len(), 3);
    let ids: Vec<usize> = t.iter().map(|tok| tok.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(t[TokenId::new(2)].text, "cat");
    assert!(t.get(TokenId::new(4)).is_none());
}

#[test]
fn table_looks_up_synonyms_once_per_token() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let calls = AtomicUsize::new(0);
    let oracle = |word: &str| -> SynonymSet {
        calls.fetch_add(1, Ordering::SeqCst);
        [format!("{word}.n.01")].into_iter().collect()
    };

    let t = TokenTable::from_words(&["dog", "runs"], &oracle);

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(t[TokenId::new(1)].synonyms.contains("dog.n.01"));
}

#[test]
fn link_span_chains_towards_the_tail() {
    let mut t = table(&["a", "red", "fire", "hydrant"]);
    let span = [TokenId::new(2), TokenId::new(3), TokenId::new(4)];

    t.link_span(&span);

    assert_eq!(t[TokenId::new(2)].parent, Some(Parent::Token(TokenId::new(3))));
    assert_eq!(t[TokenId::new(3)].parent, Some(Parent::Token(TokenId::new(4))));
    assert_eq!(t[TokenId::new(2)].relation, Some(Relation::Same));
    assert_eq!(t[TokenId::new(4)].parent, None);
    assert_eq!(t[TokenId::new(4)].relation, None);
    assert_eq!(t[TokenId::new(1)].parent, None);
}

#[test]
fn link_span_of_single_token_is_a_no_op() {
    let mut t = table(&["dog"]);
    t.link_span(&[TokenId::new(1)]);
    assert_eq!(t[TokenId::new(1)].parent, None);
    assert!(!t[TokenId::new(1)].is_self_loop());
}

#[test]
fn token_ids_round_trip_large_indices() {
    let index = usize::MAX - 1;
    let id = TokenId::from_index(index);
    assert_eq!(id.index(), index);
    assert_eq!(id.get(), index + 1);
    assert_eq!(TokenId::from_index(0), TokenId::new(1));
}

#[test]
#[should_panic(expected = "1-based")]
fn token_id_zero_is_rejected() {
    TokenId::new(0);
}

// === Roles ===

#[test]
fn claim_refuses_a_different_role() {
    let mut t = table(&["dog"]);
    let token = &mut t[TokenId::new(1)];

    assert!(token.claim(Role::Obj));
    assert!(!token.claim(Role::Attr));
    assert_eq!(token.role, Some(Role::Obj));
    // Reclaiming the same role is allowed
    assert!(token.claim(Role::Obj));
}

#[test]
fn self_loop_detection() {
    let mut t = table(&["dog", "cat"]);
    t[TokenId::new(1)].attach(Parent::Token(TokenId::new(1)), Relation::Attr);
    t[TokenId::new(2)].attach(Parent::Token(TokenId::new(1)), Relation::Attr);

    assert!(t[TokenId::new(1)].is_self_loop());
    assert!(!t[TokenId::new(2)].is_self_loop());
}

// === Anchors ===

#[test]
fn anchor_map_never_overwrites() {
    let mut anchors = AnchorMap::new();
    assert!(anchors.insert("dog", TokenId::new(2)));
    assert!(!anchors.insert("dog", TokenId::new(5)));
    assert_eq!(anchors.get("dog"), Some(TokenId::new(2)));
    assert_eq!(anchors.len(), 1);
}

#[test]
fn anchor_map_iterates_in_name_order() {
    let mut anchors = AnchorMap::new();
    anchors.insert("zebra", TokenId::new(1));
    anchors.insert("apple", TokenId::new(3));
    let names: Vec<&str> = anchors.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["apple", "zebra"]);
}

// === Labels ===

#[test]
fn labels_match_conll_vocabulary() {
    assert_eq!(Relation::Same.to_string(), "same");
    assert_eq!(Relation::Attr.to_string(), "ATTR");
    assert_eq!(Relation::Pred.to_string(), "PRED");
    assert_eq!(Relation::Objt.to_string(), "OBJT");
    assert_eq!(Role::Obj.to_string(), "OBJ");
    assert_eq!(Parent::Root.to_string(), "0");
    assert_eq!(Parent::Token(TokenId::new(7)).to_string(), "7");
}
