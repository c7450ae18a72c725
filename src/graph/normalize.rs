//! Graph normalization: canonical lower-cased, whitespace-collapsed text
//!
//! Every string the aligner compares (phrase words, object names,
//! attribute words, predicates) passes through [`normalize_text`], so
//! exact matching only has to deal with single-space separated words.

use crate::corpus::RegionGraph;

/// Normalize a piece of annotation text.
///
/// Double quotes become spaces, runs of whitespace collapse to a single
/// space, leading/trailing whitespace is dropped and everything is
/// lower-cased.
pub fn normalize_text(text: &str) -> String {
    text.replace('"', " ")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attributes annotated on one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePair {
    pub object: String,
    pub words: Vec<String>,
}

/// A subject–predicate–object relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// A region graph after normalization; read-only once built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedGraph {
    /// Normalized phrase, words joined by single spaces
    pub phrase: String,
    /// Phrase words in order; token `i` (1-based) is `words[i - 1]`
    pub words: Vec<String>,
    pub objects: Vec<String>,
    pub attributes: Vec<AttributePair>,
    pub relations: Vec<RelationTriple>,
}

impl ProcessedGraph {
    pub fn from_region(graph: &RegionGraph) -> Self {
        let phrase = normalize_text(&graph.phrase);
        let words = phrase.split(' ').filter(|w| !w.is_empty()).map(String::from).collect();

        Self {
            phrase,
            words,
            objects: graph.objects.iter().map(|o| normalize_text(o)).collect(),
            attributes: graph
                .attributes
                .iter()
                .map(|(object, words)| AttributePair {
                    object: normalize_text(object),
                    words: words.iter().map(|w| normalize_text(w)).collect(),
                })
                .collect(),
            relations: graph
                .relationships
                .iter()
                .map(|(subject, predicate, object)| RelationTriple {
                    subject: normalize_text(subject),
                    predicate: normalize_text(predicate),
                    object: normalize_text(object),
                })
                .collect(),
        }
    }
}

impl From<&RegionGraph> for ProcessedGraph {
    fn from(graph: &RegionGraph) -> Self {
        Self::from_region(graph)
    }
}
