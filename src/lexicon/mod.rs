//! Lexical oracle: word → set of synonym identifiers
//!
//! The aligner only ever asks one question of the lexicon: which synonym
//! identifiers does this word have? Two words are similar when their sets
//! intersect. The oracle must be pure; it is shared across phrase workers.

mod cache;
mod dictionary;

pub use cache::CachedOracle;
pub use dictionary::{lexical_key, SynonymLexicon};

use std::collections::BTreeSet;
use thiserror::Error;

/// Synonym identifiers of a word, kept ordered for deterministic output
pub type SynonymSet = BTreeSet<String>;

/// Errors that can occur while loading a lexicon
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("IO error reading lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for lexicon operations
pub type LexiconResult<T> = Result<T, LexiconError>;

/// Source of synonym sets.
///
/// Implementations must be side-effect free and safe for concurrent use.
/// An unknown word yields an empty set.
pub trait LexicalOracle: Send + Sync {
    fn synonyms(&self, word: &str) -> SynonymSet;
}

impl<F> LexicalOracle for F
where
    F: Fn(&str) -> SynonymSet + Send + Sync,
{
    fn synonyms(&self, word: &str) -> SynonymSet {
        self(word)
    }
}
