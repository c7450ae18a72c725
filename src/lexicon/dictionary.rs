//! In-memory synonym lexicon loaded from JSON
//!
//! Two file layouts are accepted:
//!
//! ```json
//! [["dog", "domestic_dog", "canis_familiaris"], ["dog", "frump"]]
//! ```
//!
//! an array of synonym groups, where a word's synonym set is the union of
//! every group it belongs to, or
//!
//! ```json
//! {"dog": ["dog", "domestic_dog", "canis_familiaris", "frump"]}
//! ```
//!
//! an explicit word → identifiers map.

use super::{LexicalOracle, LexiconError, LexiconResult, SynonymSet};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Canonical lookup key: lower-cased, inner whitespace replaced by `_`
pub fn lexical_key(word: &str) -> String {
    word.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LexiconFile {
    Groups(Vec<Vec<String>>),
    Entries(HashMap<String, Vec<String>>),
}

/// Synonym lexicon backed by a hash map
#[derive(Debug, Clone, Default)]
pub struct SynonymLexicon {
    entries: HashMap<String, SynonymSet>,
}

impl SynonymLexicon {
    /// Create an empty lexicon; every lookup returns an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a lexicon from a JSON file
    pub fn load(path: impl AsRef<Path>) -> LexiconResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> LexiconResult<Self> {
        let file: LexiconFile = serde_json::from_str(json)?;
        Ok(match file {
            LexiconFile::Groups(groups) => Self::from_groups(groups),
            LexiconFile::Entries(entries) => {
                let mut lexicon = Self::new();
                for (word, ids) in entries {
                    lexicon.insert(&word, ids);
                }
                lexicon
            }
        })
    }

    /// Build a lexicon from synonym groups
    pub fn from_groups<G, S>(groups: impl IntoIterator<Item = G>) -> Self
    where
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::new();
        for group in groups {
            lexicon.add_group(group);
        }
        lexicon
    }

    /// Add a group of mutually synonymous words.
    ///
    /// Every member gains all members (itself included) as identifiers.
    pub fn add_group<S: AsRef<str>>(&mut self, group: impl IntoIterator<Item = S>) {
        let members: SynonymSet = group
            .into_iter()
            .map(|w| lexical_key(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        for member in &members {
            self.entries
                .entry(member.clone())
                .or_default()
                .extend(members.iter().cloned());
        }
    }

    /// Add identifiers for a single word
    pub fn insert<S: AsRef<str>>(&mut self, word: &str, ids: impl IntoIterator<Item = S>) {
        let key = lexical_key(word);
        if key.is_empty() {
            return;
        }
        self.entries
            .entry(key)
            .or_default()
            .extend(ids.into_iter().map(|id| lexical_key(id.as_ref())));
    }

    /// Number of words with at least one entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LexicalOracle for SynonymLexicon {
    fn synonyms(&self, word: &str) -> SynonymSet {
        self.entries
            .get(&lexical_key(word))
            .cloned()
            .unwrap_or_default()
    }
}
