//! Token table and anchor map: the per-phrase state the aligner mutates

use super::token::{Parent, Relation, Token, TokenId};
use crate::lexicon::LexicalOracle;
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

/// Fixed-size table of tokens for one phrase.
///
/// Created once from the phrase words and never resized; tokens are
/// mutated in place.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    tokens: Vec<Token>,
}

impl TokenTable {
    /// Build the table, looking up each word's synonyms exactly once
    pub fn from_words<S: AsRef<str>>(words: &[S], oracle: &dyn LexicalOracle) -> Self {
        let tokens = words
            .iter()
            .enumerate()
            .map(|(index, word)| {
                let word = word.as_ref();
                Token::new(TokenId::from_index(index), word, oracle.synonyms(word))
            })
            .collect();
        Self { tokens }
    }

    /// Build a table from already-initialized tokens
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.tokens.iter_mut()
    }

    /// Chain a span right-to-left: every non-tail token points at the next
    /// token with a `Same` edge. The tail is left untouched.
    pub fn link_span(&mut self, span: &[TokenId]) {
        for pair in span.windows(2) {
            self[pair[0]].attach(Parent::Token(pair[1]), Relation::Same);
        }
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl Index<TokenId> for TokenTable {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }
}

impl IndexMut<TokenId> for TokenTable {
    fn index_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.tokens[id.index()]
    }
}

/// Object name → anchor token id.
///
/// Grows monotonically: an entry, once written, is never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorMap {
    anchors: BTreeMap<String, TokenId>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anchor for `name` if it has none yet.
    ///
    /// Returns true when a new entry was added.
    pub fn insert(&mut self, name: impl Into<String>, id: TokenId) -> bool {
        let name = name.into();
        if self.anchors.contains_key(&name) {
            return false;
        }
        self.anchors.insert(name, id);
        true
    }

    pub fn get(&self, name: &str) -> Option<TokenId> {
        self.anchors.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.anchors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, TokenId)> {
        self.anchors.iter().map(|(name, id)| (name.as_str(), *id))
    }
}
