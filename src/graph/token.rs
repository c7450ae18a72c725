//! Token representation: one mutable alignment record per phrase token

use crate::lexicon::SynonymSet;
use std::num::NonZeroUsize;

/// 1-based position of a token in its phrase; its permanent identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(NonZeroUsize);

impl TokenId {
    /// Create a TokenId from its 1-based position.
    ///
    /// Panics on `0`, which names no token.
    pub fn new(id: usize) -> Self {
        match NonZeroUsize::new(id) {
            Some(id) => Self(id),
            None => panic!("token ids are 1-based"),
        }
    }

    /// Create a TokenId from a 0-based index into the token sequence
    pub fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    /// 0-based index into the token sequence
    pub fn index(self) -> usize {
        self.0.get() - 1
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target of a token's ownership edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Top-level entity; written as `0`
    Root,
    /// Another token of the same phrase
    Token(TokenId),
}

impl std::fmt::Display for Parent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "0"),
            Self::Token(id) => write!(f, "{}", id),
        }
    }
}

/// Label on the edge from a token to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Non-tail word of a multi-word span, pointing at the next word
    Same,
    /// Attribute attached to an object anchor
    Attr,
    /// Predicate attached to its subject anchor
    Pred,
    /// Object anchor attached to the predicate of a relation
    Objt,
}

impl Relation {
    /// Label as written in CoNLL output
    pub fn label(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Attr => "ATTR",
            Self::Pred => "PRED",
            Self::Objt => "OBJT",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Semantic function of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Obj,
    Attr,
    Pred,
}

impl Role {
    /// Label as written in CoNLL output
    pub fn label(self) -> &'static str {
        match self {
            Self::Obj => "OBJ",
            Self::Attr => "ATTR",
            Self::Pred => "PRED",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Alignment state of a single phrase token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    /// Normalized token text; never rewritten during alignment
    pub text: String,
    /// Synonym identifiers for `text`, looked up once
    pub synonyms: SynonymSet,
    pub parent: Option<Parent>,
    pub relation: Option<Relation>,
    pub role: Option<Role>,
}

impl Token {
    pub fn new(id: TokenId, text: impl Into<String>, synonyms: SynonymSet) -> Self {
        Self {
            id,
            text: text.into(),
            synonyms,
            parent: None,
            relation: None,
            role: None,
        }
    }

    /// True when no role has been assigned yet
    pub fn is_free(&self) -> bool {
        self.role.is_none()
    }

    /// True when the token already carries a role other than `role`
    pub fn conflicts_with(&self, role: Role) -> bool {
        self.role.is_some_and(|current| current != role)
    }

    /// Assign `role` unless a different role is already set.
    ///
    /// Returns false (and leaves the token untouched) on conflict.
    pub fn claim(&mut self, role: Role) -> bool {
        if self.conflicts_with(role) {
            return false;
        }
        self.role = Some(role);
        true
    }

    /// Point this token at `parent` with the given edge label
    pub fn attach(&mut self, parent: Parent, relation: Relation) {
        self.parent = Some(parent);
        self.relation = Some(relation);
    }

    /// True when the token is its own parent
    pub fn is_self_loop(&self) -> bool {
        self.parent == Some(Parent::Token(self.id))
    }
}
