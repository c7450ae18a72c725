//! Per-phrase data model: tokens, the token table, anchors and normalized graphs

mod normalize;
mod table;
mod token;

#[cfg(test)]
mod tests;

pub use normalize::{normalize_text, AttributePair, ProcessedGraph, RelationTriple};
pub use table::{AnchorMap, TokenTable};
pub use token::{Parent, Relation, Role, Token, TokenId};
