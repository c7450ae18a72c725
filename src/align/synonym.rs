//! Greedy synonym-overlap matching against free tokens

use crate::graph::{TokenId, TokenTable};
use crate::lexicon::LexicalOracle;

/// Find the free token whose synonym set overlaps most with `word`'s.
///
/// Multi-word input is looked up as one unit (`"fire hydrant"` →
/// `"fire_hydrant"`). Tokens that already carry a role are never
/// considered. Scanning is in ascending id order and only a strictly
/// larger overlap replaces the current best, so ties go to the earliest
/// token. Returns `None` when no free token shares any identifier.
pub fn match_synonym(word: &str, table: &TokenTable, oracle: &dyn LexicalOracle) -> Option<TokenId> {
    let unit = word.split_whitespace().collect::<Vec<_>>().join("_");
    let target = oracle.synonyms(&unit);
    if target.is_empty() {
        return None;
    }

    let mut best: Option<(TokenId, usize)> = None;
    for token in table.iter().filter(|t| t.is_free()) {
        let overlap = target.intersection(&token.synonyms).count();
        if overlap > best.map_or(0, |(_, max)| max) {
            best = Some((token.id, overlap));
        }
    }
    best.map(|(id, _)| id)
}
