//! Exact span location on word boundaries

use crate::graph::TokenId;

/// Find `candidate` as a contiguous, word-boundary-exact run of `words`.
///
/// Returns the ids of the leftmost matching span, head first, or an empty
/// vector when the candidate does not occur. A candidate never matches
/// inside a longer word: `"cat"` is not found in `["category"]`.
pub fn locate<S: AsRef<str>>(candidate: &str, words: &[S]) -> Vec<TokenId> {
    let width = candidate.split_whitespace().count();
    if width == 0 {
        return Vec::new();
    }

    let mut sentence = String::from(" ");
    for word in words {
        sentence.push_str(word.as_ref());
        sentence.push(' ');
    }

    let needle = format!(" {} ", candidate);
    let Some(offset) = sentence.find(&needle) else {
        return Vec::new();
    };

    // Words fully before the match; the byte at `offset` is the separator space
    let head = sentence[..=offset].split_whitespace().count();
    (head..head + width).map(TokenId::from_index).collect()
}
