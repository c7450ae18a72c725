//! Memoizing oracle wrapper shared across phrase workers

use super::{LexicalOracle, SynonymSet};
use dashmap::DashMap;

/// Caches the synonym sets returned by an inner oracle.
///
/// The inner oracle is pure, so a cached answer is always the answer it
/// would give again. Concurrent misses on the same word may both call the
/// inner oracle; the first insert wins.
#[derive(Debug)]
pub struct CachedOracle<O> {
    inner: O,
    cache: DashMap<String, SynonymSet>,
}

impl<O: LexicalOracle> CachedOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of distinct words looked up so far
    pub fn cached_words(&self) -> usize {
        self.cache.len()
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: LexicalOracle> LexicalOracle for CachedOracle<O> {
    fn synonyms(&self, word: &str) -> SynonymSet {
        if let Some(hit) = self.cache.get(word) {
            return hit.clone();
        }
        let computed = self.inner.synonyms(word);
        self.cache
            .entry(word.to_string())
            .or_insert(computed)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::SynonymLexicon;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let oracle = CachedOracle::new(move |word: &str| -> SynonymSet {
            counter.fetch_add(1, Ordering::SeqCst);
            [word.to_uppercase()].into_iter().collect()
        });

        let first = oracle.synonyms("dog");
        let second = oracle.synonyms("dog");
        oracle.synonyms("cat");

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(oracle.cached_words(), 2);
    }

    #[test]
    fn cached_answers_match_the_inner_oracle() {
        let lexicon = SynonymLexicon::from_groups([["dog", "puppy"]]);
        let oracle = CachedOracle::new(lexicon.clone());

        for word in ["dog", "puppy", "the", "dog"] {
            assert_eq!(oracle.synonyms(word), lexicon.synonyms(word));
        }
    }

    #[test]
    fn shared_across_threads() {
        let oracle = Arc::new(CachedOracle::new(SynonymLexicon::from_groups([[
            "ball", "globe",
        ]])));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let oracle = Arc::clone(&oracle);
                std::thread::spawn(move || oracle.synonyms("ball").len())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        assert_eq!(oracle.cached_words(), 1);
    }
}
