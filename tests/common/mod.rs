//! Shared fixtures for the integration tests
//!
//! A small synonym lexicon and a handful of Visual Genome style region
//! graphs whose alignments are known by hand.

pub mod fixtures;

pub use fixtures::{aligner, fixture_corpus, test_lexicon, write_lexicon};
