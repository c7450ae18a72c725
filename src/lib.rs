//! Scenealign: scene-graph to dependency-tree alignment
//!
//! Aligns the objects, attributes and relations of a region graph onto the
//! tokens of its natural-language phrase, producing one labelled dependency
//! tree per phrase.
//!
//! # Core Concepts
//!
//! - **Tokens**: one record per phrase word, carrying parent, edge label and role
//! - **Anchors**: the token representing a named object (tail of its span)
//! - **Rounds**: exact span matching first, synonym overlap second
//!
//! # Example
//!
//! ```
//! use scenealign::{Aligner, RegionGraph, SynonymLexicon};
//! use std::sync::Arc;
//!
//! let graph = RegionGraph::new("a dog chases a ball")
//!     .with_object("dog")
//!     .with_object("ball")
//!     .with_relationship("dog", "chases", "ball");
//!
//! let phrase = Aligner::new(Arc::new(SynonymLexicon::new())).align(&graph).unwrap();
//! assert_eq!(phrase.anchors.get("ball").map(|id| id.get()), Some(5));
//! ```

pub mod align;
pub mod config;
pub mod conll;
pub mod corpus;
pub mod graph;
pub mod lexicon;
pub mod pipeline;

pub use align::{AlignError, AlignMode, AlignedPhrase, Aligner, AlignmentReport};
pub use config::{AlignConfig, ConfigError};
pub use conll::ConllWriter;
pub use corpus::{read_corpus, write_corpus, CorpusError, RegionGraph};
pub use graph::{Parent, Relation, Role, Token, TokenId};
pub use lexicon::{CachedOracle, LexicalOracle, LexiconError, SynonymLexicon, SynonymSet};
pub use pipeline::{ConversionPipeline, ConversionStats, PipelineError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
