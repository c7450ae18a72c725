//! Lexicon and corpus fixtures

use scenealign::{Aligner, RegionGraph, SynonymLexicon};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Synonym groups, in the array-of-groups file layout
pub const LEXICON_JSON: &str = r#"[
    ["dog", "puppy", "domestic_dog"],
    ["brown", "brownish"],
    ["on", "along"],
    ["ball", "globe"],
    ["man", "person", "human"]
]"#;

pub fn test_lexicon() -> SynonymLexicon {
    SynonymLexicon::from_json_str(LEXICON_JSON).expect("fixture lexicon parses")
}

pub fn aligner() -> Aligner {
    Aligner::new(Arc::new(test_lexicon()))
}

/// Write the fixture lexicon into `dir` and return its path
pub fn write_lexicon(dir: &Path) -> PathBuf {
    let path = dir.join("lexicon.json");
    std::fs::write(&path, LEXICON_JSON).expect("write lexicon");
    path
}

pub fn fixture_corpus() -> Vec<RegionGraph> {
    vec![
        RegionGraph::new("a dog chases a ball")
            .with_object("dog")
            .with_object("ball")
            .with_relationship("dog", "chases", "ball"),
        RegionGraph::new("a red fire hydrant")
            .with_object("fire hydrant")
            .with_attribute("fire hydrant", ["red"]),
        RegionGraph::new("a brown puppy on the grass")
            .with_object("dog")
            .with_object("grass")
            .with_attribute("dog", ["brown"])
            .with_relationship("dog", "on", "grass"),
        RegionGraph::new("the category of cat")
            .with_object("cat"),
        RegionGraph::new("a person riding a horse")
            .with_object("man")
            .with_object("horse")
            .with_relationship("man", "riding", "horse"),
    ]
}
