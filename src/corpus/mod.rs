//! Region graph corpora: the records the aligner consumes
//!
//! A corpus is stored as JSON Lines, one [`RegionGraph`] per line:
//!
//! ```json
//! {"phrase":"a dog chases a ball","objects":["dog","ball"],"attributes":[["dog",["brown"]]],"relationships":[["dog","chases","ball"]]}
//! ```

pub mod visual_genome;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading or building a corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CorpusError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;

/// One annotated phrase: the raw input of the aligner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionGraph {
    pub phrase: String,
    #[serde(default)]
    pub objects: Vec<String>,
    /// (object name, attribute words)
    #[serde(default)]
    pub attributes: Vec<(String, Vec<String>)>,
    /// (subject name, predicate, object name)
    #[serde(default)]
    pub relationships: Vec<(String, String, String)>,
}

impl RegionGraph {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            ..Default::default()
        }
    }

    pub fn with_object(mut self, name: impl Into<String>) -> Self {
        self.objects.push(name.into());
        self
    }

    pub fn with_attribute<S: Into<String>>(
        mut self,
        object: impl Into<String>,
        words: impl IntoIterator<Item = S>,
    ) -> Self {
        self.attributes
            .push((object.into(), words.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_relationship(
        mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        self.relationships
            .push((subject.into(), predicate.into(), object.into()));
        self
    }
}

/// Read every region graph from a JSON Lines file
pub fn read_corpus(path: impl AsRef<Path>) -> CorpusResult<Vec<RegionGraph>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CorpusError::io(path, e))?;
    read_corpus_from(BufReader::new(file))
}

/// Read region graphs from any stream of whitespace-separated JSON objects
pub fn read_corpus_from<R: Read>(reader: R) -> CorpusResult<Vec<RegionGraph>> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<RegionGraph>()
        .map(|graph| graph.map_err(CorpusError::from))
        .collect()
}

/// Write region graphs as JSON Lines
pub fn write_corpus(path: impl AsRef<Path>, graphs: &[RegionGraph]) -> CorpusResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| CorpusError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_corpus_to(&mut writer, graphs)?;
    writer.flush()?;
    Ok(())
}

pub fn write_corpus_to<W: Write>(writer: &mut W, graphs: &[RegionGraph]) -> CorpusResult<()> {
    for graph in graphs {
        serde_json::to_writer(&mut *writer, graph)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
