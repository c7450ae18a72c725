//! Concurrent corpus conversion
//!
//! Phrases are aligned on blocking workers, at most `workers` at a time.
//! Each result travels back tagged with its input index and is held in a
//! reorder buffer until every earlier phrase has been written, so the
//! output is identical for any worker count.

use crate::align::{AlignError, AlignedPhrase, Aligner, AlignmentReport};
use crate::config::AlignConfig;
use crate::conll::ConllWriter;
use crate::corpus::{read_corpus, CorpusError, RegionGraph};
use crate::lexicon::{CachedOracle, LexicalOracle, LexiconError, SynonymLexicon};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Output error on {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker pool closed")]
    PoolClosed(#[from] tokio::sync::AcquireError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

type Outcome = Result<AlignedPhrase, AlignError>;

/// Totals over one conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub phrases: usize,
    pub written: usize,
    /// Dropped by the training-mode self-loop guard
    pub rejected: usize,
    /// Written as a bare separator; no tokens after normalization
    pub empty: usize,
    pub tokens: usize,
    pub objects_exact: usize,
    pub objects_synonym: usize,
    pub attributes_attached: usize,
    pub relations_attached: usize,
    pub role_conflicts: usize,
}

impl ConversionStats {
    pub fn absorb(&mut self, report: &AlignmentReport) {
        self.objects_exact += report.objects_exact;
        self.objects_synonym += report.objects_synonym;
        self.attributes_attached += report.attributes_attached;
        self.relations_attached += report.relations_attached;
        self.role_conflicts += report.role_conflicts;
    }

    fn record<W: Write>(&mut self, outcome: Outcome, sink: &mut ConllWriter<W>) -> std::io::Result<()> {
        self.phrases += 1;
        match outcome {
            Ok(phrase) => {
                sink.write_phrase(&phrase)?;
                self.written += 1;
                if phrase.is_empty() {
                    self.empty += 1;
                }
                self.tokens += phrase.tokens.len();
                self.absorb(&phrase.report);
            }
            Err(e) => {
                debug!(error = %e, "phrase rejected");
                self.rejected += 1;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Phrases:     {}", self.phrases)?;
        writeln!(f, "  written:   {}", self.written)?;
        writeln!(f, "  rejected:  {}", self.rejected)?;
        writeln!(f, "  empty:     {}", self.empty)?;
        writeln!(f, "Tokens:      {}", self.tokens)?;
        writeln!(
            f,
            "Objects:     {} exact, {} by synonym",
            self.objects_exact, self.objects_synonym
        )?;
        writeln!(f, "Attributes:  {}", self.attributes_attached)?;
        writeln!(f, "Relations:   {}", self.relations_attached)?;
        write!(f, "Conflicts:   {}", self.role_conflicts)
    }
}

/// Aligns whole corpora and streams them to a CoNLL sink
#[derive(Debug, Clone)]
pub struct ConversionPipeline {
    aligner: Arc<Aligner>,
    workers: usize,
}

impl ConversionPipeline {
    /// Pipeline with a single worker
    pub fn new(aligner: Aligner) -> Self {
        Self {
            aligner: Arc::new(aligner),
            workers: 1,
        }
    }

    /// Build the aligner a configuration describes, loading its lexicon
    pub fn from_config(config: &AlignConfig) -> PipelineResult<Self> {
        let oracle: Arc<dyn LexicalOracle> = match &config.lexicon {
            Some(path) => {
                let lexicon = SynonymLexicon::load(path)?;
                info!(path = %path.display(), entries = lexicon.len(), "loaded lexicon");
                if config.cache_synonyms {
                    Arc::new(CachedOracle::new(lexicon))
                } else {
                    Arc::new(lexicon)
                }
            }
            None => {
                info!("no lexicon configured, synonym matching disabled");
                Arc::new(SynonymLexicon::new())
            }
        };

        let aligner = Aligner::new(oracle).with_mode(config.mode);
        Ok(Self::new(aligner).with_workers(config.worker_count()))
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn aligner(&self) -> &Aligner {
        &self.aligner
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Align every graph and write the results to `sink` in input order
    pub async fn run<W: Write>(
        &self,
        graphs: Vec<RegionGraph>,
        sink: &mut ConllWriter<W>,
    ) -> PipelineResult<ConversionStats> {
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Outcome)>();
        let producer = tokio::spawn(produce(Arc::clone(&self.aligner), self.workers, graphs, tx));

        let mut stats = ConversionStats::default();
        let mut pending: BTreeMap<usize, Outcome> = BTreeMap::new();
        let mut next = 0usize;

        while let Some((index, outcome)) = rx.recv().await {
            pending.insert(index, outcome);
            while let Some(outcome) = pending.remove(&next) {
                if let Err(e) = stats.record(outcome, sink) {
                    producer.abort();
                    return Err(e.into());
                }
                next += 1;
            }
        }
        producer.await??;

        info!(
            phrases = stats.phrases,
            written = stats.written,
            rejected = stats.rejected,
            empty = stats.empty,
            "conversion finished"
        );
        Ok(stats)
    }

    /// Convert a JSON Lines corpus file into a CoNLL file
    pub async fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> PipelineResult<ConversionStats> {
        let input: PathBuf = input.as_ref().to_path_buf();
        let output = output.as_ref();

        let graphs = tokio::task::spawn_blocking(move || read_corpus(input)).await??;
        info!(graphs = graphs.len(), workers = self.workers, "read corpus");

        let file = File::create(output).map_err(|source| PipelineError::Output {
            path: output.display().to_string(),
            source,
        })?;
        let mut sink = ConllWriter::new(BufWriter::new(file));
        let stats = self.run(graphs, &mut sink).await?;
        sink.finish()?;
        Ok(stats)
    }
}

async fn produce(
    aligner: Arc<Aligner>,
    workers: usize,
    graphs: Vec<RegionGraph>,
    tx: mpsc::UnboundedSender<(usize, Outcome)>,
) -> PipelineResult<()> {
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    for (index, graph) in graphs.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let aligner = Arc::clone(&aligner);
        let tx = tx.clone();
        tasks.spawn_blocking(move || {
            let outcome = aligner.align(&graph);
            // Receiver gone means the consumer already failed
            let _ = tx.send((index, outcome));
            drop(permit);
        });
    }
    drop(tx);

    while let Some(joined) = tasks.join_next().await {
        joined?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignMode;

    fn corpus() -> Vec<RegionGraph> {
        (0..40)
            .map(|i| {
                let name = format!("thing{}", i);
                RegionGraph::new(format!("a {} here", name)).with_object(name)
            })
            .collect()
    }

    async fn convert(pipeline: &ConversionPipeline, graphs: Vec<RegionGraph>) -> (String, ConversionStats) {
        let mut sink = ConllWriter::new(Vec::new());
        let stats = pipeline.run(graphs, &mut sink).await.unwrap();
        (String::from_utf8(sink.finish().unwrap()).unwrap(), stats)
    }

    fn pipeline() -> ConversionPipeline {
        ConversionPipeline::new(Aligner::new(Arc::new(SynonymLexicon::new())))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn output_order_is_independent_of_worker_count() {
        let (serial, _) = convert(&pipeline(), corpus()).await;
        let (parallel, stats) = convert(&pipeline().with_workers(8), corpus()).await;

        assert_eq!(serial, parallel);
        assert_eq!(stats.written, 40);
        let second_block = parallel.split("\n\n").nth(1).unwrap();
        assert!(second_block.contains("thing1\t0\t_\tOBJ"));
    }

    #[tokio::test]
    async fn empty_phrase_keeps_its_place_as_a_blank_record() {
        let graphs = vec![
            RegionGraph::new("a dog").with_object("dog"),
            RegionGraph::new("  \" "),
            RegionGraph::new("a cat").with_object("cat"),
        ];
        let (out, stats) = convert(&pipeline().with_workers(2), graphs).await;

        assert_eq!(stats.phrases, 3);
        assert_eq!(stats.written, 3);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.tokens, 4);
        assert_eq!(stats.objects_exact, 2);
        assert_eq!(
            out,
            "1\ta\t_\t_\t_\n2\tdog\t0\t_\tOBJ\n\n\
             \n\
             1\ta\t_\t_\t_\n2\tcat\t0\t_\tOBJ\n\n"
        );
    }

    #[test]
    fn from_config_without_lexicon() {
        let config = AlignConfig::default()
            .with_mode(AlignMode::Evaluation)
            .with_workers(0);
        let pipeline = ConversionPipeline::from_config(&config).unwrap();

        assert_eq!(pipeline.workers(), 1);
        assert_eq!(pipeline.aligner().mode(), AlignMode::Evaluation);
    }

    #[test]
    fn from_config_with_missing_lexicon_fails() {
        let config = AlignConfig::default().with_lexicon("/nonexistent/lexicon.json");
        let err = ConversionPipeline::from_config(&config).unwrap_err();
        assert!(matches!(err, PipelineError::Lexicon(_)));
    }

    #[test]
    fn stats_summary_mentions_counts() {
        let mut stats = ConversionStats {
            phrases: 3,
            written: 2,
            ..Default::default()
        };
        stats.absorb(&AlignmentReport {
            objects_exact: 2,
            objects_synonym: 1,
            ..Default::default()
        });
        let summary = stats.to_string();
        assert!(summary.contains("Phrases:     3"));
        assert!(summary.contains("2 exact, 1 by synonym"));
    }
}
