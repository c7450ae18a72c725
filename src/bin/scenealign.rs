//! Scenealign CLI: build region-graph corpora and convert them to CoNLL trees.
//!
//! Usage:
//!   scenealign convert --input corpus.jsonl --output trees.conll [--lexicon syn.json] [--eval]
//!   scenealign build-corpus --image-data .. --region-graphs .. --attributes .. --output corpus.jsonl
//!   scenealign inspect --input corpus.jsonl [--limit N]

use clap::{ArgAction, Parser, Subcommand};
use scenealign::corpus::visual_genome::{VisualGenomeBuilder, VisualGenomeSources};
use scenealign::{read_corpus, write_corpus, AlignConfig, AlignMode, ConversionPipeline};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "scenealign",
    version,
    about = "Align scene graphs onto their phrases as dependency trees"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a JSON Lines corpus and write CoNLL trees
    Convert {
        /// Region-graph corpus (JSON Lines)
        #[arg(long)]
        input: PathBuf,
        /// CoNLL output file
        #[arg(long)]
        output: PathBuf,
        /// Synonym lexicon (JSON)
        #[arg(long)]
        lexicon: Option<PathBuf>,
        /// Evaluation mode: keep phrases the training guard would drop
        #[arg(long)]
        eval: bool,
        /// Phrases aligned concurrently
        #[arg(long)]
        workers: Option<usize>,
        /// Configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Build a JSON Lines corpus from Visual Genome files
    BuildCorpus {
        #[arg(long)]
        image_data: PathBuf,
        #[arg(long)]
        region_graphs: PathBuf,
        #[arg(long)]
        attributes: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Keep images without a COCO id
        #[arg(long)]
        all_images: bool,
        /// Configuration file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the first region graphs of a corpus
    Inspect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install logger: {}", e);
    }
}

fn load_config(path: Option<&Path>) -> Result<AlignConfig, i32> {
    AlignConfig::load_or_default(path).map_err(|e| {
        eprintln!("Error: {}", e);
        1
    })
}

fn runtime() -> Result<tokio::runtime::Runtime, i32> {
    tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("failed to create tokio runtime: {}", e);
        1
    })
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    lexicon: Option<PathBuf>,
    eval: bool,
    workers: Option<usize>,
    config: Option<&Path>,
) -> i32 {
    let mut config = match load_config(config) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Some(lexicon) = lexicon {
        config = config.with_lexicon(lexicon);
    }
    if eval {
        config = config.with_mode(AlignMode::Evaluation);
    }
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }

    let pipeline = match ConversionPipeline::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    match rt.block_on(pipeline.convert_file(input, output)) {
        Ok(stats) => {
            println!("Wrote {}", output.display());
            println!("{}", stats);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_build_corpus(sources: VisualGenomeSources, output: &Path, all_images: bool, config: Option<&Path>) -> i32 {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let builder = VisualGenomeBuilder::new()
        .with_coco_only(config.coco_only && !all_images)
        .with_workers(config.worker_count());
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    let graphs = match rt.block_on(builder.build(&sources)) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match write_corpus(output, &graphs) {
        Ok(()) => {
            println!("Wrote {} region graphs to {}", graphs.len(), output.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_inspect(input: &Path, limit: usize) -> i32 {
    let graphs = match read_corpus(input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("{} region graphs", graphs.len());
    for (i, graph) in graphs.iter().take(limit).enumerate() {
        println!();
        println!("[{}] {}", i, graph.phrase);
        if !graph.objects.is_empty() {
            println!("  objects:    {}", graph.objects.join(", "));
        }
        for (object, words) in &graph.attributes {
            println!("  attribute:  {} <- {}", object, words.join(", "));
        }
        for (subject, predicate, object) in &graph.relationships {
            println!("  relation:   {} -{}-> {}", subject, predicate, object);
        }
    }
    0
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Commands::Convert {
            input,
            output,
            lexicon,
            eval,
            workers,
            config,
        } => cmd_convert(&input, &output, lexicon, eval, workers, config.as_deref()),
        Commands::BuildCorpus {
            image_data,
            region_graphs,
            attributes,
            output,
            all_images,
            config,
        } => {
            let sources = VisualGenomeSources {
                image_data,
                region_graphs,
                attributes,
            };
            cmd_build_corpus(sources, &output, all_images, config.as_deref())
        }
        Commands::Inspect { input, limit } => cmd_inspect(&input, limit),
    };
    std::process::exit(code);
}
