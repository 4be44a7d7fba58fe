use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ircore::{
    normalize_query, DocId, EngineError, MergeStrategy, RetrievalStats, ScoredDoc, SearchEngine, DEFAULT_SKIP_BY,
};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

const SAMPLES: [(&str, &str); 3] = [
    (
        "sample1.txt",
        "On his return, Caesar married Pompeia, a granddaughter of Sulla. Their marriage ended in scandal.",
    ),
    ("sample2.txt", "It was rumored that Caesar was the father of Servilia's son"),
    ("sample3.txt", "son and father relationship that was an open secret at Rome."),
];

#[derive(Parser)]
#[command(name = "ir")]
#[command(about = "Index .txt documents and answer boolean, adjacency and ranked queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the boolean and positional indexes built from a directory
    Index {
        /// Directory holding the .txt documents
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Run a query through every evaluator
    Search {
        /// Directory holding the .txt documents
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Free-text query, e.g. "caesar and father"
        #[arg(long)]
        query: String,
        /// Relevant document ids for precision and recall, e.g. 1,3
        #[arg(long, value_delimiter = ',')]
        truth: Vec<DocId>,
        /// Skip pointer stride for the skip-pointer merge
        #[arg(long, default_value_t = DEFAULT_SKIP_BY)]
        skip_by: usize,
        /// Emit a JSON report instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a few sample documents into a directory without .txt files
    Samples {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { dir } => {
            let docs = load_documents(&dir)?;
            let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
            let engine = SearchEngine::build(&texts);
            print_documents(&docs);
            println!("Posting lists: {}", serde_json::to_string_pretty(engine.boolean_index())?);
            println!("Positional index: {}", serde_json::to_string_pretty(engine.positional_index())?);
            Ok(())
        }
        Commands::Search { dir, query, truth, skip_by, json } => {
            let strategy = MergeStrategy::skip_pointers(skip_by)?;
            let docs = load_documents(&dir)?;
            let report = search(&docs, &query, &truth, strategy);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_documents(&docs);
                print_report(&report);
            }
            Ok(())
        }
        Commands::Samples { dir } => {
            let written = write_samples(&dir)?;
            for path in written {
                println!("wrote {}", path.display());
            }
            Ok(())
        }
    }
}

#[derive(Debug)]
struct LoadedDoc {
    id: DocId,
    name: String,
    text: String,
}

/// Read every `.txt` file directly under `dir`, sorted by file name; ids start at 1.
fn load_documents(dir: &Path) -> Result<Vec<LoadedDoc>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
            paths.push(p.to_path_buf());
        }
    }
    if paths.is_empty() {
        bail!("no .txt files in {}; `ir samples --dir {}` writes a few", dir.display(), dir.display());
    }

    let mut docs = Vec::with_capacity(paths.len());
    for (p, id) in paths.into_iter().zip(1..) {
        let text = fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))?;
        let name = p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        docs.push(LoadedDoc { id, name, text });
    }
    tracing::info!(dir = %dir.display(), num_docs = docs.len(), "loaded documents");
    Ok(docs)
}

fn write_samples(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    if load_documents(dir).is_ok() {
        bail!("{} already has .txt files", dir.display());
    }
    let mut written = Vec::new();
    for (name, text) in SAMPLES {
        let p = dir.join(name);
        fs::write(&p, text).with_context(|| format!("writing {}", p.display()))?;
        written.push(p);
    }
    Ok(written)
}

#[derive(Debug, Serialize)]
struct SearchReport {
    query: String,
    terms: Vec<String>,
    steps: Vec<StepReport>,
}

#[derive(Debug, Serialize)]
struct StepReport {
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    doc_ids: Vec<DocId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ranking: Vec<ScoredDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<RetrievalStats>,
}

impl StepReport {
    fn new(name: &'static str, outcome: Result<Vec<DocId>, EngineError>, truth: &[DocId]) -> Self {
        match outcome {
            Ok(doc_ids) => {
                let stats = (!truth.is_empty()).then(|| RetrievalStats::compute(&doc_ids, truth));
                Self { name, error: None, doc_ids, ranking: Vec::new(), stats }
            }
            Err(err) => {
                tracing::warn!(step = name, error = %err, "query step failed");
                Self { name, error: Some(err.to_string()), doc_ids: Vec::new(), ranking: Vec::new(), stats: None }
            }
        }
    }
}

/// The four evaluation steps: plain merge, skip-pointer merge, adjacency, ranked adjacency.
fn search(docs: &[LoadedDoc], query: &str, truth: &[DocId], strategy: MergeStrategy) -> SearchReport {
    let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
    let engine = SearchEngine::build(&texts);
    let terms = normalize_query(query);

    let mut steps = vec![
        StepReport::new("posting lists", engine.boolean(&terms, MergeStrategy::Linear), truth),
        StepReport::new("skip pointers", engine.boolean(&terms, strategy), truth),
        StepReport::new(
            "positional index",
            engine.adjacent(&terms).map(|m| m.into_keys().collect()),
            truth,
        ),
    ];
    let ranked = engine.ranked_adjacent(&terms);
    let ranking = ranked.as_ref().map(Vec::clone).unwrap_or_default();
    let mut ranked_step = StepReport::new(
        "ranked positional index",
        ranked.map(|r| r.iter().map(|s| s.doc_id).collect()),
        truth,
    );
    ranked_step.ranking = ranking;
    steps.push(ranked_step);

    SearchReport { query: query.to_string(), terms, steps }
}

fn print_documents(docs: &[LoadedDoc]) {
    for doc in docs {
        println!("Found document {} with id : {}", doc.name, doc.id);
    }
}

fn print_report(report: &SearchReport) {
    println!("Query terms: {}", report.terms.join(", "));
    for (n, step) in report.steps.iter().enumerate() {
        println!("# STEP {} -> {}", n + 1, step.name);
        if let Some(err) = &step.error {
            println!("Error : {err}");
            continue;
        }
        if !step.ranking.is_empty() {
            for (rank, scored) in step.ranking.iter().enumerate() {
                println!("#{} : {} with score of {:.4}", rank + 1, scored.doc_id, scored.score);
            }
            continue;
        }
        let ids: Vec<String> = step.doc_ids.iter().map(|id| id.to_string()).collect();
        println!("found docIds: {}", ids.join(", "));
        if let Some(stats) = &step.stats {
            println!("precision: {}", percent(stats.precision));
            println!("recall: {}", percent(stats.recall));
        }
    }
}

fn percent(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.2}%", r * 100.0))
}
