use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch_core::{
    build_indexes, load_corpus, Corpus, EngineConfig, EnglishPreprocessor, IndexBundle, SearchModel, Searcher,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Boolean, inverted-index and TF-IDF search over a directory of text files", long_about = None)]
pub struct Cli {
    /// Directory holding the corpus (*.txt, ordered by file name)
    #[arg(long, global = true, default_value = "./Dataset")]
    pub corpus: PathBuf,
    /// Optional JSON file with engine limits
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Keep word forms as they are instead of stemming
    #[arg(long, global = true, default_value_t = false)]
    pub no_stem: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the indexes and print their sizes
    Stats,
    /// Run one query
    Search {
        /// incidence, inverted or tfidf
        #[arg(long, default_value = "inverted")]
        model: SearchModel,
        /// Number of ranked results (tfidf only)
        #[arg(long)]
        k: Option<usize>,
        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Free-text query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List vocabulary terms with their document frequency
    Vocab {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Serialize)]
struct HitReport<'a> {
    doc_id: u32,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
}

#[derive(Serialize)]
struct SearchReport<'a> {
    query: &'a str,
    model: SearchModel,
    query_terms: &'a [String],
    total_hits: usize,
    results: Vec<HitReport<'a>>,
}

struct Loaded {
    corpus: Corpus,
    bundle: IndexBundle,
}

fn load(cli: &Cli, pre: &EnglishPreprocessor) -> Result<Loaded> {
    let corpus = load_corpus(&cli.corpus).with_context(|| format!("loading corpus from {}", cli.corpus.display()))?;
    let docs = corpus.preprocess(pre);
    let bundle = build_indexes(&docs).context("building indexes")?;
    tracing::info!(num_docs = corpus.len(), num_terms = bundle.vocabulary.len(), ranked = bundle.tfidf.is_some(), "corpus indexed");
    Ok(Loaded { corpus, bundle })
}

pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let pre = EnglishPreprocessor::new().with_stemming(!cli.no_stem);
    let loaded = load(&cli, &pre)?;

    match &cli.command {
        Commands::Stats => {
            let stats = loaded.bundle.stats();
            writeln!(out, "documents:        {}", stats.num_docs)?;
            writeln!(out, "vocabulary terms: {}", stats.num_terms)?;
            writeln!(out, "postings:         {}", stats.num_postings)?;
            writeln!(out, "tf-idf terms:     {}", stats.num_tfidf_terms)?;
        }
        Commands::Search { model, k, json, query } => {
            let query = query.join(" ");
            let searcher = Searcher::new(&loaded.bundle, &pre, &config);
            let outcome = searcher.search(*model, &query, *k)?;
            let results: Vec<HitReport> = outcome
                .hits
                .iter()
                .map(|h| HitReport {
                    doc_id: h.doc_id,
                    name: loaded.corpus.names.get(h.doc_id as usize).map(String::as_str).unwrap_or(""),
                    score: h.score,
                })
                .collect();
            if *json {
                let report = SearchReport {
                    query: &query,
                    model: *model,
                    query_terms: &outcome.query_terms,
                    total_hits: results.len(),
                    results,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "processed query terms: {:?}", outcome.query_terms)?;
                if model.is_ranked() {
                    writeln!(out, "top {} documents by cosine similarity:", results.len())?;
                } else {
                    writeln!(out, "found {} documents containing all query terms", results.len())?;
                }
                for hit in &results {
                    match hit.score {
                        Some(score) => writeln!(out, "{:>4}  {:.4}  {}", hit.doc_id, score, hit.name)?,
                        None => writeln!(out, "{:>4}  {}", hit.doc_id, hit.name)?,
                    }
                }
            }
        }
        Commands::Vocab { limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            for term in loaded.bundle.vocabulary.iter().take(limit) {
                writeln!(out, "{}\t{}", term, loaded.bundle.inverted.doc_freq(term))?;
            }
        }
    }
    Ok(())
}
