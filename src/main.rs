//! Plagiarism Checker CLI
//!
//! Compares documents by TF-IDF cosine similarity, ranks them against a
//! stored reference corpus, and highlights reused sentences.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use plagiarism_checker::compare::{
    add_documents, check_file_against_corpus, compare_with_report, scan_directory,
};
use plagiarism_checker::db::CorpusStore;
use plagiarism_checker::extract::{document_name, extract_file};
use plagiarism_checker::model_store::{rebuild_model, ModelStore, ModelStoreError};
use plagiarism_checker::models::{
    CheckParams, EngineError, DEFAULT_CORPUS_DB, DEFAULT_MODEL_PATH,
};
use plagiarism_checker::output::{
    print_corpus_listing, print_pair_result, print_ranking, print_stats, write_html_report_file,
    write_json_file,
};

#[derive(Parser)]
#[command(name = "plagiarism-checker")]
#[command(about = "TF-IDF plagiarism checking for text, PDF and DOCX documents")]
#[command(version)]
struct Cli {
    /// Only log warnings and errors, hide progress bars
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Locations of the corpus database and the persisted model
#[derive(Args)]
struct StoreArgs {
    /// Path to the corpus database
    #[arg(long, default_value = DEFAULT_CORPUS_DB)]
    corpus_db: PathBuf,

    /// Path to the persisted vocabulary model
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
}

impl StoreArgs {
    fn open(&self) -> Result<(CorpusStore, ModelStore), Box<dyn std::error::Error>> {
        let corpus = CorpusStore::open(&self.corpus_db)?;
        Ok((corpus, ModelStore::new(&self.model)))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two files and highlight reused sentences
    Compare {
        /// Source (original) document
        source: PathBuf,

        /// Suspect document
        suspect: PathBuf,

        /// Minimum sentence similarity to flag [default: 0.8]
        #[arg(long)]
        threshold: Option<f64>,

        /// Write an HTML report with highlighted sentences
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the full result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Compare one file against every file in a directory
    Scan {
        /// Query document
        file: PathBuf,

        /// Directory of documents to compare against
        #[arg(short, long)]
        directory: PathBuf,

        /// Number of results to keep [default: 5]
        #[arg(long)]
        top_k: Option<usize>,

        /// Write the ranking as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Check a file against the stored corpus
    Check {
        /// Suspect document
        file: PathBuf,

        #[command(flatten)]
        store: StoreArgs,

        /// Number of results to keep [default: 5]
        #[arg(long)]
        top_k: Option<usize>,

        /// Write the ranking as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Add files to the corpus and rebuild the model
    Add {
        /// Files to add (.txt, .pdf, .docx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Remove a document from the corpus and rebuild the model
    Remove {
        /// Stored filename
        filename: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List stored documents
    List {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the text of a stored document
    Show {
        /// Stored filename
        filename: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Re-fit the model over the whole corpus
    Rebuild {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show corpus statistics
    Stats {
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Re-fit after a store change. A corpus with no usable terms leaves the
/// model slot empty and is reported, not fatal.
fn refresh_model(
    corpus: &CorpusStore,
    artifacts: &ModelStore,
) -> Result<(), Box<dyn std::error::Error>> {
    match rebuild_model(corpus, artifacts) {
        Ok(_) => Ok(()),
        Err(ModelStoreError::Engine(EngineError::EmptyVocabulary)) => {
            warn!("Corpus has no usable terms, model cleared");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        "plagiarism_checker=warn"
    } else {
        "plagiarism_checker=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let show_progress = !cli.quiet;
    let defaults = CheckParams::default();

    match cli.command {
        Commands::Compare {
            source,
            suspect,
            threshold,
            report,
            json,
        } => {
            let params = CheckParams {
                threshold: threshold.unwrap_or(defaults.threshold),
                ..defaults
            };
            params.validate()?;

            let source_text = extract_file(&source)?;
            let suspect_text = extract_file(&suspect)?;
            let result = compare_with_report(
                &document_name(&source),
                &source_text,
                &document_name(&suspect),
                &suspect_text,
                &params,
            )?;

            print_pair_result(&result);

            if let Some(path) = report {
                write_html_report_file(&result, &path)?;
                info!(path = %path.display(), "HTML report written");
            }
            if let Some(path) = json {
                write_json_file(&result, &path)?;
                info!(path = %path.display(), "JSON written");
            }
        }

        Commands::Scan {
            file,
            directory,
            top_k,
            json,
        } => {
            let params = CheckParams {
                top_k: top_k.unwrap_or(defaults.top_k),
                ..defaults
            };
            params.validate()?;

            let scan = scan_directory(&file, &directory, &params, show_progress)?;
            print_ranking(
                &format!("Similarity to '{}'", scan.query_name),
                &scan.results,
                &scan.skipped,
            );

            if let Some(path) = json {
                write_json_file(&scan, &path)?;
                info!(path = %path.display(), "JSON written");
            }
        }

        Commands::Check {
            file,
            store,
            top_k,
            json,
        } => {
            let params = CheckParams {
                top_k: top_k.unwrap_or(defaults.top_k),
                ..defaults
            };
            params.validate()?;

            let (corpus, artifacts) = store.open()?;
            let check = check_file_against_corpus(&file, &corpus, &artifacts, &params, show_progress)?;
            print_ranking(
                &format!(
                    "Top {} matches for '{}' ({} corpus documents)",
                    params.top_k, check.suspect_name, check.corpus_size
                ),
                &check.results,
                &[],
            );

            if let Some(path) = json {
                write_json_file(&check, &path)?;
                info!(path = %path.display(), "JSON written");
            }
        }

        Commands::Add { files, store } => {
            let (corpus, artifacts) = store.open()?;
            let report = add_documents(&corpus, &files)?;

            println!(
                "Added {}, already stored {}, skipped {}",
                report.added.len(),
                report.duplicates.len(),
                report.skipped.len()
            );
            for doc in &report.skipped {
                println!("  {}: {}", doc.filename, doc.reason);
            }

            if report.changed() {
                refresh_model(&corpus, &artifacts)?;
            }
        }

        Commands::Remove { filename, store } => {
            let (corpus, artifacts) = store.open()?;
            if !corpus.delete(&filename)? {
                return Err(format!("'{}' is not in the corpus", filename).into());
            }
            println!("Removed '{}'", filename);
            refresh_model(&corpus, &artifacts)?;
        }

        Commands::List { store } => {
            let (corpus, _) = store.open()?;
            print_corpus_listing(&corpus.list()?);
        }

        Commands::Show { filename, store } => {
            let (corpus, _) = store.open()?;
            let doc = corpus
                .get(&filename)?
                .ok_or_else(|| format!("'{}' is not in the corpus", filename))?;
            println!("{}", doc.text);
        }

        Commands::Rebuild { store } => {
            let (corpus, artifacts) = store.open()?;
            match rebuild_model(&corpus, &artifacts)? {
                Some(model) => println!(
                    "Model rebuilt: {} documents, {} terms",
                    model.document_count(),
                    model.len()
                ),
                None => println!("Corpus is empty, no model built"),
            }
        }

        Commands::Stats { store } => {
            let (corpus, artifacts) = store.open()?;
            let stats = corpus.stats()?;
            let model = artifacts.load()?;
            print_stats(&stats, model.as_ref().map(|m| m.len()));
        }
    }

    Ok(())
}
