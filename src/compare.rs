//! Check orchestration.
//!
//! This module ties the engine to its inputs: pairwise comparison of two
//! texts, ranking a document against the stored corpus, scanning a
//! directory, and feeding files into the corpus store.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{CorpusStore, DbError};
use crate::detect::{match_sentences, render_highlighted};
use crate::extract::{document_name, extract_file, ExtractError};
use crate::model_store::{ModelStore, ModelStoreError};
use crate::models::*;
use crate::sentence::split_into_sentences;
use crate::similarity::{cosine, rank, score_to_percentage};
use crate::vector::{fit_transform, transform_text, SparseVector};
use crate::vocab::VocabularyModel;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    ModelStore(#[from] ModelStoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("'{0}' is already in the corpus")]
    AlreadyInCorpus(String),
    #[error("no model available, add documents to the corpus first")]
    NoModel,
}

fn progress_bar(len: usize, show_progress: bool) -> Option<ProgressBar> {
    if !show_progress {
        return None;
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    Some(pb)
}

fn to_ranked(ranking: Vec<(String, f64)>) -> Vec<RankedDocument> {
    ranking
        .into_iter()
        .map(|(filename, score)| RankedDocument {
            filename,
            score,
            percentage: score_to_percentage(score),
        })
        .collect()
}

/// Whole-document similarity of two texts in a space fit over just them.
pub fn compare_texts(text_a: &str, text_b: &str) -> Result<PairComparison, CompareError> {
    let (model, vectors) = fit_transform(&[text_a, text_b])?;
    let score = cosine(&vectors[0], &vectors[1])?;
    debug!(terms = model.len(), score, "Compared texts");

    Ok(PairComparison {
        score,
        percentage: score_to_percentage(score),
    })
}

/// Compare two texts and break the suspect down sentence by sentence.
pub fn compare_with_report(
    source_name: &str,
    source_text: &str,
    suspect_name: &str,
    suspect_text: &str,
    params: &CheckParams,
) -> Result<PairReport, CompareError> {
    let comparison = compare_texts(source_text, suspect_text)?;

    let source_sentences = split_into_sentences(source_text);
    let suspect_sentences = split_into_sentences(suspect_text);
    let matches = match_sentences(&source_sentences, &suspect_sentences, params.threshold);
    let rendered = render_highlighted(&suspect_sentences, &matches);

    info!(
        source = source_name,
        suspect = suspect_name,
        percentage = comparison.percentage,
        flagged = matches.match_count(),
        "Pairwise comparison done"
    );

    Ok(PairReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        source_name: source_name.to_string(),
        suspect_name: suspect_name.to_string(),
        parameters: params.clone(),
        comparison,
        suspect_sentences: suspect_sentences.iter().map(|s| s.to_string()).collect(),
        matches,
        rendered,
    })
}

/// Rank the stored corpus against a suspect text using the persisted model.
///
/// A suspect whose filename is already stored is refused, since it would
/// rank itself first.
pub fn check_against_corpus(
    suspect_name: &str,
    suspect_text: &str,
    corpus: &CorpusStore,
    model: &VocabularyModel,
    params: &CheckParams,
    show_progress: bool,
) -> Result<CorpusCheck, CompareError> {
    if corpus.contains(suspect_name)? {
        return Err(CompareError::AlreadyInCorpus(suspect_name.to_string()));
    }

    let documents = corpus.list()?;
    if show_progress {
        eprintln!("Vectorizing {} corpus documents...", documents.len());
    }

    let progress = progress_bar(documents.len(), show_progress);
    let corpus_vectors: Vec<(String, SparseVector)> = documents
        .par_iter()
        .map(|doc| {
            let vector = transform_text(&doc.text, model);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            (doc.filename.clone(), vector)
        })
        .collect();
    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let query = transform_text(suspect_text, model);
    if query.is_zero() {
        warn!(
            suspect = suspect_name,
            "Suspect shares no terms with the model, every score is 0"
        );
    }
    let ranking = rank(&query, &corpus_vectors, params.top_k)?;

    Ok(CorpusCheck {
        version: env!("CARGO_PKG_VERSION").to_string(),
        suspect_name: suspect_name.to_string(),
        corpus_size: documents.len(),
        vocabulary_size: model.len(),
        results: to_ranked(ranking),
    })
}

/// Extract a file and check it against the corpus with the stored model.
pub fn check_file_against_corpus(
    path: &Path,
    corpus: &CorpusStore,
    artifacts: &ModelStore,
    params: &CheckParams,
    show_progress: bool,
) -> Result<CorpusCheck, CompareError> {
    let text = extract_file(path)?;
    let model = artifacts.load()?.ok_or(CompareError::NoModel)?;
    check_against_corpus(
        &document_name(path),
        &text,
        corpus,
        &model,
        params,
        show_progress,
    )
}

/// Regular files directly inside `dir`, sorted by path.
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, CompareError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Compare one file against every readable file in `dir`.
///
/// Files that cannot be extracted are skipped and reported. The space is fit
/// over the query plus the readable files.
pub fn scan_directory(
    query_path: &Path,
    dir: &Path,
    params: &CheckParams,
    show_progress: bool,
) -> Result<DirectoryScan, CompareError> {
    let query_text = extract_file(query_path)?;
    let files: Vec<PathBuf> = list_directory(dir)?
        .into_iter()
        .filter(|path| !same_file(path, query_path))
        .collect();

    if show_progress {
        eprintln!("Reading {} files from {}...", files.len(), dir.display());
    }

    let progress = progress_bar(files.len(), show_progress);
    let extracted: Vec<(String, Result<String, ExtractError>)> = files
        .par_iter()
        .map(|path| {
            let result = extract_file(path);
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            (document_name(path), result)
        })
        .collect();
    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let mut names = Vec::new();
    let mut texts = vec![query_text];
    let mut skipped = Vec::new();
    for (filename, result) in extracted {
        match result {
            Ok(text) => {
                names.push(filename);
                texts.push(text);
            }
            Err(err) => {
                warn!(file = %filename, error = %err, "Skipping unreadable file");
                skipped.push(SkippedDocument {
                    filename,
                    reason: err.to_string(),
                });
            }
        }
    }

    let results = if names.is_empty() {
        Vec::new()
    } else {
        let (_, mut vectors) = fit_transform(&texts)?;
        let corpus: Vec<(String, SparseVector)> =
            names.into_iter().zip(vectors.split_off(1)).collect();
        to_ranked(rank(&vectors[0], &corpus, params.top_k)?)
    };

    Ok(DirectoryScan {
        version: env!("CARGO_PKG_VERSION").to_string(),
        query_name: document_name(query_path),
        results,
        skipped,
    })
}

/// Extract each file and insert it into the corpus.
///
/// Duplicates (by filename) and unreadable files are reported, not fatal.
/// The caller is responsible for rebuilding the model afterwards.
pub fn add_documents(corpus: &CorpusStore, paths: &[PathBuf]) -> Result<AddReport, CompareError> {
    let mut report = AddReport::default();

    for path in paths {
        let filename = document_name(path);
        let text = match extract_file(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(file = %filename, error = %err, "Skipping unreadable file");
                report.skipped.push(SkippedDocument {
                    filename,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        if corpus.insert(&filename, &text)? {
            info!(file = %filename, "Added to corpus");
            report.added.push(filename);
        } else {
            info!(file = %filename, "Already in corpus, kept the stored copy");
            report.duplicates.push(filename);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_compare_identical_and_disjoint() {
        let same = compare_texts("the cat sat", "the cat sat").unwrap();
        assert_eq!(same.percentage, 100.0);

        let disjoint = compare_texts("apples oranges", "trucks engines").unwrap();
        assert_eq!(disjoint.score, 0.0);
        assert_eq!(disjoint.percentage, 0.0);
    }

    #[test]
    fn test_compare_stopwords_only_is_an_error() {
        assert!(matches!(
            compare_texts("the and", "of a"),
            Err(CompareError::Engine(EngineError::EmptyVocabulary))
        ));
    }

    #[test]
    fn test_compare_with_report() {
        let report = compare_with_report(
            "source.txt",
            "The sky is blue.",
            "suspect.txt",
            "The sky is blue. Birds fly high.",
            &CheckParams::default(),
        )
        .unwrap();

        assert_eq!(report.suspect_sentences.len(), 2);
        assert_eq!(report.matches.matched, vec![0]);
        assert!(report.rendered.starts_with("<mark class=\"highlight\">"));
        assert!(report.comparison.score > 0.0 && report.comparison.score < 1.0);
    }

    #[test]
    fn test_check_against_corpus() {
        let corpus = CorpusStore::open_in_memory().unwrap();
        corpus.insert("cats.txt", "cats chase mice in the barn").unwrap();
        corpus.insert("cars.txt", "engines power fast cars").unwrap();
        corpus.insert("dogs.txt", "dogs chase cats").unwrap();

        let texts: Vec<String> = corpus.list().unwrap().into_iter().map(|d| d.text).collect();
        let model = VocabularyModel::fit(&texts).unwrap();
        let params = CheckParams {
            top_k: 2,
            ..Default::default()
        };

        let check = check_against_corpus(
            "suspect.txt",
            "a cat chasing mice",
            &corpus,
            &model,
            &params,
            false,
        )
        .unwrap();

        assert_eq!(check.corpus_size, 3);
        assert_eq!(check.results.len(), 2);
        assert_eq!(check.results[0].filename, "cats.txt");
        assert!(check.results[0].score >= check.results[1].score);
    }

    #[test]
    fn test_check_refuses_stored_filename() {
        let corpus = CorpusStore::open_in_memory().unwrap();
        corpus.insert("a.txt", "cats chase mice").unwrap();
        let model = VocabularyModel::fit(&["cats chase mice"]).unwrap();

        let err = check_against_corpus(
            "a.txt",
            "cats",
            &corpus,
            &model,
            &CheckParams::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CompareError::AlreadyInCorpus(name) if name == "a.txt"));
    }

    #[test]
    fn test_check_file_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let suspect = dir.path().join("suspect.txt");
        fs::write(&suspect, "cats chase mice").unwrap();

        let corpus = CorpusStore::open_in_memory().unwrap();
        let artifacts = ModelStore::new(dir.path().join("model.json"));
        let err = check_file_against_corpus(
            &suspect,
            &corpus,
            &artifacts,
            &CheckParams::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CompareError::NoModel));
    }

    #[test]
    fn test_scan_directory_skips_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let query = dir.path().join("query.txt");
        fs::write(&query, "cats chase mice").unwrap();
        fs::write(dir.path().join("b.txt"), "cats chase mice daily").unwrap();
        fs::write(dir.path().join("a.txt"), "engines power cars").unwrap();
        fs::write(dir.path().join("notes.md"), "cats").unwrap();

        let scan = scan_directory(&query, dir.path(), &CheckParams::default(), false).unwrap();

        assert_eq!(scan.query_name, "query.txt");
        assert_eq!(scan.results.len(), 2);
        assert_eq!(scan.results[0].filename, "b.txt");
        assert_eq!(scan.results[1].filename, "a.txt");
        assert_eq!(scan.results[1].score, 0.0);
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].filename, "notes.md");
    }

    #[test]
    fn test_add_documents() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let bad = dir.path().join("b.rtf");
        fs::write(&a, "first text").unwrap();
        fs::write(&bad, "rich text").unwrap();

        let corpus = CorpusStore::open_in_memory().unwrap();
        let report = add_documents(&corpus, &[a.clone(), bad, a]).unwrap();

        assert_eq!(report.added, vec!["a.txt"]);
        assert_eq!(report.duplicates, vec!["a.txt"]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.changed());
        assert_eq!(corpus.len().unwrap(), 1);
    }
}
