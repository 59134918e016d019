//! Integration tests for plagiarism-checker.
//!
//! These tests drive the public API end to end: fitting, scoring, sentence
//! matching, and the corpus store with its persisted model.

use plagiarism_checker::compare::{
    add_documents, check_against_corpus, check_file_against_corpus, compare_texts,
    scan_directory, CompareError,
};
use plagiarism_checker::db::CorpusStore;
use plagiarism_checker::detect::{detect, DEFAULT_THRESHOLD};
use plagiarism_checker::model_store::{rebuild_model, ModelStore, ModelStoreError};
use plagiarism_checker::models::{CheckParams, EngineError};
use plagiarism_checker::similarity::{cosine, rank};
use plagiarism_checker::vector::{fit_transform, transform_text};
use plagiarism_checker::vocab::{smoothed_idf, VocabularyModel};
use std::fs;

const ESSAYS: [&str; 4] = [
    "Rivers carve deep valleys through soft rock over thousands of years.",
    "Glaciers moved across the northern plains and left lakes behind them.",
    "Volcanic islands rise from the ocean floor as lava cools and hardens.",
    "Wind erodes desert stone into arches, towers and strange shapes.",
];

#[test]
fn test_fit_builds_expected_vocabulary() {
    let model = VocabularyModel::fit(&["the cat sat", "the cat sat on the mat"]).unwrap();

    assert_eq!(model.terms(), &["cat", "mat", "sat"]);
    assert_eq!(model.document_count(), 2);
    assert_eq!(model.document_frequency("cat"), Some(2));
    assert_eq!(model.document_frequency("mat"), Some(1));
    assert!(!model.contains("the"));
    assert!((model.idf("cat").unwrap() - 1.0).abs() < 1e-12);
    assert!((model.idf("mat").unwrap() - smoothed_idf(2, 1)).abs() < 1e-12);
}

#[test]
fn test_identical_texts_score_full() {
    let text = "Photosynthesis converts light energy into chemical energy in plants.";
    let result = compare_texts(text, text).unwrap();
    assert_eq!(result.percentage, 100.0);
}

#[test]
fn test_disjoint_texts_score_zero() {
    let result = compare_texts("apples oranges bananas", "trucks engines wheels").unwrap();
    assert_eq!(result.score, 0.0);
    assert_eq!(result.percentage, 0.0);
}

#[test]
fn test_similarity_is_symmetric_and_bounded() {
    let a = ESSAYS[0];
    let b = "Deep valleys are carved by rivers in soft rock.";

    let ab = compare_texts(a, b).unwrap();
    let ba = compare_texts(b, a).unwrap();

    assert!((ab.score - ba.score).abs() < 1e-12);
    assert!(ab.score > 0.0 && ab.score < 1.0);
}

#[test]
fn test_vectors_are_unit_length_or_zero() {
    let (model, vectors) = fit_transform(&ESSAYS).unwrap();
    for vector in &vectors {
        assert_eq!(vector.dim(), model.len());
        assert!((vector.norm() - 1.0).abs() < 1e-9);
    }

    let unseen = transform_text("completely unrelated vocabulary", &model);
    assert!(unseen.is_zero());
    assert_eq!(unseen.norm(), 0.0);
}

#[test]
fn test_self_similarity() {
    let (_, vectors) = fit_transform(&ESSAYS).unwrap();
    for vector in &vectors {
        assert!((cosine(vector, vector).unwrap() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_ranking_is_deterministic_with_ties() {
    let corpus_texts = ["cats chase mice", "dogs bark loudly", "cats chase mice"];
    let model = VocabularyModel::fit(&corpus_texts).unwrap();
    let corpus: Vec<(&str, _)> = ["first", "second", "third"]
        .into_iter()
        .zip(corpus_texts.iter().map(|t| transform_text(t, &model)))
        .collect();
    let query = transform_text("cats chasing mice", &model);

    let ranking = rank(&query, &corpus, 3).unwrap();
    assert_eq!(ranking[0].0, "first");
    assert_eq!(ranking[1].0, "third");
    assert_eq!(ranking[2].0, "second");
    assert_eq!(ranking, rank(&query, &corpus, 3).unwrap());
}

#[test]
fn test_detect_flags_copied_sentence() {
    let (matches, rendered) = detect(
        "The sky is blue.",
        "The sky is blue. Birds fly high.",
        DEFAULT_THRESHOLD,
    );

    assert!(matches.is_matched(0));
    assert!(!matches.is_matched(1));
    assert!(rendered.contains("<mark class=\"highlight\">The sky is blue.</mark>"));
    assert!(rendered.ends_with(" Birds fly high."));
}

#[test]
fn test_empty_corpus_and_stopword_corpus_fail_to_fit() {
    let empty: [&str; 0] = [];
    assert_eq!(
        VocabularyModel::fit(&empty).unwrap_err(),
        EngineError::EmptyVocabulary
    );
    assert_eq!(
        VocabularyModel::fit(&["the the", "a an of"]).unwrap_err(),
        EngineError::EmptyVocabulary
    );
}

#[test]
fn test_stopword_corpus_clears_persisted_model() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = CorpusStore::open(&dir.path().join("corpus.db")).unwrap();
    let artifacts = ModelStore::new(dir.path().join("models").join("model.json"));

    corpus.insert("real.txt", ESSAYS[0]).unwrap();
    rebuild_model(&corpus, &artifacts).unwrap();
    assert!(artifacts.exists());

    corpus.delete("real.txt").unwrap();
    corpus.insert("filler.txt", "it is what it is").unwrap();
    let err = rebuild_model(&corpus, &artifacts).unwrap_err();
    assert!(matches!(
        err,
        ModelStoreError::Engine(EngineError::EmptyVocabulary)
    ));
    assert!(!artifacts.exists());
    assert!(artifacts.load().unwrap().is_none());
}

#[test]
fn test_corpus_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("corpus.db");
    let model_path = dir.path().join("models").join("model.json");

    let files: Vec<_> = ESSAYS
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let path = dir.path().join(format!("essay{}.txt", i));
            fs::write(&path, text).unwrap();
            path
        })
        .collect();

    {
        let corpus = CorpusStore::open(&db_path).unwrap();
        let report = add_documents(&corpus, &files).unwrap();
        assert_eq!(report.added.len(), 4);
        assert!(report.changed());
        rebuild_model(&corpus, &ModelStore::new(&model_path)).unwrap();
    }

    // Reopen both stores from disk
    let corpus = CorpusStore::open(&db_path).unwrap();
    let artifacts = ModelStore::new(&model_path);
    let model = artifacts.load().unwrap().unwrap();
    assert_eq!(model.document_count(), 4);

    let suspect = dir.path().join("suspect.txt");
    fs::write(&suspect, "Over years, rivers carve valleys through the rock.").unwrap();
    let params = CheckParams {
        top_k: 2,
        ..Default::default()
    };
    let check = check_file_against_corpus(&suspect, &corpus, &artifacts, &params, false).unwrap();
    assert_eq!(check.corpus_size, 4);
    assert_eq!(check.vocabulary_size, model.len());
    assert_eq!(check.results.len(), 2);
    assert_eq!(check.results[0].filename, "essay0.txt");

    // A stored file cannot be checked against itself
    let err = check_against_corpus("essay1.txt", ESSAYS[1], &corpus, &model, &params, false)
        .unwrap_err();
    assert!(matches!(err, CompareError::AlreadyInCorpus(_)));

    // Adding the same files again changes nothing
    let again = add_documents(&corpus, &files).unwrap();
    assert!(!again.changed());
    assert_eq!(again.duplicates.len(), 4);

    for name in corpus.filenames().unwrap() {
        corpus.delete(&name).unwrap();
    }
    assert!(rebuild_model(&corpus, &artifacts).unwrap().is_none());
    assert!(!artifacts.exists());
}

#[test]
fn test_scan_directory_ranks_neighbours() {
    let dir = tempfile::tempdir().unwrap();
    let others = dir.path().join("others");
    fs::create_dir(&others).unwrap();
    for (i, text) in ESSAYS.iter().enumerate() {
        fs::write(others.join(format!("essay{}.txt", i)), text).unwrap();
    }
    fs::write(others.join("broken.pdf"), "not really a pdf").unwrap();

    let query = dir.path().join("query.txt");
    fs::write(&query, "Lava cools into volcanic islands on the ocean floor.").unwrap();

    let scan = scan_directory(&query, &others, &CheckParams::default(), false).unwrap();
    assert_eq!(scan.results.len(), 4);
    assert_eq!(scan.results[0].filename, "essay2.txt");
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.skipped[0].filename, "broken.pdf");
}
