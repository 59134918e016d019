//! Plagiarism Checker Library
//!
//! TF-IDF text similarity for documents: preprocessing, vocabulary fitting,
//! cosine scoring, corpus ranking and sentence-level match highlighting.
//!
//! # Example
//!
//! ```no_run
//! use plagiarism_checker::prelude::*;
//!
//! // Whole-document similarity in a space fit over just the two texts
//! let result = compare_texts("The cat sat on the mat.", "A cat sat on a mat.").unwrap();
//! println!("{:.2}% similar", result.percentage);
//!
//! // Flag suspect sentences that reuse source sentences
//! let (matches, html) = detect(
//!     "The sky is blue.",
//!     "The sky is blue. Birds fly high.",
//!     DEFAULT_THRESHOLD,
//! );
//! println!("{} sentence(s) flagged: {}", matches.match_count(), html);
//! ```
//!
//! # Corpus Example
//!
//! ```no_run
//! use plagiarism_checker::prelude::*;
//! use std::path::Path;
//!
//! let corpus = CorpusStore::open(Path::new(DEFAULT_CORPUS_DB)).unwrap();
//! let artifacts = ModelStore::new(DEFAULT_MODEL_PATH);
//!
//! corpus.insert("essay.txt", "Rivers carve valleys over long periods.").unwrap();
//! let model = rebuild_model(&corpus, &artifacts).unwrap().unwrap();
//!
//! let check = check_against_corpus(
//!     "suspect.txt",
//!     "Valleys are carved by rivers.",
//!     &corpus,
//!     &model,
//!     &CheckParams::default(),
//!     false,
//! )
//! .unwrap();
//!
//! for entry in &check.results {
//!     println!("{}: {:.2}%", entry.filename, entry.percentage);
//! }
//! ```

pub mod compare;
pub mod db;
pub mod detect;
pub mod extract;
pub mod lexicon;
pub mod model_store;
pub mod models;
pub mod output;
pub mod preprocess;
pub mod sentence;
pub mod similarity;
pub mod vector;
pub mod vocab;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compare::{
        add_documents, check_against_corpus, check_file_against_corpus, compare_texts,
        compare_with_report, scan_directory, CompareError,
    };
    pub use crate::db::{CorpusStore, DbError};
    pub use crate::detect::{
        detect, escape_html, identify_matching_sentences, match_sentences, render_highlighted,
        vectorize_sentences, DEFAULT_THRESHOLD,
    };
    pub use crate::extract::{document_name, extract_file, DocumentFormat, ExtractError};
    pub use crate::model_store::{rebuild_model, ModelStore, ModelStoreError};
    pub use crate::models::{
        AddReport, CheckParams, CorpusCheck, CorpusStats, DirectoryScan, Document, EngineError,
        MatchSet, PairComparison, PairReport, RankedDocument, SkippedDocument, DEFAULT_CORPUS_DB,
        DEFAULT_MODEL_PATH,
    };
    pub use crate::output::{
        format_ranked, generate_html_report, print_corpus_listing, print_pair_result,
        print_ranking, print_stats, write_html_report_file, write_json, write_json_file,
        OutputError,
    };
    pub use crate::preprocess::preprocess;
    pub use crate::sentence::split_into_sentences;
    pub use crate::similarity::{cosine, rank, score_to_percentage, similarity_matrix};
    pub use crate::vector::{fit_transform, transform, transform_text, SparseVector};
    pub use crate::vocab::VocabularyModel;
}

// Re-export commonly used types at the crate root
pub use models::{CheckParams, EngineError, MatchSet, PairReport};
pub use vector::SparseVector;
pub use vocab::VocabularyModel;
