//! Data structures shared across the plagiarism checking pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the SQLite corpus database.
pub const DEFAULT_CORPUS_DB: &str = "corpus.db";

/// Default location of the persisted vocabulary model.
pub const DEFAULT_MODEL_PATH: &str = "models/tfidf_vectorizer.json";

/// Failures raised by the similarity engine itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("empty vocabulary: the corpus contains no terms after preprocessing")]
    EmptyVocabulary,
    #[error("dimension mismatch: vectors defined over {left} and {right} terms")]
    DimensionMismatch { left: usize, right: usize },
}

/// A document as held by the corpus store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    pub text: String,
    pub uploaded_at: Option<String>,
}

impl Document {
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            uploaded_at: None,
        }
    }
}

/// Parameters for a check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckParams {
    /// Minimum sentence similarity for a suspect sentence to be flagged
    pub threshold: f64,
    /// Number of corpus documents kept in a ranking
    pub top_k: usize,
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            top_k: 5,
        }
    }
}

impl CheckParams {
    /// Reject values the engine cannot interpret.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            ));
        }
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Suspect sentences flagged as overlapping a source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    /// Indices into the suspect sentence sequence, ascending
    pub matched: Vec<usize>,
    /// Rows are suspect sentences, columns are source sentences
    pub matrix: Vec<Vec<f64>>,
}

impl MatchSet {
    pub fn is_matched(&self, index: usize) -> bool {
        self.matched.binary_search(&index).is_ok()
    }

    pub fn match_count(&self) -> usize {
        self.matched.len()
    }
}

/// Whole-document similarity between two texts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairComparison {
    pub score: f64,
    pub percentage: f64,
}

/// Pairwise comparison with the sentence-level breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    pub version: String,
    pub source_name: String,
    pub suspect_name: String,
    pub parameters: CheckParams,
    pub comparison: PairComparison,
    pub suspect_sentences: Vec<String>,
    pub matches: MatchSet,
    /// Suspect text with matched sentences wrapped in highlight markers
    pub rendered: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    pub filename: String,
    pub score: f64,
    pub percentage: f64,
}

/// A document that could not take part in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

/// Result of checking one document against the stored corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusCheck {
    pub version: String,
    pub suspect_name: String,
    pub corpus_size: usize,
    pub vocabulary_size: usize,
    pub results: Vec<RankedDocument>,
}

/// Result of comparing one file against every file in a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryScan {
    pub version: String,
    pub query_name: String,
    pub results: Vec<RankedDocument>,
    pub skipped: Vec<SkippedDocument>,
}

/// Outcome of adding files to the corpus store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddReport {
    pub added: Vec<String>,
    pub duplicates: Vec<String>,
    pub skipped: Vec<SkippedDocument>,
}

impl AddReport {
    /// Whether the store contents changed and the model must be re-fit.
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusStats {
    pub document_count: u64,
    pub total_characters: u64,
    pub oldest_upload: Option<String>,
    pub newest_upload: Option<String>,
}
