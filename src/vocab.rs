//! Vocabulary and inverse-document-frequency model.
//!
//! A `VocabularyModel` is fit once over a corpus and never mutated. Terms are
//! indexed in lexicographic order so two fits over the same term set agree on
//! every index.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::models::EngineError;
use crate::preprocess::preprocess;

/// Fitted term index with smoothed IDF weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelArtifact", into = "ModelArtifact")]
pub struct VocabularyModel {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    document_frequency: Vec<u32>,
    idf: Vec<f64>,
    document_count: usize,
}

/// On-disk form of a model: the fit-time statistics only.
/// IDF and the term index are derived again on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub document_count: usize,
    pub terms: Vec<String>,
    pub document_frequency: Vec<u32>,
}

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// `ln((1 + N) / (1 + df)) + 1`, strictly positive for `df <= N`.
pub fn smoothed_idf(document_count: usize, document_frequency: u32) -> f64 {
    ((1.0 + document_count as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

impl VocabularyModel {
    /// Fit a model over raw documents.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Result<Self, EngineError> {
        let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| preprocess(doc.as_ref())).collect();
        Self::fit_tokens(&tokenized)
    }

    /// Fit a model over documents that are already preprocessed.
    pub fn fit_tokens(documents: &[Vec<String>]) -> Result<Self, EngineError> {
        let mut frequencies: BTreeMap<&str, u32> = BTreeMap::new();

        for tokens in documents {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *frequencies.entry(term).or_insert(0) += 1;
            }
        }

        if frequencies.is_empty() {
            return Err(EngineError::EmptyVocabulary);
        }

        // BTreeMap iteration is already lexicographic
        let (terms, document_frequency): (Vec<String>, Vec<u32>) = frequencies
            .into_iter()
            .map(|(term, df)| (term.to_string(), df))
            .unzip();

        debug!(
            documents = documents.len(),
            terms = terms.len(),
            "Fitted vocabulary"
        );

        Ok(Self::from_parts(terms, document_frequency, documents.len()))
    }

    fn from_parts(terms: Vec<String>, document_frequency: Vec<u32>, document_count: usize) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        let idf = document_frequency
            .iter()
            .map(|&df| smoothed_idf(document_count, df))
            .collect();

        Self {
            terms,
            index,
            document_frequency,
            idf,
            document_count,
        }
    }

    /// Number of terms, i.e. the dimensionality of vectors over this model.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of documents the model was fit on.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// All terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    pub fn document_frequency(&self, term: &str) -> Option<u32> {
        self.index_of(term).map(|i| self.document_frequency[i])
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|i| self.idf[i])
    }

    /// IDF weight by vocabulary index.
    pub fn idf_at(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }
}

impl From<VocabularyModel> for ModelArtifact {
    fn from(model: VocabularyModel) -> Self {
        ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            document_count: model.document_count,
            terms: model.terms,
            document_frequency: model.document_frequency,
        }
    }
}

impl TryFrom<ModelArtifact> for VocabularyModel {
    type Error = String;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(format!(
                "unsupported model format version {}",
                artifact.format_version
            ));
        }
        if artifact.terms.len() != artifact.document_frequency.len() {
            return Err(format!(
                "{} terms but {} document frequencies",
                artifact.terms.len(),
                artifact.document_frequency.len()
            ));
        }
        if artifact.terms.is_empty() {
            return Err("model has an empty vocabulary".to_string());
        }
        if artifact.terms.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("terms are not sorted and unique".to_string());
        }
        if let Some(df) = artifact
            .document_frequency
            .iter()
            .find(|&&df| df == 0 || df as usize > artifact.document_count)
        {
            return Err(format!(
                "document frequency {} outside [1, {}]",
                df, artifact.document_count
            ));
        }

        Ok(Self::from_parts(
            artifact.terms,
            artifact.document_frequency,
            artifact.document_count,
        ))
    }
}
