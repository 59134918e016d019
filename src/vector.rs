//! Sparse TF-IDF vectors over a fitted vocabulary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::EngineError;
use crate::preprocess::preprocess;
use crate::vocab::VocabularyModel;

/// L2-normalized sparse vector.
///
/// Entries are sorted by index and never hold a zero weight. `dim` is the
/// vocabulary size the vector was built over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// The all-zero vector over `dim` terms.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&(index as u32), |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// (index, weight) pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|&(i, w)| (i as usize, w))
    }

    pub(crate) fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }
}

/// Project a token sequence onto `model`'s vocabulary.
///
/// Weight is `tf * idf`, then the vector is L2-normalized. Tokens outside the
/// vocabulary are ignored; if none remain the zero vector is returned.
pub fn transform<S: AsRef<str>>(tokens: &[S], model: &VocabularyModel) -> SparseVector {
    let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
    for token in tokens {
        if let Some(index) = model.index_of(token.as_ref()) {
            *counts.entry(index).or_insert(0) += 1;
        }
    }

    let raw: Vec<(u32, f64)> = counts
        .into_iter()
        .filter_map(|(index, tf)| {
            let idf = model.idf_at(index)?;
            Some((index as u32, tf as f64 * idf))
        })
        .collect();

    let norm = raw.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm == 0.0 {
        return SparseVector::zeros(model.len());
    }

    SparseVector {
        dim: model.len(),
        entries: raw.into_iter().map(|(i, w)| (i, w / norm)).collect(),
    }
}

/// Preprocess raw text and project it onto `model`.
pub fn transform_text(text: &str, model: &VocabularyModel) -> SparseVector {
    transform(&preprocess(text), model)
}

/// Fit a throwaway model over `corpus` and vectorize every document of it.
///
/// For one-shot comparisons only; scores from different calls live in
/// different spaces and must not be compared with each other.
pub fn fit_transform<S: AsRef<str>>(
    corpus: &[S],
) -> Result<(VocabularyModel, Vec<SparseVector>), EngineError> {
    let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| preprocess(doc.as_ref())).collect();
    let model = VocabularyModel::fit_tokens(&tokenized)?;
    let vectors = tokenized.iter().map(|tokens| transform(tokens, &model)).collect();
    Ok((model, vectors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> VocabularyModel {
        VocabularyModel::fit(&["the cat sat", "the cat sat on the mat"]).unwrap()
    }

    #[test]
    fn test_transform_is_normalized() {
        let model = model();
        let vector = transform_text("the cat sat on the mat", &model);

        assert_eq!(vector.dim(), 3);
        assert_eq!(vector.nnz(), 3);
        assert!((vector.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_weights() {
        let model = model();
        let vector = transform(&["cat", "cat", "mat"], &model);

        let cat = 2.0 * model.idf("cat").unwrap();
        let mat = model.idf("mat").unwrap();
        let norm = (cat * cat + mat * mat).sqrt();

        assert!((vector.get(model.index_of("cat").unwrap()) - cat / norm).abs() < 1e-12);
        assert!((vector.get(model.index_of("mat").unwrap()) - mat / norm).abs() < 1e-12);
        assert_eq!(vector.get(model.index_of("sat").unwrap()), 0.0);
    }

    #[test]
    fn test_out_of_vocabulary_is_zero_vector() {
        let model = model();
        let vector = transform_text("quantum physics lecture", &model);

        assert!(vector.is_zero());
        assert_eq!(vector.dim(), model.len());
        assert_eq!(vector.norm(), 0.0);
    }

    #[test]
    fn test_unknown_tokens_ignored() {
        let model = model();
        let with_noise = transform(&["cat", "dog", "unicorn"], &model);
        let clean = transform(&["cat"], &model);
        assert_eq!(with_noise, clean);
    }

    #[test]
    fn test_fit_transform_shapes() {
        let (model, vectors) =
            fit_transform(&["dogs chase cats", "cats chase mice", "mice eat cheese"]).unwrap();

        assert_eq!(vectors.len(), 3);
        for vector in &vectors {
            assert_eq!(vector.dim(), model.len());
            assert!((vector.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fit_transform_empty_vocabulary() {
        assert_eq!(
            fit_transform(&["the", "and or"]).unwrap_err(),
            EngineError::EmptyVocabulary
        );
    }

    #[test]
    fn test_iter_ascending() {
        let model = model();
        let vector = transform_text("mat sat cat", &model);
        let indices: Vec<usize> = vector.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
