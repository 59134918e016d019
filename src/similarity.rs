//! Cosine similarity, similarity matrices and ranking.

use crate::models::EngineError;
use crate::vector::SparseVector;

/// Cosine similarity of two normalized vectors.
///
/// Both vectors are already unit length (or zero), so this is the dot
/// product over shared indices. Zero vectors score 0.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> Result<f64, EngineError> {
    if a.dim() != b.dim() {
        return Err(EngineError::DimensionMismatch {
            left: a.dim(),
            right: b.dim(),
        });
    }
    if a.is_zero() || b.is_zero() {
        return Ok(0.0);
    }

    // Merge join over the sorted entry lists
    let (ea, eb) = (a.entries(), b.entries());
    let (mut i, mut j) = (0usize, 0usize);
    let mut dot = 0.0f64;

    while i < ea.len() && j < eb.len() {
        match ea[i].0.cmp(&eb[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += ea[i].1 * eb[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    Ok(dot.clamp(0.0, 1.0))
}

/// Pairwise cosine scores, `rows.len()` by `cols.len()`.
pub fn similarity_matrix(
    rows: &[SparseVector],
    cols: &[SparseVector],
) -> Result<Vec<Vec<f64>>, EngineError> {
    rows.iter()
        .map(|row| {
            cols.iter()
                .map(|col| cosine(row, col))
                .collect::<Result<Vec<f64>, EngineError>>()
        })
        .collect()
}

/// Rank corpus entries by similarity to `query`, best first.
///
/// Ties keep corpus order. At most `top_k` entries are returned.
pub fn rank<Id: Clone>(
    query: &SparseVector,
    corpus: &[(Id, SparseVector)],
    top_k: usize,
) -> Result<Vec<(Id, f64)>, EngineError> {
    let mut scored = corpus
        .iter()
        .map(|(id, vector)| cosine(query, vector).map(|score| (id.clone(), score)))
        .collect::<Result<Vec<_>, EngineError>>()?;

    // sort_by is stable
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);
    Ok(scored)
}

/// Score as a percentage rounded to two decimals.
pub fn score_to_percentage(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}
