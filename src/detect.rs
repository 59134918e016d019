//! Sentence-level match detection between a source and a suspect text.
//!
//! Both sentence sets are vectorized in one throwaway space fit over the
//! two texts together. A suspect sentence is flagged when its best cosine
//! score against any source sentence reaches the threshold.

use tracing::{debug, warn};

use crate::models::{EngineError, MatchSet};
use crate::sentence::split_into_sentences;
use crate::similarity::similarity_matrix;
use crate::vector::{fit_transform, SparseVector};

/// Threshold used when the caller does not pick one.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

const MARK_OPEN: &str = "<mark class=\"highlight\">";
const MARK_CLOSE: &str = "</mark>";

/// Vectorize source sentences followed by suspect sentences in a shared space.
///
/// A joint vocabulary that comes out empty yields zero vectors, which score
/// 0 against everything.
pub fn vectorize_sentences(
    source: &[&str],
    suspect: &[&str],
) -> (Vec<SparseVector>, Vec<SparseVector>) {
    let all: Vec<&str> = source.iter().chain(suspect.iter()).copied().collect();
    let mut vectors = match fit_transform(&all) {
        Ok((_, vectors)) => vectors,
        Err(err @ (EngineError::EmptyVocabulary | EngineError::DimensionMismatch { .. })) => {
            debug!(error = %err, "No shared terms across sentences");
            vec![SparseVector::zeros(0); all.len()]
        }
    };
    let suspect_vectors = vectors.split_off(source.len());
    (vectors, suspect_vectors)
}

/// Suspect indices whose best row score reaches `threshold`, ascending.
pub fn identify_matching_sentences(matrix: &[Vec<f64>], threshold: f64) -> Vec<usize> {
    matrix
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|&score| score >= threshold))
        .map(|(i, _)| i)
        .collect()
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Join suspect sentences with single spaces, wrapping matched ones in
/// highlight markers.
///
/// Sentence text is escaped before markers are added; markers are trusted.
pub fn render_highlighted<S: AsRef<str>>(sentences: &[S], matches: &MatchSet) -> String {
    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let safe = escape_html(sentence.as_ref());
            if matches.is_matched(i) {
                format!("{MARK_OPEN}{safe}{MARK_CLOSE}")
            } else {
                safe
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the match set for already split sentences.
pub fn match_sentences(source: &[&str], suspect: &[&str], threshold: f64) -> MatchSet {
    if source.is_empty() || suspect.is_empty() {
        return MatchSet::default();
    }

    let (source_vectors, suspect_vectors) = vectorize_sentences(source, suspect);
    // Every vector comes from the same fit, so dimensions always agree.
    let matrix = match similarity_matrix(&suspect_vectors, &source_vectors) {
        Ok(matrix) => matrix,
        Err(err) => {
            warn!(error = %err, "Sentence vectors disagree on dimensions, nothing flagged");
            return MatchSet::default();
        }
    };
    let matched = identify_matching_sentences(&matrix, threshold);

    debug!(
        source_sentences = source.len(),
        suspect_sentences = suspect.len(),
        matched = matched.len(),
        "Matched sentences"
    );

    MatchSet { matched, matrix }
}

/// Detect suspect sentences overlapping the source text.
///
/// Returns the match set and the suspect text rendered as HTML with matched
/// sentences highlighted.
pub fn detect(source_text: &str, suspect_text: &str, threshold: f64) -> (MatchSet, String) {
    let source = split_into_sentences(source_text);
    let suspect = split_into_sentences(suspect_text);

    let matches = match_sentences(&source, &suspect, threshold);
    let rendered = render_highlighted(&suspect, &matches);
    (matches, rendered)
}
