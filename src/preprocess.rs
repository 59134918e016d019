//! Text normalization: raw text to a sequence of lemmatized terms.
//!
//! The pipeline runs in a fixed order (tokenize, case-fold, alphabetic
//! filter, stopword filter, lemmatize) and is deterministic, so the same
//! text always lands on the same point of a vector space.

use crate::lexicon::{is_stopword, lemmatize_noun};

/// Characters that stay inside a word when surrounded by alphanumerics.
fn is_word_joiner(c: char) -> bool {
    matches!(c, '-' | '.' | '\'' | '\u{2019}')
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Split text into word and punctuation tokens.
///
/// Alphanumeric runs form words; joiners between two alphanumerics stay in
/// the word ("well-known", "3.14"). Any other non-whitespace character is a
/// token of its own. Contractions are split afterwards.
pub fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
            continue;
        }

        let joins = is_word_joiner(c)
            && !current.is_empty()
            && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());
        if joins {
            current.push(c);
            continue;
        }

        if !current.is_empty() {
            push_word(&mut tokens, std::mem::take(&mut current));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }

    if !current.is_empty() {
        push_word(&mut tokens, current);
    }

    tokens
}

/// Push a word, splitting a contraction into its own token.
///
/// "don't" becomes "do" + "n't"; "cat's" becomes "cat" + "'s"; "cannot"
/// becomes "can" + "not".
fn push_word(tokens: &mut Vec<String>, word: String) {
    if word.eq_ignore_ascii_case("cannot") {
        tokens.push(word[..3].to_string());
        tokens.push(word[3..].to_string());
        return;
    }

    let pos = match word.find(is_apostrophe) {
        Some(pos) if pos > 0 => pos,
        _ => {
            tokens.push(word);
            return;
        }
    };

    let head = &word[..pos];
    let clitic: String = word[pos..].chars().skip(1).collect();
    let negation = clitic.eq_ignore_ascii_case("t")
        && head.len() > 1
        && (head.ends_with('n') || head.ends_with('N'));

    // 'n' is a single byte, so pos - 1 is a char boundary.
    let split = if negation { pos - 1 } else { pos };
    tokens.push(word[..split].to_string());
    tokens.push(word[split..].to_string());
}

pub fn normalize_case(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().map(|t| t.to_lowercase()).collect()
}

/// Drop every token that is not made of alphabetic characters only.
pub fn filter_alphabetic(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !t.is_empty() && t.chars().all(char::is_alphabetic))
        .collect()
}

pub fn filter_stopwords(tokens: Vec<String>) -> Vec<String> {
    tokens.into_iter().filter(|t| !is_stopword(t)).collect()
}

pub fn lemmatize_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens.iter().map(|t| lemmatize_noun(t)).collect()
}

/// Run the full normalization pipeline over raw text.
pub fn preprocess(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let tokens = normalize_case(tokens);
    let tokens = filter_alphabetic(tokens);
    let tokens = filter_stopwords(tokens);
    lemmatize_tokens(tokens)
}
