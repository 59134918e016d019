//! English sentence boundary detection.
//!
//! A boundary is a run of terminators (`.`, `!`, `?`) plus any closing quotes
//! or brackets, followed by whitespace or the end of the text. A period does
//! not end a sentence after a known abbreviation, after a single-letter
//! initial, or when the next word starts in lowercase.

const ABBREVIATIONS: &[&str] = &[
    "al", "approx", "apr", "aug", "ave", "cf", "co", "corp", "dec", "dept", "dr", "est", "etc",
    "feb", "fig", "gen", "gov", "inc", "jan", "jr", "jul", "jun", "ltd", "mar", "mr", "mrs",
    "ms", "mt", "no", "nov", "oct", "prof", "rep", "rev", "sen", "sep", "sept", "sr", "st", "vol",
    "vs",
];

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// The word immediately before byte offset `end`, without leading brackets
/// or quotes.
fn preceding_word(text: &str, end: usize) -> &str {
    let before = &text[..end];
    let start = before
        .char_indices()
        .rev()
        .find(|&(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    before[start..].trim_start_matches(|c: char| !c.is_alphanumeric())
}

fn is_abbreviation(word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let mut chars = word.chars();
    // Single-letter initial such as "J."
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_alphabetic() {
            return true;
        }
    }
    // Dotted forms such as "e.g" or "U.S"
    if word.contains('.') {
        return true;
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Split text into trimmed, non-empty sentences borrowed from `text`.
pub fn split_into_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        let mut end = pos + c.len_utf8();
        let mut all_periods = c == '.';
        while let Some(&(next_pos, next)) = chars.peek() {
            if is_terminator(next) || is_closing(next) {
                if is_terminator(next) && next != '.' {
                    all_periods = false;
                }
                end = next_pos + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        let rest = &text[end..];
        let Some(first_after) = rest.chars().next() else {
            break;
        };
        if !first_after.is_whitespace() {
            continue;
        }

        if all_periods {
            if is_abbreviation(preceding_word(text, pos)) {
                continue;
            }
            let next_word_lower = rest
                .trim_start()
                .chars()
                .next()
                .is_some_and(char::is_lowercase);
            if next_word_lower {
                continue;
            }
        }

        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = end;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}
