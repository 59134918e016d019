//! English lexical resources: stopwords and the noun lemma tables.
//!
//! Lookups build their tables once on first use and are read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use stop_words::{get, LANGUAGE};

/// Plural noun forms that the detachment rules cannot recover.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("calves", "calf"),
    ("children", "child"),
    ("crises", "crisis"),
    ("criteria", "criterion"),
    ("data", "datum"),
    ("dice", "die"),
    ("elves", "elf"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("halves", "half"),
    ("hooves", "hoof"),
    ("indices", "index"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lice", "louse"),
    ("lives", "life"),
    ("loaves", "loaf"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("phenomena", "phenomenon"),
    ("quizzes", "quiz"),
    ("scarves", "scarf"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("teeth", "tooth"),
    ("theses", "thesis"),
    ("thieves", "thief"),
    ("wives", "wife"),
    ("wolves", "wolf"),
];

/// Words that look inflected but are already their own lemma.
/// Their "-es" plurals are formed by adding "es" to the whole word.
const INVARIANT_NOUNS: &[&str] = &[
    "abdomen", "afterwards", "alias", "always", "amen", "apparatus", "athletics", "atlas",
    "bias", "bonus", "bus", "campus", "canvas", "census", "chaos", "chorus", "circus",
    "corpus", "economics", "ethics", "focus", "gas", "genus", "genius", "goes", "iris", "lens",
    "mathematics", "means", "minus", "news", "octopus", "omen", "perhaps", "physics", "plus",
    "politics", "regimen", "series", "species", "specimen", "stamen", "status", "surplus",
    "thus", "towards", "virus", "walrus", "whereas", "yes",
];

/// Nouns ending in "e" whose plural would otherwise fall into a suffix rule
/// ("-ies", "-ches", "-oes", ...).
const E_FINAL_NOUNS: &[&str] = &[
    "ache", "aloe", "auntie", "avalanche", "birdie", "brownie", "cache", "calorie", "canoe",
    "cliche", "cookie", "die", "floe", "foe", "genie", "goalie", "headache", "hippie", "hoe",
    "hoodie", "horseshoe", "lie", "menagerie", "moustache", "movie", "mustache", "niche",
    "oboe", "pie", "pixie", "prairie", "psyche", "quiche", "reverie", "rookie", "selfie",
    "shoe", "smoothie", "sortie", "tie", "tiptoe", "toe", "veggie", "woe", "zombie",
];

fn stopword_set() -> &'static HashSet<String> {
    static SET: OnceLock<HashSet<String>> = OnceLock::new();
    SET.get_or_init(|| get(LANGUAGE::English).into_iter().collect())
}

fn irregular_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| IRREGULAR_NOUNS.iter().copied().collect())
}

fn invariant_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| INVARIANT_NOUNS.iter().copied().collect())
}

fn e_final_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| E_FINAL_NOUNS.iter().copied().collect())
}

/// Check a lowercase token against the stopword list.
pub fn is_stopword(token: &str) -> bool {
    stopword_set().contains(token)
}

/// Reduce a lowercase token to its noun lemma.
///
/// Lookup order: irregular forms, invariant words, "-es" plurals of known
/// base words, then suffix detachment. Tokens of three characters or fewer
/// are returned unchanged.
pub fn lemmatize_noun(token: &str) -> String {
    if let Some(lemma) = irregular_map().get(token) {
        return (*lemma).to_string();
    }
    if invariant_set().contains(token) || token.chars().count() <= 3 {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("es") {
        let with_e = &token[..token.len() - 1];
        if e_final_set().contains(with_e) {
            return with_e.to_string();
        }
        if invariant_set().contains(stem) {
            return stem.to_string();
        }
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
        return token[..token.len() - 1].to_string();
    }
    if let Some(stem) = token.strip_suffix("men") {
        return format!("{stem}man");
    }
    for (suffix, replacement) in [
        ("sses", "ss"),
        ("zzes", "zz"),
        ("ches", "ch"),
        ("shes", "sh"),
        ("xes", "x"),
        ("oes", "o"),
    ] {
        if let Some(stem) = token.strip_suffix(suffix) {
            return format!("{stem}{replacement}");
        }
    }
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }
    match token.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwords() {
        assert!(is_stopword("the"));
        assert!(is_stopword("on"));
        assert!(is_stopword("a"));
        assert!(is_stopword("an"));
        assert!(!is_stopword("cat"));
        assert!(!is_stopword("mat"));
        assert!(!is_stopword("The"));
        assert!(is_stopword("don't"));
        assert!(is_stopword("wouldn"));
        assert!(is_stopword("what"));
    }

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemmatize_noun("cats"), "cat");
        assert_eq!(lemmatize_noun("birds"), "bird");
        assert_eq!(lemmatize_noun("studies"), "study");
        assert_eq!(lemmatize_noun("churches"), "church");
        assert_eq!(lemmatize_noun("dishes"), "dish");
        assert_eq!(lemmatize_noun("boxes"), "box");
        assert_eq!(lemmatize_noun("glasses"), "glass");
        assert_eq!(lemmatize_noun("women"), "woman");
        assert_eq!(lemmatize_noun("cases"), "case");
    }

    #[test]
    fn test_irregular_and_invariant() {
        assert_eq!(lemmatize_noun("children"), "child");
        assert_eq!(lemmatize_noun("mice"), "mouse");
        assert_eq!(lemmatize_noun("wolves"), "wolf");
        assert_eq!(lemmatize_noun("news"), "news");
        assert_eq!(lemmatize_noun("series"), "series");
        assert_eq!(lemmatize_noun("specimen"), "specimen");
    }

    #[test]
    fn test_words_left_alone() {
        assert_eq!(lemmatize_noun("cat"), "cat");
        assert_eq!(lemmatize_noun("gas"), "gas");
        assert_eq!(lemmatize_noun("glass"), "glass");
        assert_eq!(lemmatize_noun("famous"), "famous");
        assert_eq!(lemmatize_noun("analysis"), "analysis");
        assert_eq!(lemmatize_noun("sky"), "sky");
    }

    #[test]
    fn test_es_plurals_keep_base_word() {
        assert_eq!(lemmatize_noun("buzzes"), "buzz");
        assert_eq!(lemmatize_noun("quizzes"), "quiz");
        assert_eq!(lemmatize_noun("buses"), "bus");
        assert_eq!(lemmatize_noun("lenses"), "lens");
        assert_eq!(lemmatize_noun("viruses"), "virus");
        assert_eq!(lemmatize_noun("niches"), "niche");
        assert_eq!(lemmatize_noun("caches"), "cache");
        assert_eq!(lemmatize_noun("calories"), "calorie");
        assert_eq!(lemmatize_noun("movies"), "movie");
        assert_eq!(lemmatize_noun("heroes"), "hero");
        assert_eq!(lemmatize_noun("potatoes"), "potato");
        assert_eq!(lemmatize_noun("shoes"), "shoe");
        assert_eq!(lemmatize_noun("ties"), "tie");
    }

    #[test]
    fn test_plain_s_plurals_unaffected() {
        assert_eq!(lemmatize_noun("causes"), "cause");
        assert_eq!(lemmatize_noun("houses"), "house");
        assert_eq!(lemmatize_noun("photos"), "photo");
        assert_eq!(lemmatize_noun("cities"), "city");
    }
}
