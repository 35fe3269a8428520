use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Common English function words dropped from queries. Words of two letters
/// or fewer are filtered by length and are not listed.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "and", "any", "are", "because",
    "been", "before", "being", "below", "between", "both", "but", "can", "cannot", "could",
    "did", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "into", "its", "itself", "more", "most", "myself", "nor", "not", "off", "once", "only",
    "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "too", "under", "until",
    "very", "was", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

const MIN_KEYWORD_LEN: usize = 3;

/// Whole words made only of ASCII letters and digits. `\b` is Unicode-aware,
/// so a run glued to `é` or `_` is part of a longer word and is not matched.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z0-9]+\b").expect("static regex"));

/// Extract the significant terms of `text`: lowercase whole `[a-z0-9]+` words
/// longer than two characters, minus stop words, deduplicated.
///
/// A `BTreeSet` keeps iteration order stable so ranking logs and scores are
/// reproducible across runs.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.len() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_extract_basic() {
        let keywords = extract_keywords("What is the PRICING for the Enterprise plan?");
        assert_eq!(keywords, set(&["enterprise", "plan", "pricing"]));
    }

    #[test]
    fn test_extract_splits_on_punctuation() {
        let keywords = extract_keywords("e-mail: support@acme.io, v2.0-beta");
        assert_eq!(keywords, set(&["acme", "beta", "mail", "support"]));
    }

    #[test]
    fn test_extract_dedupes() {
        let keywords = extract_keywords("Plan plan PLAN plans");
        assert_eq!(keywords, set(&["plan", "plans"]));
    }

    #[test]
    fn test_extract_keeps_digits() {
        let keywords = extract_keywords("office 365 and 2024 roadmap");
        assert_eq!(keywords, set(&["2024", "365", "office", "roadmap"]));
    }

    #[test]
    fn test_extract_contractions_fall_apart() {
        // "don't" splits into "don" + "t"; "t" is too short
        let keywords = extract_keywords("Why don't refunds work?");
        assert_eq!(keywords, set(&["don", "refunds", "work"]));
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("is it to be or not?").is_empty());
    }

    #[test]
    fn test_extract_idempotent() {
        let first = extract_keywords("How do I configure Single Sign-On for the admin portal?");
        let joined = first.iter().cloned().collect::<Vec<_>>().join(" ");
        assert_eq!(extract_keywords(&joined), first);
    }

    #[test]
    fn test_partial_words_are_not_keywords() {
        let keywords = extract_keywords("Is hosting privé of über? sign_on");
        assert_eq!(keywords, set(&["hosting"]));
    }

    #[test]
    fn test_accented_question_skips_unrelated_pages() {
        use crate::docs::{types::Page, PageIndex};
        use crate::rank::ranker::rank;

        let index = PageIndex::new(vec![Page {
            id: "p".to_string(),
            url: "https://example.com/p".to_string(),
            title: "Privacy".to_string(),
            headings: vec![],
            raw_content: "Our privacy policy covers member numbers.".to_string(),
        }]);
        let keywords = extract_keywords("Is hosting privé of über?");
        assert!(rank(&index, &keywords, 5).is_empty());
    }
}
