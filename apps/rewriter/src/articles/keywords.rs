//! Frequency keywords: the most common non-stop-words of a text.

use std::collections::{HashMap, HashSet};

/// Keywords kept per text (title and body are ranked separately).
pub const NUM_KEYWORDS: usize = 10;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "even",
    "few", "for", "from", "further", "get", "got", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "last", "like", "made", "make", "many", "may",
    "me", "might", "more", "most", "much", "must", "my", "myself", "new", "no", "nor", "not",
    "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "said", "same", "say", "says", "she", "should", "since", "so", "some",
    "still", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "two", "under", "until",
    "up", "us", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "year", "years", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Keywords for an article: title keywords first, then body keywords,
/// without duplicates.
pub fn article_keywords(title: &str, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords(title)
        .into_iter()
        .chain(keywords(text))
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Top `NUM_KEYWORDS` words of `text` by frequency, stop words excluded.
/// Ties are broken by the word itself, descending.
pub fn keywords(text: &str) -> Vec<String> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in split_words(text) {
        if !stop_words.contains(word.as_str()) {
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wb.cmp(wa)));
    ranked
        .into_iter()
        .take(NUM_KEYWORDS)
        .map(|(word, _)| word)
        .collect()
}

/// Lowercased whitespace-separated words with punctuation removed.
fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_by_frequency() {
        let text = "Solar panels power homes. Solar farms power cities. Solar is cheap.";
        let kws = keywords(text);
        assert_eq!(kws[0], "solar");
        assert_eq!(kws[1], "power");
    }

    #[test]
    fn test_excludes_stop_words_and_punctuation() {
        let kws = keywords("The cat, and the CAT; and the dog!");
        assert_eq!(kws, vec!["cat", "dog"]);
    }

    #[test]
    fn test_ties_break_by_word_descending() {
        assert_eq!(keywords("apple banana cherry"), vec!["cherry", "banana", "apple"]);
    }

    #[test]
    fn test_caps_at_ten_keywords() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        assert_eq!(keywords(text).len(), NUM_KEYWORDS);
    }

    #[test]
    fn test_empty_text_has_no_keywords() {
        assert!(keywords("").is_empty());
        assert!(keywords("the and of").is_empty());
    }

    #[test]
    fn test_article_keywords_put_title_first_and_dedupe() {
        let kws = article_keywords("Harbour Expansion", "harbour harbour cranes");
        assert_eq!(kws, vec!["harbour", "expansion", "cranes"]);
    }
}
