//! Keyword highlighting for rewritten text.
//!
//! Produces HTML: the input text escaped, with every keyword hit wrapped in
//! `<mark>`. Keywords are matched longest first, case-insensitively, and only
//! where the hit is not glued to another word character. A hit overlapping
//! text already claimed by a longer keyword is skipped.

use std::cmp::Reverse;
use std::ops::Range;

use askama::{Html as HtmlEscaper, MarkupDisplay};
use regex::{Regex, RegexBuilder};
use tracing::warn;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

pub fn highlight(text: &str, keywords: &[String]) -> String {
    let mut ordered: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    // sort_by_key is stable: equal lengths keep their input order
    ordered.sort_by_key(|k| Reverse(k.chars().count()));

    let mut spans: Vec<Range<usize>> = Vec::new();
    for keyword in ordered {
        let Some(pattern) = keyword_pattern(keyword) else {
            continue;
        };

        let mut start = 0;
        while let Some(found) = pattern.find_at(text, start) {
            let range = found.range();
            if at_word_boundaries(text, &range) && !overlaps_any(&spans, &range) {
                start = range.end;
                spans.push(range);
            } else {
                start = next_char(text, range.start);
            }
        }
    }

    spans.sort_by_key(|r| r.start);
    render(text, &spans)
}

fn keyword_pattern(keyword: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .map_err(|e| warn!("Skipping keyword {keyword:?}: {e}"))
        .ok()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn at_word_boundaries(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn overlaps_any(spans: &[Range<usize>], range: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|s| s.start < range.end && range.start < s.end)
}

fn next_char(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len(), |c| at + c.len_utf8())
}

fn render(text: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * (MARK_OPEN.len() + MARK_CLOSE.len()));
    let mut cursor = 0;
    for span in spans {
        push_escaped(&mut out, &text[cursor..span.start]);
        out.push_str(MARK_OPEN);
        push_escaped(&mut out, &text[span.clone()]);
        out.push_str(MARK_CLOSE);
        cursor = span.end;
    }
    push_escaped(&mut out, &text[cursor..]);
    out
}

fn push_escaped(out: &mut String, raw: &str) {
    if raw.is_empty() {
        return;
    }
    out.push_str(&MarkupDisplay::new_unsafe(raw, HtmlEscaper).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_longer_keyword_wins_over_contained_shorter_one() {
        let out = highlight("I love New York", &kws(&["York", "New York"]));
        assert_eq!(out, "I love <mark>New York</mark>");
        assert_eq!(out.matches(MARK_OPEN).count(), 1);
    }

    #[test]
    fn test_shorter_keyword_still_matches_elsewhere() {
        let out = highlight("New York and York", &kws(&["New York", "York"]));
        assert_eq!(out, "<mark>New York</mark> and <mark>York</mark>");
    }

    #[test]
    fn test_case_insensitive_keeps_original_casing() {
        let out = highlight("Climate change is CLIMATE policy", &kws(&["climate"]));
        assert_eq!(out, "<mark>Climate</mark> change is <mark>CLIMATE</mark> policy");
    }

    #[test]
    fn test_respects_word_boundaries() {
        let out = highlight("Yorkshire is not York_ville or York.", &kws(&["York"]));
        assert_eq!(out, "Yorkshire is not York_ville or <mark>York</mark>.");
    }

    #[test]
    fn test_keyword_ending_in_symbol() {
        let out = highlight("I like C++ a lot", &kws(&["C++"]));
        assert_eq!(out, "I like <mark>C++</mark> a lot");
    }

    #[test]
    fn test_adjacent_occurrences_all_wrapped() {
        let out = highlight("data, data data", &kws(&["data"]));
        assert_eq!(out, "<mark>data</mark>, <mark>data</mark> <mark>data</mark>");
    }

    #[test]
    fn test_failed_boundary_resumes_inside_candidate() {
        let out = highlight("aaa aa", &kws(&["aa"]));
        assert_eq!(out, "aaa <mark>aa</mark>");
    }

    #[test]
    fn test_duplicate_keywords_do_not_double_wrap() {
        let out = highlight("harbour news", &kws(&["harbour", "Harbour", "harbour "]));
        assert_eq!(out, "<mark>harbour</mark> news");
    }

    #[test]
    fn test_text_is_escaped_before_marking() {
        let out = highlight("<b>cats</b> & dogs", &kws(&["cats"]));
        assert_eq!(out, "&lt;b&gt;<mark>cats</mark>&lt;/b&gt; &amp; dogs");
    }

    #[test]
    fn test_keyword_matching_entity_name_leaves_entities_intact() {
        let out = highlight("fish & chips amp", &kws(&["amp"]));
        assert_eq!(out, "fish &amp; chips <mark>amp</mark>");
    }

    #[test]
    fn test_keyword_with_markup_characters() {
        let out = highlight("AT&T merged", &kws(&["AT&T"]));
        assert_eq!(out, "<mark>AT&amp;T</mark> merged");
    }

    #[test]
    fn test_mark_keyword_does_not_touch_inserted_markers() {
        let out = highlight("mark the market", &kws(&["market", "mark"]));
        assert_eq!(out, "<mark>mark</mark> the <mark>market</mark>");
    }

    #[test]
    fn test_empty_and_blank_keywords_are_ignored() {
        assert_eq!(highlight("plain text", &kws(&["", "   "])), "plain text");
    }

    #[test]
    fn test_unicode_text() {
        let out = highlight("Café society, café culture", &kws(&["café"]));
        assert_eq!(out, "<mark>Café</mark> society, <mark>café</mark> culture");
    }
}
