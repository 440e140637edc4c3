use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_KEYWORDS: usize = 10;
pub const SUMMARY_SENTENCES: usize = 3;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at",
    "be", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "for",
    "from", "had", "has", "have", "he", "her", "his", "how", "if", "in", "into", "is", "it",
    "its", "just", "more", "most", "new", "not", "of", "on", "one", "or", "other", "our",
    "out", "over", "said", "says", "she", "so", "some", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "to", "under",
    "up", "us", "was", "we", "were", "what", "when", "which", "while", "who", "will",
    "with", "would", "year", "you", "your",
];

lazy_static! {
    static ref SENTENCE_RE: Regex = Regex::new(r"[^.!?]+(?:[.!?]+|$)").unwrap();
}

/// Lower-cased content words: three or more characters, not a number, not a stop word.
pub fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3 && !w.chars().all(|c| c.is_numeric()))
        .map(|w| w.to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

fn word_frequencies(text: &str) -> (Vec<String>, HashMap<String, usize>) {
    let mut order = Vec::new();
    let mut counts = HashMap::new();
    for word in content_words(text) {
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }
    (order, counts)
}

/// Most frequent content words, ties broken by first appearance.
pub fn top_keywords(text: &str, limit: usize) -> Vec<String> {
    let (mut order, counts) = word_frequencies(text);
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(limit);
    order
}

pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Picks the `max_sentences` sentences whose words are most frequent across
/// the whole text and returns them in their original order.
pub fn extractive_summary(text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let (_, counts) = word_frequencies(text);
    let mut scored: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (i, content_words(s).map(|w| counts.get(&w).copied().unwrap_or(0)).sum()))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut picked: Vec<usize> = scored.into_iter().take(max_sentences).map(|(i, _)| i).collect();
    picked.sort_unstable();
    picked
        .into_iter()
        .map(|i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
