//! Text normalization and keyword frequency extraction

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Default number of keywords kept per page.
pub const DEFAULT_TOP_N: usize = 20;

/// Terms that never count as keywords.
pub const STOPWORDS: [&str; 15] = [
    "the", "and", "to", "of", "a", "in", "for", "is", "on", "with", "that", "as", "by", "it", "are",
];

/// Tokens shorter than this are ignored.
const MIN_TOKEN_CHARS: usize = 3;

static RE_NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("invalid normalizer regex"));

/// Replace everything outside `[A-Za-z0-9\s]` with a space and lowercase the rest.
pub fn normalize_text(text: Option<&str>) -> String {
    let text = text.unwrap_or_default();
    RE_NON_ALPHANUMERIC
        .replace_all(text, " ")
        .to_lowercase()
}

/// Ordered term -> count table.
///
/// Entries are kept in ranking order: descending count, ties in the order the
/// term was first seen. Serializes as a JSON object in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFrequency {
    entries: Vec<(String, usize)>,
}

impl KeywordFrequency {
    /// Count terms in encounter order and rank them.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counter = Counter::default();
        for term in terms {
            counter.add(term.as_ref(), 1);
        }
        counter.into_ranked()
    }

    /// Sum several tables into one, keeping first-seen order for ties.
    pub fn merge<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = &'a KeywordFrequency>,
    {
        let mut counter = Counter::default();
        for table in tables {
            for (term, count) in &table.entries {
                counter.add(term, *count);
            }
        }
        counter.into_ranked()
    }

    /// Keep only the `n` highest ranked entries.
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn get(&self, term: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for KeywordFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (term, count) in &self.entries {
            map.serialize_entry(term, count)?;
        }
        map.end()
    }
}

/// Insertion-ordered counter.
#[derive(Default)]
struct Counter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl Counter {
    fn add(&mut self, term: &str, count: usize) {
        match self.index.get(term) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(term.to_string(), self.entries.len());
                self.entries.push((term.to_string(), count));
            }
        }
    }

    fn into_ranked(mut self) -> KeywordFrequency {
        // sort_by is stable, so equal counts keep their encounter order
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        KeywordFrequency {
            entries: self.entries,
        }
    }
}

fn is_keyword(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS && !STOPWORDS.contains(&token)
}

/// Extract the `top_n` most frequent non-stopword terms from `text`.
pub fn extract_keywords(text: &str, top_n: usize) -> KeywordFrequency {
    let normalized = normalize_text(Some(text));
    KeywordFrequency::from_terms(normalized.split_whitespace().filter(|t| is_keyword(t))).top(top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_lowercases() {
        assert_eq!(
            normalize_text(Some("Hello, World! It's 2024.")),
            "hello  world  it s 2024 "
        );
    }

    #[test]
    fn normalize_handles_missing_input() {
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(Some("")), "");
    }

    #[test]
    fn normalize_replaces_non_ascii_letters() {
        assert_eq!(normalize_text(Some("Café")), "caf ");
    }

    #[test]
    fn extracts_ranked_keywords() {
        let text = "Running shoes. Best running shoes for running. Shoes!";
        let keywords = extract_keywords(text, DEFAULT_TOP_N);

        let ranked: Vec<(&str, usize)> = keywords.iter().collect();
        assert_eq!(ranked, vec![("running", 3), ("shoes", 3), ("best", 1)]);
    }

    #[test]
    fn never_returns_stopwords_or_short_tokens() {
        let text = "The cat and the dog are on it. A to of in is by as ox go THE AND";
        let keywords = extract_keywords(text, DEFAULT_TOP_N);

        for term in keywords.terms() {
            assert!(!STOPWORDS.contains(&term), "stopword {term} leaked");
            assert!(term.len() >= 3, "short token {term} leaked");
        }
        assert_eq!(keywords.get("cat"), Some(1));
        assert_eq!(keywords.get("dog"), Some(1));
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let keywords = extract_keywords("zebra apple mango apple zebra mango", DEFAULT_TOP_N);
        let terms: Vec<&str> = keywords.terms().collect();
        assert_eq!(terms, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "alpha beta gamma beta delta alpha epsilon zeta eta theta alpha";
        let first = extract_keywords(text, 5);
        let second = extract_keywords(text, 5);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn respects_top_n() {
        let text = (0..50)
            .map(|i| format!("term{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(extract_keywords(&text, DEFAULT_TOP_N).len(), 20);
        assert!(extract_keywords(&text, 0).is_empty());
    }

    #[test]
    fn merge_sums_counts_across_tables() {
        let first = KeywordFrequency::from_terms(["shoes", "shoes", "trail"]);
        let second = KeywordFrequency::from_terms(["road", "trail", "trail", "shoes"]);

        let merged = KeywordFrequency::merge([&first, &second]);
        let ranked: Vec<(&str, usize)> = merged.iter().collect();
        assert_eq!(ranked, vec![("shoes", 3), ("trail", 3), ("road", 1)]);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let keywords = KeywordFrequency::from_terms(["beta", "alpha", "alpha"]);
        let json = serde_json::to_string(&keywords).unwrap();
        assert_eq!(json, r#"{"alpha":2,"beta":1}"#);
    }
}
