use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;

pub const DEFAULT_BANNED_PHRASES: &[&str] = &[
    "eco-friendly",
    "100% free",
    "win now",
    "guaranteed",
    "limited time",
    "deal expires",
    "best ever",
    "miracle",
    "clinically proven",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("semantic matcher unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseMatch {
    pub phrase: String,
    /// In `[0, 1]`.
    pub similarity: f64,
}

/// Finds banned phrases in creative copy. Only matches at or above the
/// implementation's threshold are returned.
pub trait SemanticMatcher: Send + Sync {
    fn find_banned_matches(&self, text: &str) -> Result<Vec<PhraseMatch>, MatcherError>;
}

/// TF-IDF cosine similarity between the copy and each phrase, each pair
/// treated as its own two-document corpus.
#[derive(Debug, Clone)]
pub struct LexicalMatcher {
    phrases: Vec<String>,
    threshold: f64,
}

impl Default for LexicalMatcher {
    fn default() -> Self {
        Self::new(
            DEFAULT_BANNED_PHRASES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_SIMILARITY_THRESHOLD,
        )
    }
}

impl LexicalMatcher {
    pub fn new(phrases: Vec<String>, threshold: f64) -> Self {
        Self { phrases, threshold }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl SemanticMatcher for LexicalMatcher {
    fn find_banned_matches(&self, text: &str) -> Result<Vec<PhraseMatch>, MatcherError> {
        let doc = tokenize(&normalize_text(text));
        let hits = self
            .phrases
            .iter()
            .filter_map(|phrase| {
                let similarity = tfidf_cosine(&doc, &tokenize(&normalize_text(phrase)));
                (similarity >= self.threshold).then(|| PhraseMatch {
                    phrase: phrase.clone(),
                    similarity,
                })
            })
            .collect();
        Ok(hits)
    }
}

/// Lowercases, turns punctuation into spaces and collapses whitespace.
pub fn normalize_text(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_punctuation() {
                ' '
            } else {
                c
            }
        })
        .collect::<String>()
        .to_lowercase();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Runs of two or more word characters.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

fn term_counts(tokens: &[String]) -> HashMap<&str, f64> {
    let mut counts = HashMap::new();
    for t in tokens {
        *counts.entry(t.as_str()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Smoothed idf over the pair: `ln((1 + n) / (1 + df)) + 1` with `n = 2`.
fn tfidf_cosine(a: &[String], b: &[String]) -> f64 {
    let ta = term_counts(a);
    let tb = term_counts(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let idf = |term: &str| {
        let df = f64::from(u8::from(ta.contains_key(term)) + u8::from(tb.contains_key(term)));
        (3.0 / (1.0 + df)).ln() + 1.0
    };

    let norm = |counts: &HashMap<&str, f64>| {
        counts
            .iter()
            .map(|(t, c)| (c * idf(t)).powi(2))
            .sum::<f64>()
            .sqrt()
    };

    let dot: f64 = ta
        .iter()
        .filter_map(|(t, ca)| tb.get(t).map(|cb| ca * cb * idf(t).powi(2)))
        .sum();

    let denom = norm(&ta) * norm(&tb);
    if denom > 0.0 {
        (dot / denom).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
