//! Text tokenization and word frequency helpers
//!
//! Shared by the trending-topic detector and the cluster keyword extractor.
//! Filtering is deliberately conservative so that URLs, marketplace
//! boilerplate and the brand name itself never surface as signals.

pub mod stopwords;

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

pub use stopwords::{is_stop_word, KEYWORD_STOP_WORDS, TOKEN_STOP_WORDS};

/// Default minimum token length for trending tokens
pub const DEFAULT_MIN_LENGTH: usize = 5;

/// Default maximum token length for trending tokens
pub const DEFAULT_MAX_LENGTH: usize = 15;

const URL_FRAGMENTS: &[&str] = &["http", "www", "item", "shop"];
const SPAM_PATTERNS: &[&str] = &["itemid", "shopid", "userid", "productid"];

lazy_static! {
    static ref ASCII_WORD: Regex =
        Regex::new(r"(?-u:\b)[a-z]+(?-u:\b)").expect("valid word regex");
}

/// Check whether a lower-cased candidate survives the token filter
pub fn is_valid_word(word: &str, min_length: usize, max_length: usize) -> bool {
    let cleaned = word.trim().to_lowercase();

    if cleaned.len() < min_length || cleaned.len() > max_length {
        return false;
    }
    if TOKEN_STOP_WORDS.contains(cleaned.as_str()) {
        return false;
    }
    if !cleaned.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }
    if URL_FRAGMENTS.iter().any(|frag| cleaned.contains(frag)) {
        return false;
    }
    !SPAM_PATTERNS.iter().any(|pattern| cleaned.contains(pattern))
}

/// Extract filtered tokens from text
///
/// Lower-cases the input and takes maximal runs of `a-z` as candidates.
/// Runs glued to ASCII digits or `_` (e.g. `abc123`) do not form a token;
/// non-ASCII letters act as separators.
pub fn extract_tokens(text: &str, min_length: usize, max_length: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    ASCII_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| is_valid_word(token, min_length, max_length))
        .map(str::to_string)
        .collect()
}

/// Count filtered tokens across a set of texts
pub fn word_frequency<I, S>(texts: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut frequency = HashMap::new();
    for text in texts {
        for token in extract_tokens(text.as_ref(), DEFAULT_MIN_LENGTH, DEFAULT_MAX_LENGTH) {
            *frequency.entry(token).or_insert(0) += 1;
        }
    }
    frequency
}

/// Highest-count words first; equal counts are ordered alphabetically
pub fn top_words(frequency: &HashMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut words: Vec<(String, usize)> = frequency
        .iter()
        .map(|(word, &count)| (word.clone(), count))
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(n);
    words
}
