//! Cluster keyword extraction

use std::collections::HashMap;

use super::vectorize::tokenize;
use crate::text::KEYWORD_STOP_WORDS;

fn is_keyword(term: &str) -> bool {
    term.len() > 4
        && !KEYWORD_STOP_WORDS.contains(term)
        && term.parse::<f64>().is_err()
        && !term.contains("http")
        && !term.contains(".com")
        && term.bytes().all(|b| b.is_ascii_lowercase())
}

/// Most frequent meaningful terms across `texts`
///
/// Ties keep the order in which terms first appear.
pub fn extract_keywords<S: AsRef<str>>(texts: &[S], n: usize) -> Vec<String> {
    let combined = texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");

    // term -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, term) in tokenize(&combined).into_iter().enumerate() {
        counts.entry(term).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .filter(|(term, _)| is_keyword(term))
        .map(|(term, (count, first))| (term, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    ranked.into_iter().take(n).map(|(term, _, _)| term).collect()
}
