//! TF-IDF vectorization of mention texts

use std::collections::{HashMap, HashSet};

use super::ClusterError;

/// Split lower-cased text into maximal ASCII alphanumeric runs
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Dense TF-IDF matrix, one row per document
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    /// Terms in first-seen order; column `i` belongs to `vocabulary[i]`
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfIdfMatrix {
    /// Vectorize documents with raw term counts and smoothed IDF
    ///
    /// `weight = tf * (1 + ln(N / (1 + df)))`
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Result<Self, ClusterError> {
        let documents: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut vocabulary = Vec::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for doc in &documents {
            let mut seen = HashSet::new();
            for term in doc {
                let column = *index.entry(term.clone()).or_insert_with(|| {
                    vocabulary.push(term.clone());
                    document_frequency.push(0);
                    vocabulary.len() - 1
                });
                if seen.insert(column) {
                    document_frequency[column] += 1;
                }
            }
        }

        if vocabulary.is_empty() {
            return Err(ClusterError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| 1.0 + (n / (1.0 + df as f64)).ln())
            .collect();

        let rows = documents
            .iter()
            .map(|doc| {
                let mut row = vec![0.0; vocabulary.len()];
                for term in doc {
                    row[index[term]] += 1.0;
                }
                for (weight, idf) in row.iter_mut().zip(&idf) {
                    *weight *= idf;
                }
                row
            })
            .collect::<Vec<_>>();

        if rows.iter().flatten().any(|w| !w.is_finite()) {
            return Err(ClusterError::NonFiniteWeights);
        }

        Ok(Self { vocabulary, rows })
    }

    /// Number of columns
    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_alphanumeric_runs() {
        assert_eq!(
            tokenize("Series-9 is GREAT!! 10/10"),
            vec!["series", "9", "is", "great", "10", "10"]
        );
    }

    #[test]
    fn test_tokenize_splits_on_non_ascii() {
        assert_eq!(
            tokenize("battery電池 écran café2"),
            vec!["battery", "cran", "caf", "2"]
        );
    }

    #[test]
    fn test_smoothed_idf_weights() {
        let matrix = TfIdfMatrix::fit(&["battery battery dies", "battery ok"]).unwrap();
        assert_eq!(matrix.vocabulary, vec!["battery", "dies", "ok"]);

        // battery: df=2, idf = 1 + ln(2/3); tf=2 in the first document
        let battery_idf = 1.0 + (2.0f64 / 3.0).ln();
        assert!((matrix.rows[0][0] - 2.0 * battery_idf).abs() < 1e-12);
        // dies: df=1, idf = 1 + ln(1) = 1
        assert!((matrix.rows[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(matrix.rows[1][1], 0.0);
    }

    #[test]
    fn test_empty_vocabulary() {
        let err = TfIdfMatrix::fit(&["!!!", "...", ""]).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyVocabulary));
    }
}
