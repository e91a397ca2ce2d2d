//! TF-IDF vectorization of error strings

use crate::error::LogClusterError;
use crate::stop_words::is_stop_word;
use log::debug;
use ndarray::Array2;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Tokens are runs of two or more word characters
pub const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Numeric representation of an error log, one row per record
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// L2-normalised TF-IDF weights (n_records, n_terms)
    pub features: Array2<f64>,
    /// Term for each column, sorted
    pub vocabulary: Vec<String>,
}

impl FeatureMatrix {
    pub fn nrows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of rows that differ from every other row
    pub fn distinct_rows(&self) -> usize {
        self.features
            .outer_iter()
            .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Lower-cases, tokenizes, drops English stop words and weights terms by
/// smoothed TF-IDF
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    token_pattern: Regex,
}

impl TfIdfVectorizer {
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            token_pattern: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// Split one document into its non-stop-word tokens
    pub fn tokenize(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        self.token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !is_stop_word(token))
            .map(str::to_string)
            .collect()
    }

    /// Learn the vocabulary from `documents` and return their weights
    ///
    /// # Returns
    /// * `FeatureMatrix` with one row per document, in input order
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> crate::Result<FeatureMatrix> {
        if documents.is_empty() {
            return Err(LogClusterError::EmptyVocabulary("no documents to vectorize".into()).into());
        }

        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|d| self.tokenize(d.as_ref())).collect();

        let terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(LogClusterError::EmptyVocabulary(
                "documents contain only stop words".into(),
            )
            .into());
        }

        let vocabulary: Vec<String> = terms.into_iter().map(str::to_string).collect();
        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let n_docs = documents.len();
        let n_terms = vocabulary.len();

        // Raw term counts
        let mut features = Array2::<f64>::zeros((n_docs, n_terms));
        for (row, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                features[[row, index[token.as_str()]]] += 1.0;
            }
        }

        // Smoothed idf: ln((1 + n) / (1 + df)) + 1
        let idf: Vec<f64> = features
            .columns()
            .into_iter()
            .map(|column| {
                let df = column.iter().filter(|&&c| c > 0.0).count() as f64;
                ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        for mut row in features.rows_mut() {
            for (value, weight) in row.iter_mut().zip(idf.iter()) {
                *value *= weight;
            }
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        debug!("Vectorized {} documents into {} terms", n_docs, n_terms);

        Ok(FeatureMatrix {
            features,
            vocabulary,
        })
    }
}
