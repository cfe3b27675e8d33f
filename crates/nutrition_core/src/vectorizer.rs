//! TF-IDF text vectorizer
//!
//! Learns a bounded vocabulary from a corpus and maps text to dense,
//! L2-normalised term-frequency × inverse-document-frequency vectors.
//! Columns are assigned in lexicographic term order so that a fitted
//! vectorizer always produces the same layout for the same corpus.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::errors::{ModelError, Result};
use crate::serde_canon::to_canonical_json_pretty;
use crate::text::tokenize;

/// Default vocabulary bound
pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// Fitted (or unfitted) TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    /// Upper bound on vocabulary size
    pub max_features: usize,

    /// Term -> column index
    pub vocabulary: BTreeMap<String, usize>,

    /// Smoothed IDF weight per column
    pub idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Number of output columns
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Learn vocabulary and IDF weights from `documents`.
    ///
    /// Fails with [`ModelError::EmptyVocabulary`] when no document contributes
    /// a single term.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|doc| tokenize(doc.as_ref())).collect();

        let mut term_counts: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            for token in tokens {
                *term_counts.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(ModelError::EmptyVocabulary(format!(
                "{} documents produced no terms after stop-word removal",
                documents.len()
            )));
        }

        // Most frequent terms first, ties broken by term order
        let mut ranked: Vec<(&str, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let kept: BTreeSet<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        self.vocabulary = kept
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut doc_freq = vec![0usize; self.vocabulary.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens
                .iter()
                .filter_map(|t| self.vocabulary.get(t).copied())
                .collect();
            for idx in unique {
                doc_freq[idx] += 1;
            }
        }

        let n_docs = documents.len() as f64;
        self.idf = doc_freq
            .into_iter()
            .map(|df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        tracing::debug!(
            "Fitted vectorizer: {} terms from {} documents",
            self.vocabulary.len(),
            documents.len()
        );

        Ok(())
    }

    /// Map a single text to its feature vector.
    ///
    /// Text with no in-vocabulary terms yields the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut vector = vec![0.0; self.vocabulary.len()];
        for (idx, count) in counts {
            vector[idx] = count as f64 * self.idf[idx];
        }

        let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in vector.iter_mut() {
                *x /= norm;
            }
        }

        vector
    }

    /// Transform every document into a row of the feature matrix
    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Vec<f64>> {
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }

    /// Fit on `documents` and return their feature matrix
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<Vec<f64>>> {
        self.fit(documents)?;
        Ok(self.transform_all(documents))
    }

    /// Check internal consistency of a fitted vectorizer
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(ModelError::EmptyVocabulary(
                "vectorizer has no vocabulary".to_string(),
            ));
        }

        if self.vocabulary.len() > self.max_features {
            return Err(ModelError::ValidationFailed(format!(
                "vocabulary size {} exceeds max_features {}",
                self.vocabulary.len(),
                self.max_features
            )));
        }

        if self.idf.len() != self.vocabulary.len() {
            return Err(ModelError::ValidationFailed(format!(
                "idf length {} does not match vocabulary size {}",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }

        let columns: BTreeSet<usize> = self.vocabulary.values().copied().collect();
        if columns.len() != self.vocabulary.len()
            || columns.iter().next_back().copied() != Some(self.vocabulary.len() - 1)
        {
            return Err(ModelError::ValidationFailed(
                "vocabulary columns are not a contiguous range".to_string(),
            ));
        }

        Ok(())
    }

    /// Save as canonical JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = to_canonical_json_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a previously saved vectorizer
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let vectorizer: TfidfVectorizer = serde_json::from_str(&json)?;
        vectorizer.validate()?;
        Ok(vectorizer)
    }
}
