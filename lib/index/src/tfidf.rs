//! Sparse TF-IDF model, the lexical fallback for retrieval.
//!
//! Fits a vocabulary of word unigrams and bigrams over the corpus and
//! weights terms with smooth idf (`ln((1+n)/(1+df)) + 1`). Rows and
//! queries are L2-normalized so the sparse dot product is cosine
//! similarity. Query terms outside the vocabulary are ignored.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A sorted sparse vector of (term index, weight) pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    fn from_counts(counts: AHashMap<u32, f32>) -> Self {
        let mut entries: Vec<(u32, f32)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|&(idx, _)| idx);
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f32>()
            .sqrt()
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    /// Dot product via merge over the sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (ia, wa) = self.entries[i];
            let (ib, wb) = other.entries[j];
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted TF-IDF term-weighting model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfModel {
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfIdfModel {
    /// Fit the vocabulary and idf weights over a corpus.
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut vocabulary: AHashMap<String, u32> = AHashMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();

        for text in texts {
            let mut seen: AHashMap<u32, ()> = AHashMap::new();
            for term in ngrams(text.as_ref()) {
                let next_idx = vocabulary.len() as u32;
                let idx = *vocabulary.entry(term).or_insert(next_idx);
                if idx as usize == doc_freq.len() {
                    doc_freq.push(0);
                }
                seen.entry(idx).or_insert(());
            }
            for (idx, ()) in seen {
                doc_freq[idx as usize] += 1;
            }
        }

        let n_docs = texts.len() as f32;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Fit and transform the corpus in one pass, returning the row matrix.
    pub fn fit_transform<S: AsRef<str>>(texts: &[S]) -> (Self, Vec<SparseVector>) {
        let model = Self::fit(texts);
        let matrix = texts.iter().map(|t| model.transform(t.as_ref())).collect();
        (model, matrix)
    }

    /// Transform text into an L2-normalized tf-idf vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for term in ngrams(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, count) in counts.iter_mut() {
            *count *= self.idf[*idx as usize];
        }
        let mut vector = SparseVector::from_counts(counts);
        vector.normalize();
        vector
    }

    #[inline]
    #[must_use]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Tokenize text and emit word unigrams and bigrams.
/// Lowercase, punctuation-split, single characters dropped.
fn ngrams(text: &str) -> Vec<String> {
    let tokens: Vec<String> = text
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|s| s.len() > 1)
        .collect();

    let mut terms = tokens.clone();
    for pair in tokens.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}
