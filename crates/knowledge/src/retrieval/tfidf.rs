//! TF-IDF retrieval with cosine similarity.
//!
//! Weighting follows the conventional smoothed scheme:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, term weight = raw count × idf,
//! and every vector is L2-normalized so cosine similarity is a dot product.

use super::Retriever;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Tokens of two or more word characters.
static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term regex is valid"));

/// Lowercase TF-IDF terms of a text, with repeats.
pub fn terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TERM_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sparse vector with entries sorted by dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Build from `(dimension, weight)` pairs; zero weights are dropped.
    pub fn from_entries(mut entries: Vec<(usize, f32)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_by_key(|(dim, _)| *dim);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Scale to unit length. A zero vector stays zero.
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }

    /// Dot product by merging the sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_dim, a_w) = self.entries[i];
            let (b_dim, b_w) = other.entries[j];
            match a_dim.cmp(&b_dim) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// Vocabulary and idf weights fitted over a fixed document set.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    /// Term to dimension; dimensions follow sorted term order
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfVectorizer {
    /// Fit vocabulary and idf over the documents.
    pub fn fit<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut n_docs = 0usize;
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            n_docs += 1;
            let mut seen: Vec<String> = terms(doc);
            seen.sort();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (dim, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(smooth_idf(n_docs, df));
            vocabulary.insert(term, dim);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Dimension of a term, if it is in the vocabulary.
    pub fn dimension(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Unit-length TF-IDF vector of a text. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in terms(text) {
            if let Some(&dim) = self.vocabulary.get(&term) {
                *counts.entry(dim).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(dim, tf)| (dim, tf * self.idf[dim]))
            .collect();

        SparseVector::from_entries(entries).normalized()
    }
}

fn smooth_idf(n_docs: usize, df: usize) -> f32 {
    (((1 + n_docs) as f64 / (1 + df) as f64).ln() + 1.0) as f32
}

/// Scores documents by cosine similarity of TF-IDF vectors.
#[derive(Debug, Clone)]
pub struct TfIdfRetriever {
    vectorizer: TfIdfVectorizer,
    doc_vectors: Vec<SparseVector>,
}

impl TfIdfRetriever {
    /// Fit over the documents and vectorize each one. Never refit afterwards.
    pub fn new<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let texts: Vec<&str> = texts.into_iter().collect();
        let vectorizer = TfIdfVectorizer::fit(texts.iter().copied());
        let doc_vectors: Vec<SparseVector> =
            texts.iter().map(|t| vectorizer.transform(t)).collect();

        tracing::debug!(
            "TF-IDF retriever fitted: {} documents, {} terms",
            doc_vectors.len(),
            vectorizer.vocabulary_size()
        );

        Self {
            vectorizer,
            doc_vectors,
        }
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }
}

impl Retriever for TfIdfRetriever {
    fn name(&self) -> &str {
        "tfidf"
    }

    fn score(&self, query: &str) -> Vec<f32> {
        let query_vec = self.vectorizer.transform(query);
        if query_vec.is_empty() {
            return vec![0.0; self.doc_vectors.len()];
        }

        self.doc_vectors
            .iter()
            .map(|doc| query_vec.dot(doc).clamp(0.0, 1.0))
            .collect()
    }
}
