//! Document retrieval.
//!
//! Two interchangeable scorers rank every corpus document against a query:
//! - [`KeywordRetriever`]: distinct-token overlap, no numeric model
//! - [`TfIdfRetriever`]: TF-IDF vectors compared by cosine similarity
//!
//! Both are fitted once over the corpus at construction and are read-only
//! afterwards, so a single instance can be shared across request handlers.

pub mod keyword;
pub mod tfidf;

pub use keyword::KeywordRetriever;
pub use tfidf::{SparseVector, TfIdfRetriever, TfIdfVectorizer};

use crate::corpus::Corpus;
use crate::types::ScoredDocument;
use loanqa_core::{AppError, AppResult};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word regex is valid"));

/// Distinct lowercase word tokens (`\w+`) of a text.
pub fn word_tokens(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rank scores descending and keep the first `k`.
///
/// Ties keep ascending document index.
pub fn rank_top_k(scores: Vec<f32>, k: usize) -> Vec<ScoredDocument> {
    let mut ranked: Vec<ScoredDocument> = scores
        .into_iter()
        .enumerate()
        .map(|(index, score)| ScoredDocument { index, score })
        .collect();

    // sort_by is stable, so equal scores stay in index order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}

/// Trait for retrieval strategies.
pub trait Retriever: Send + Sync {
    /// Strategy name (e.g., "keyword", "tfidf").
    fn name(&self) -> &str;

    /// Score every corpus document against the query, in corpus order.
    fn score(&self, query: &str) -> Vec<f32>;

    /// Return at most `k` documents, highest score first.
    fn retrieve(&self, query: &str, k: usize) -> Vec<ScoredDocument> {
        rank_top_k(self.score(query), k)
    }
}

/// Retrieval strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieverKind {
    Keyword,
    TfIdf,
}

impl RetrieverKind {
    /// Parse a strategy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keyword" => Some(Self::Keyword),
            "tfidf" | "tf-idf" => Some(Self::TfIdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::TfIdf => "tfidf",
        }
    }
}

/// Build a retriever over the corpus.
pub fn create_retriever(kind: RetrieverKind, corpus: &Corpus) -> Box<dyn Retriever> {
    match kind {
        RetrieverKind::Keyword => Box::new(KeywordRetriever::new(corpus.texts())),
        RetrieverKind::TfIdf => Box::new(TfIdfRetriever::new(corpus.texts())),
    }
}

/// Build a retriever from a strategy name.
pub fn create_retriever_by_name(name: &str, corpus: &Corpus) -> AppResult<Box<dyn Retriever>> {
    let kind = RetrieverKind::parse(name).ok_or_else(|| {
        AppError::Config(format!(
            "Unknown retriever: '{}'. Supported retrievers: keyword, tfidf",
            name
        ))
    })?;
    Ok(create_retriever(kind, corpus))
}
