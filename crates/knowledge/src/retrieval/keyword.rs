//! Keyword-overlap retrieval.

use super::{word_tokens, Retriever};
use std::collections::HashSet;

/// Fraction of distinct query tokens that also occur in the document.
///
/// Returns 0 when the query has no tokens.
pub fn keyword_overlap(query_tokens: &HashSet<String>, doc_tokens: &HashSet<String>) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let common = query_tokens.intersection(doc_tokens).count();
    common as f32 / query_tokens.len() as f32
}

/// Scores documents by distinct-token overlap with the query.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    /// Distinct tokens per document, in corpus order
    doc_tokens: Vec<HashSet<String>>,
}

impl KeywordRetriever {
    /// Tokenize every document once.
    pub fn new<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let doc_tokens: Vec<HashSet<String>> = texts.into_iter().map(word_tokens).collect();
        tracing::debug!("Keyword retriever indexed {} documents", doc_tokens.len());
        Self { doc_tokens }
    }
}

impl Retriever for KeywordRetriever {
    fn name(&self) -> &str {
        "keyword"
    }

    fn score(&self, query: &str) -> Vec<f32> {
        let query_tokens = word_tokens(query);
        self.doc_tokens
            .iter()
            .map(|doc| keyword_overlap(&query_tokens, doc))
            .collect()
    }
}
