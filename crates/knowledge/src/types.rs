//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};

/// Where a document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentSource {
    /// The documentation file, always document 0
    Documentation,

    /// One dataset row
    Record {
        /// Zero-based row position in the dataset
        row: usize,

        /// Value of the `Loan_ID` field (empty when the row lacks it)
        loan_id: String,
    },
}

/// One retrievable unit of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Text content
    pub text: String,

    /// Provenance
    pub source: DocumentSource,
}

/// A document index paired with its relevance score for one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Index into the corpus
    pub index: usize,

    /// Relevance score (higher is better)
    pub score: f32,
}

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Fixed text from the rules table
    Canned,

    /// Computed from an aggregate over the dataset
    Statistic,

    /// Excerpt of the retrieved documents
    Fallback,

    /// Returned by the text-generation service
    Generated,
}

/// A responder's answer to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub kind: AnswerKind,
}

impl Answer {
    pub fn new(text: impl Into<String>, kind: AnswerKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Result from a full retrieve-then-respond pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResult {
    /// Query text as received
    pub query: String,

    /// Retrieved document texts (sorted by relevance)
    pub retrieved_documents: Vec<String>,

    /// Relevance scores, parallel to `retrieved_documents`
    pub scores: Vec<f32>,

    /// The responder's answer
    pub answer: Answer,
}
