//! Loan knowledge base: corpus construction, retrieval, and answering.
//!
//! The corpus is one documentation text followed by one synthesized document
//! per dataset row. Questions are answered by ranking the corpus with a
//! retriever and handing the top documents to a responder.

pub mod analysis;
pub mod corpus;
pub mod loader;
pub mod rag;
pub mod respond;
pub mod retrieval;
pub mod statistics;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use analysis::{profile_dataset, ColumnKind, ColumnProfile, DatasetProfile, NumericSummary};
pub use corpus::{render_record, Corpus, LOAN_ID_FIELD};
pub use loader::{load_dataset, load_documentation, parse_dataset, Dataset, DatasetRow};
pub use rag::{RagSystem, DEFAULT_TOP_K};
pub use respond::{LlmResponder, Responder, ResponderKind, RuleResponder, RuleTable};
pub use retrieval::{
    create_retriever, KeywordRetriever, Retriever, RetrieverKind, TfIdfRetriever,
};
pub use types::{Answer, AnswerKind, AskResult, Document, DocumentSource, ScoredDocument};
