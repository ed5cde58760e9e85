//! Answer generation strategies.
//!
//! A responder turns a query plus its retrieved documents into an [`Answer`].
//! The rule-based responder works offline from a data-driven rules table; the
//! LLM responder forwards the documents to a chat-completion service.

pub mod llm;
pub mod rules;

pub use llm::LlmResponder;
pub use rules::{Rule, RuleResponder, RuleResponse, RuleTable, Statistic};

use crate::types::{Answer, Document};
use loanqa_core::AppResult;

/// Trait for answer strategies.
#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    /// Strategy name (e.g., "rules", "llm").
    fn name(&self) -> &str;

    /// Answer a query from the retrieved documents, most relevant first.
    ///
    /// A failed generation step is reported as `AppError::Generation`.
    async fn respond(&self, query: &str, documents: &[&Document]) -> AppResult<Answer>;
}

/// Responder strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderKind {
    Rules,
    Llm,
}

impl ResponderKind {
    /// Parse a strategy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rules" => Some(Self::Rules),
            "llm" => Some(Self::Llm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Llm => "llm",
        }
    }
}
