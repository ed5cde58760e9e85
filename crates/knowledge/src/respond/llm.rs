//! LLM-backed responder.

use super::Responder;
use crate::types::{Answer, AnswerKind, Document};
use loanqa_core::{AppError, AppResult};
use loanqa_llm::{LlmClient, LlmRequest};
use loanqa_prompt::{build_prompt, default_rag_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Sends the retrieved documents and the query to a chat-completion service.
pub struct LlmResponder {
    client: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmResponder {
    /// Create a responder with the built-in prompt and default sampling.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            prompt: default_rag_prompt(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Render the completion request for a query.
    pub fn build_request(&self, query: &str, documents: &[&Document]) -> AppResult<LlmRequest> {
        let context = documents
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context);
        vars.insert("query".to_string(), query.to_string());

        let built = build_prompt(&self.prompt, vars)?;

        let mut request = LlmRequest::new(built.user, self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }

        Ok(request)
    }
}

#[async_trait::async_trait]
impl Responder for LlmResponder {
    fn name(&self) -> &str {
        "llm"
    }

    async fn respond(&self, query: &str, documents: &[&Document]) -> AppResult<Answer> {
        let request = self.build_request(query, documents)?;

        tracing::debug!(
            "Requesting completion from {} (model: {}, {} documents)",
            self.client.provider_name(),
            self.model,
            documents.len()
        );

        let response = self.client.complete(&request).await.map_err(|e| {
            tracing::warn!("Completion call failed: {}", e);
            AppError::Generation(e.to_string())
        })?;

        tracing::info!(
            "Completion received ({} tokens)",
            response.usage.total_tokens
        );

        Ok(Answer::new(response.content, AnswerKind::Generated))
    }
}
