//! OpenAI-compatible chat-completion provider.
//!
//! Works against any service exposing `POST {base}/chat/completions` with
//! bearer authentication (OpenAI, Azure-style proxies, local gateways).

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use crate::types::{ClientSettings, DEFAULT_OPENAI_BASE};
use loanqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Chat message in the wire format.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completion request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat-completion response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI-compatible LLM client.
pub struct OpenAiClient {
    /// Base URL, without trailing slash
    base_url: String,

    /// Bearer credential
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client from connection settings.
    ///
    /// Fails when no API key is configured or the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> AppResult<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Llm("OpenAI provider requires API key".to_string()))?;

        let base_url = settings
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE)
            .trim_end_matches('/')
            .to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Convert LlmRequest to the chat-completion wire format.
    fn to_chat_request(&self, request: &LlmRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    /// Convert the wire response to LlmResponse.
    fn convert_response(
        &self,
        request: &LlmRequest,
        response: ChatCompletionResponse,
    ) -> AppResult<LlmResponse> {
        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("Completion response contained no choices".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| AppError::Llm("Completion response contained no text".to_string()))?;

        let model = if response.model.is_empty() {
            request.model.clone()
        } else {
            response.model
        };

        Ok(LlmResponse {
            content,
            model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending chat completion request (model: {})", request.model);
        tracing::debug!("Request: {:?}", request);

        let body = self.to_chat_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Completion API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse completion response: {}", e)))?;

        let converted = self.convert_response(request, parsed)?;

        tracing::info!(
            "Received completion ({} prompt / {} completion tokens)",
            converted.usage.prompt_tokens,
            converted.usage.completion_tokens
        );

        Ok(converted)
    }
}
