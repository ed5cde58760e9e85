//! LLM integration crate for Loan QA.
//!
//! This crate provides a provider-agnostic abstraction for chat-completion
//! services. Providers implement [`LlmClient`]; [`create_client`] picks one
//! from configuration.
//!
//! # Providers
//! - **OpenAI-compatible**: any endpoint serving `POST /chat/completions`
//!
//! # Example
//! ```no_run
//! use loanqa_llm::{create_client, ClientSettings, LlmRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::new().with_api_key("sk-...");
//! let client = create_client("openai", &settings)?;
//! let request = LlmRequest::new("What is a loan term?", "gpt-4.1-mini")
//!     .with_max_tokens(500)
//!     .with_temperature(0.3);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::OpenAiClient;
pub use types::{ClientSettings, ProviderType};
