//! LLM provider factory.
//!
//! Creates LLM clients from a provider name and connection settings.

use crate::client::LlmClient;
use crate::providers::OpenAiClient;
use crate::types::{ClientSettings, ProviderType};
use loanqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai")
/// * `settings` - Endpoint, API key and timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown, or the provider's
/// own error if required settings are missing.
pub fn create_client(provider: &str, settings: &ClientSettings) -> AppResult<Arc<dyn LlmClient>> {
    match ProviderType::parse(provider) {
        Some(ProviderType::OpenAI) => {
            let client = OpenAiClient::new(settings)?;
            tracing::debug!(
                "Created OpenAI-compatible client (endpoint: {})",
                settings.endpoint.as_deref().unwrap_or("default")
            );
            Ok(Arc::new(client))
        }
        None => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_client() {
        let settings = ClientSettings::new().with_api_key("sk-test");
        let client = create_client("openai", &settings).unwrap();
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn test_openai_with_custom_endpoint() {
        let settings = ClientSettings::new()
            .with_api_key("sk-test")
            .with_endpoint("http://localhost:8080/v1");
        assert!(create_client("openai", &settings).is_ok());
    }

    #[test]
    fn test_openai_requires_api_key() {
        match create_client("openai", &ClientSettings::new()) {
            Err(err) => assert!(err.to_string().contains("requires API key")),
            Ok(_) => panic!("Expected error for OpenAI without API key"),
        }
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", &ClientSettings::new()) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
