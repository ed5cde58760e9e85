//! Provider selection and connection settings.

use std::time::Duration;

/// Default base URL for OpenAI-compatible providers.
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    OpenAI,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "openai-compatible" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
        }
    }
}

/// Connection settings shared by all providers.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// Base URL; providers fall back to their public endpoint
    pub endpoint: Option<String>,

    /// Bearer credential
    pub api_key: Option<String>,

    /// Whole-request timeout; `None` keeps the HTTP client's default
    pub timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
