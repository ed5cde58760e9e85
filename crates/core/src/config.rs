//! Configuration management for Loan QA.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.loanqa/config.yaml` in the workspace, or `LOANQA_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Relative data paths are resolved against the workspace directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Retrieval strategies understood by the knowledge crate.
pub const KNOWN_RETRIEVERS: [&str; 2] = ["keyword", "tfidf"];

/// Responder strategies understood by the knowledge crate.
pub const KNOWN_RESPONDERS: [&str; 2] = ["rules", "llm"];

/// Completion providers understood by the LLM crate.
pub const KNOWN_PROVIDERS: [&str; 1] = ["openai"];

/// How the request boundary renders a failed generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationErrorPolicy {
    /// Return the failure text as the answer (`"Error generating response: ..."`).
    #[default]
    Answer,

    /// Return an error status to the caller.
    Error,
}

impl GenerationErrorPolicy {
    /// Parse a policy name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "answer" => Some(Self::Answer),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Workspace root; relative paths resolve against it
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Free-text documentation file (document 0 of the corpus)
    pub documentation_path: PathBuf,

    /// Comma-delimited training dataset
    pub training_data_path: PathBuf,

    /// Retrieval strategy ("keyword" or "tfidf")
    pub retriever: String,

    /// Number of documents retrieved per query
    pub top_k: usize,

    /// Responder strategy ("rules" or "llm")
    pub responder: String,

    /// Optional YAML rules table replacing the built-in one
    pub rules_file: Option<PathBuf>,

    /// Optional YAML prompt definition replacing the built-in one
    pub prompt_file: Option<PathBuf>,

    /// Rendering of generation failures at the HTTP boundary
    pub generation_errors: GenerationErrorPolicy,

    /// Completion provider
    pub provider: String,

    /// Model identifier sent to the provider
    pub model: String,

    /// API key for the provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the completion API
    pub api_base: Option<String>,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout for the completion call; none means the client default
    pub timeout_secs: Option<u64>,

    /// HTTP bind address for `serve`
    pub bind: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    data: Option<DataSection>,
    retrieval: Option<RetrievalSection>,
    responder: Option<ResponderSection>,
    llm: Option<LlmSection>,
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataSection {
    documentation: Option<String>,
    #[serde(rename = "trainingData")]
    training_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalSection {
    strategy: Option<String>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponderSection {
    strategy: Option<String>,
    #[serde(rename = "rulesFile")]
    rules_file: Option<String>,
    #[serde(rename = "promptFile")]
    prompt_file: Option<String>,
    #[serde(rename = "generationErrors")]
    generation_errors: Option<GenerationErrorPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "maxTokens")]
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            documentation_path: PathBuf::from("loan_data_documentation.md"),
            training_data_path: PathBuf::from("TrainingDataset.csv"),
            retriever: "keyword".to_string(),
            top_k: 3,
            responder: "rules".to_string(),
            rules_file: None,
            prompt_file: None,
            generation_errors: GenerationErrorPolicy::Answer,
            provider: "openai".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_key: None,
            api_base: None,
            max_tokens: 500,
            temperature: 0.3,
            timeout_secs: None,
            bind: "127.0.0.1:5000".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and the environment.
    ///
    /// Environment variables:
    /// - `LOANQA_WORKSPACE`: Override workspace path
    /// - `LOANQA_CONFIG`: Path to config file
    /// - `LOANQA_DOCUMENTATION`, `LOANQA_TRAINING_DATA`: Input files
    /// - `LOANQA_RETRIEVER`, `LOANQA_TOP_K`, `LOANQA_RESPONDER`: Pipeline selection
    /// - `LOANQA_PROVIDER`, `LOANQA_MODEL`: Completion provider and model
    /// - `OPENAI_API_KEY`, `OPENAI_API_BASE`: Completion credentials and endpoint
    /// - `LOANQA_BIND`: Server bind address
    /// - `RUST_LOG`, `NO_COLOR`: Logging
    ///
    /// # Example
    /// ```no_run
    /// use loanqa_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Training data: {:?}", config.training_data());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit workspace and config file
    /// taking precedence over `LOANQA_WORKSPACE` and `LOANQA_CONFIG`.
    pub fn load_with(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("LOANQA_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        if let Some(config_file) =
            config_file.or_else(|| std::env::var("LOANQA_CONFIG").ok().map(PathBuf::from))
        {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.workspace.join(".loanqa/config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        config.apply_env()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(path) = std::env::var("LOANQA_DOCUMENTATION") {
            self.documentation_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("LOANQA_TRAINING_DATA") {
            self.training_data_path = PathBuf::from(path);
        }

        if let Ok(retriever) = std::env::var("LOANQA_RETRIEVER") {
            self.retriever = retriever;
        }

        if let Ok(top_k) = std::env::var("LOANQA_TOP_K") {
            self.top_k = top_k.parse().map_err(|_| {
                AppError::Config(format!("LOANQA_TOP_K must be a positive integer, got '{}'", top_k))
            })?;
        }

        if let Ok(responder) = std::env::var("LOANQA_RESPONDER") {
            self.responder = responder;
        }

        if let Ok(provider) = std::env::var("LOANQA_PROVIDER") {
            self.provider = provider;
        }

        if let Ok(model) = std::env::var("LOANQA_MODEL") {
            self.model = model;
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            self.api_base = Some(base);
        }

        if let Ok(bind) = std::env::var("LOANQA_BIND") {
            self.bind = bind;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.merge_file(config_file))
    }

    fn merge_file(&self, file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(data) = file.data {
            if let Some(doc) = data.documentation {
                result.documentation_path = PathBuf::from(doc);
            }
            if let Some(train) = data.training_data {
                result.training_data_path = PathBuf::from(train);
            }
        }

        if let Some(retrieval) = file.retrieval {
            if let Some(strategy) = retrieval.strategy {
                result.retriever = strategy;
            }
            if let Some(top_k) = retrieval.top_k {
                result.top_k = top_k;
            }
        }

        if let Some(responder) = file.responder {
            if let Some(strategy) = responder.strategy {
                result.responder = strategy;
            }
            result.rules_file = responder.rules_file.map(PathBuf::from).or(result.rules_file);
            result.prompt_file = responder
                .prompt_file
                .map(PathBuf::from)
                .or(result.prompt_file);
            if let Some(policy) = responder.generation_errors {
                result.generation_errors = policy;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(env_var) = llm.api_key_env {
                // The file names the variable; the secret itself never lives in YAML.
                if let Ok(key) = std::env::var(&env_var) {
                    result.api_key = Some(key);
                }
            }
            result.api_base = llm.endpoint.or(result.api_base);
            if let Some(max_tokens) = llm.max_tokens {
                result.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = temperature;
            }
            result.timeout_secs = llm.timeout_secs.or(result.timeout_secs);
        }

        if let Some(server) = file.server {
            if let Some(bind) = server.bind {
                result.bind = bind;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        retriever: Option<String>,
        responder: Option<String>,
        top_k: Option<usize>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(retriever) = retriever {
            self.retriever = retriever;
        }

        if let Some(responder) = responder {
            self.responder = responder;
        }

        if let Some(top_k) = top_k {
            self.top_k = top_k;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve a path against the workspace unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Resolved documentation file path.
    pub fn documentation(&self) -> PathBuf {
        self.resolve(&self.documentation_path)
    }

    /// Resolved training dataset path.
    pub fn training_data(&self) -> PathBuf {
        self.resolve(&self.training_data_path)
    }

    /// Validate configuration for the selected pipeline.
    pub fn validate(&self) -> AppResult<()> {
        let retriever = self.retriever.to_lowercase();
        if !KNOWN_RETRIEVERS.contains(&retriever.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown retriever: {}. Supported: {}",
                self.retriever,
                KNOWN_RETRIEVERS.join(", ")
            )));
        }

        let responder = self.responder.to_lowercase();
        if !KNOWN_RESPONDERS.contains(&responder.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown responder: {}. Supported: {}",
                self.responder,
                KNOWN_RESPONDERS.join(", ")
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }

        if responder == "llm" {
            if !KNOWN_PROVIDERS.contains(&self.provider.to_lowercase().as_str()) {
                return Err(AppError::Config(format!(
                    "Unknown provider: {}. Supported: {}",
                    self.provider,
                    KNOWN_PROVIDERS.join(", ")
                )));
            }

            if self.api_key.as_deref().map_or(true, str::is_empty) {
                return Err(AppError::Config(
                    "The llm responder requires an API key (set OPENAI_API_KEY)".to_string(),
                ));
            }
        }

        Ok(())
    }
}
