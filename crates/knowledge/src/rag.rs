//! The question-answering pipeline: retrieve, then respond.

use crate::corpus::Corpus;
use crate::respond::{LlmResponder, Responder, ResponderKind, RuleResponder, RuleTable};
use crate::retrieval::{create_retriever_by_name, Retriever};
use crate::types::{AskResult, Document, ScoredDocument};
use loanqa_core::{AppConfig, AppError, AppResult};
use loanqa_llm::{create_client, ClientSettings};
use std::sync::Arc;
use std::time::Duration;

/// Default number of documents retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Corpus, fitted retriever and responder, built once and then read-only.
///
/// Share it across tasks behind an `Arc`; no method takes `&mut self`.
pub struct RagSystem {
    corpus: Arc<Corpus>,
    retriever: Box<dyn Retriever>,
    responder: Box<dyn Responder>,
    top_k: usize,
}

impl RagSystem {
    pub fn new(
        corpus: Arc<Corpus>,
        retriever: Box<dyn Retriever>,
        responder: Box<dyn Responder>,
        top_k: usize,
    ) -> Self {
        Self {
            corpus,
            retriever,
            responder,
            top_k,
        }
    }

    /// Build the full pipeline from configuration.
    ///
    /// Loads both input files, fits the retriever, and sets up the responder
    /// (rules table or completion client). Any failure here is fatal.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let corpus = Arc::new(Corpus::load(&config.documentation(), &config.training_data())?);
        let retriever = create_retriever_by_name(&config.retriever, &corpus)?;
        let responder = build_responder(config, &corpus)?;

        tracing::info!(
            "RAG system ready: {} documents, retriever={}, responder={}, top_k={}",
            corpus.len(),
            retriever.name(),
            responder.name(),
            config.top_k
        );

        Ok(Self::new(corpus, retriever, responder, config.top_k))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn retriever_name(&self) -> &str {
        self.retriever.name()
    }

    pub fn responder_name(&self) -> &str {
        self.responder.name()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Top-k documents for a query, highest score first.
    pub fn retrieve(&self, query: &str) -> Vec<ScoredDocument> {
        self.retriever.retrieve(query, self.top_k)
    }

    /// Retrieve documents for the query and answer it.
    pub async fn ask(&self, query: &str) -> AppResult<AskResult> {
        let ranked = self.retrieve(query);
        let documents: Vec<&Document> = ranked
            .iter()
            .filter_map(|s| self.corpus.get(s.index))
            .collect();

        tracing::debug!(
            "Retrieved {} documents (top score: {:.3})",
            documents.len(),
            ranked.first().map(|s| s.score).unwrap_or(0.0)
        );

        let answer = self.responder.respond(query, &documents).await?;

        tracing::info!("Answered query with {:?} answer", answer.kind);

        Ok(AskResult {
            query: query.to_string(),
            retrieved_documents: documents.iter().map(|d| d.text.clone()).collect(),
            scores: ranked.iter().map(|s| s.score).collect(),
            answer,
        })
    }
}

fn build_responder(config: &AppConfig, corpus: &Corpus) -> AppResult<Box<dyn Responder>> {
    let kind = ResponderKind::parse(&config.responder).ok_or_else(|| {
        AppError::Config(format!("Unknown responder: {}", config.responder))
    })?;

    match kind {
        ResponderKind::Rules => {
            let table = match &config.rules_file {
                Some(path) => RuleTable::load(&config.resolve(path))?,
                None => RuleTable::default_table(),
            };
            Ok(Box::new(RuleResponder::new(table, corpus.dataset().clone())))
        }
        ResponderKind::Llm => {
            let mut settings = ClientSettings::new();
            if let Some(key) = &config.api_key {
                settings = settings.with_api_key(key.clone());
            }
            if let Some(base) = &config.api_base {
                settings = settings.with_endpoint(base.clone());
            }
            if let Some(secs) = config.timeout_secs {
                settings = settings.with_timeout(Duration::from_secs(secs));
            }

            let client = create_client(&config.provider, &settings)?;

            let mut responder = LlmResponder::new(client, config.model.clone())
                .with_max_tokens(config.max_tokens)
                .with_temperature(config.temperature);
            if let Some(path) = &config.prompt_file {
                responder = responder.with_prompt(loanqa_prompt::load_prompt_file(&config.resolve(path))?);
            }

            Ok(Box::new(responder))
        }
    }
}
