//! Serve command handler.

use clap::Args;
use loanqa_core::{config::AppConfig, AppResult};
use loanqa_knowledge::RagSystem;
use loanqa_server::AppState;
use std::sync::Arc;

/// Run the HTTP API
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on (default: 127.0.0.1:5000)
    #[arg(short, long, env = "LOANQA_BIND")]
    pub bind: Option<String>,
}

impl ServeCommand {
    /// Build the pipeline once and serve it until interrupted.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let bind = self.bind.as_deref().unwrap_or(&config.bind);

        let rag = Arc::new(RagSystem::from_config(config)?);
        let state = AppState::new(rag, config.generation_errors);

        loanqa_server::serve(bind, state).await
    }
}
