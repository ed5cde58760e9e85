//! Ask command handler.
//!
//! Answers one question through the same pipeline the server uses.

use clap::Args;
use loanqa_core::{config::AppConfig, AppError, AppResult};
use loanqa_knowledge::{AskResult, RagSystem};

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Print the full result (retrieved documents, scores, answer) as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let rag = RagSystem::from_config(config)?;

        match rag.ask(&self.question).await {
            Ok(result) => {
                println!("{}", self.render(&result)?);
                Ok(())
            }
            Err(AppError::Generation(detail)) => {
                println!("Error generating response: {}", detail);
                Err(AppError::Generation(detail))
            }
            Err(e) => Err(e),
        }
    }

    fn render(&self, result: &AskResult) -> AppResult<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(result.answer.text.clone())
        }
    }
}
