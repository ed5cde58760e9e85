//! Loan QA CLI
//!
//! Main entry point for the loanqa command-line tool.
//! Answers questions about loan applications from a documentation file and
//! a training dataset, either over HTTP or one question at a time.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AnalyzeCommand, AskCommand, ServeCommand};
use loanqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Loan QA - question answering over loan application data
#[derive(Parser, Debug)]
#[command(name = "loanqa")]
#[command(about = "Question answering over loan application data", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "LOANQA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "LOANQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Retrieval strategy (keyword, tfidf)
    #[arg(short, long, global = true)]
    retriever: Option<String>,

    /// Answer strategy (rules, llm)
    #[arg(long, global = true)]
    responder: Option<String>,

    /// Number of documents retrieved per question
    #[arg(short = 'k', long, global = true)]
    top_k: Option<usize>,

    /// Model identifier for the llm responder
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(ServeCommand),

    /// Answer a single question
    Ask(AskCommand),

    /// Profile the training dataset
    Analyze(AnalyzeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load configuration from the config file and environment
    let config = AppConfig::load_with(cli.workspace.clone(), cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.retriever,
        cli.responder,
        cli.top_k,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Loan QA CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Retriever: {}, responder: {}", config.retriever, config.responder);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Analyze(_) => "analyze",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Analyze(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
