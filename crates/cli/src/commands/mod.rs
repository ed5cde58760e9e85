//! Command handlers for the Loan QA CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod analyze;
pub mod ask;
pub mod serve;

// Re-export command types for convenience
pub use analyze::AnalyzeCommand;
pub use ask::AskCommand;
pub use serve::ServeCommand;
