//! Prompt system for Loan QA.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions (system message + user template)
//! - Handlebars template rendering
//! - A built-in default prompt for answering loan questions from context

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{default_rag_prompt, load_prompt_file};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
