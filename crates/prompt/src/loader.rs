//! Prompt loader: YAML prompt files and the built-in default prompt.

use crate::types::PromptDefinition;
use loanqa_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the built-in answering prompt.
pub const DEFAULT_PROMPT_ID: &str = "loan.answer.default";

const DEFAULT_SYSTEM: &str = "You are a helpful assistant that answers questions about loan applications based on provided context.";

const DEFAULT_TEMPLATE: &str = "You are a helpful assistant that answers questions about loan applications based on the provided context.
Use only the information from the context to answer the question. If the information is not available in the context, say so.

Context:
{{context}}

Question: {{query}}

Answer:";

/// The built-in prompt used when no prompt file is configured.
pub fn default_rag_prompt() -> PromptDefinition {
    PromptDefinition {
        id: DEFAULT_PROMPT_ID.to_string(),
        title: "Answer loan questions from retrieved context".to_string(),
        api_version: "1.0".to_string(),
        system: Some(DEFAULT_SYSTEM.to_string()),
        template: DEFAULT_TEMPLATE.to_string(),
    }
}

/// Load a prompt definition from a YAML file.
///
/// # Example
/// ```no_run
/// use loanqa_prompt::load_prompt_file;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt_file(Path::new(".loanqa/prompts/answer.yml"))?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_file(path: &Path) -> AppResult<PromptDefinition> {
    tracing::debug!("Loading prompt from: {:?}", path);

    let contents = std::fs::read_to_string(path)
        .map_err(|e| AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e)))?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e)))?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt("Prompt template cannot be empty".to_string()));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if !def.template.contains("{{query}}") {
        tracing::warn!("Prompt '{}' does not reference {{{{query}}}}", def.id);
    }

    Ok(())
}
