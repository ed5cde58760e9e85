//! Analyze command handler.

use clap::Args;
use loanqa_core::{config::AppConfig, AppResult};
use loanqa_knowledge::{load_dataset, profile_dataset};
use std::path::PathBuf;

/// Profile the training dataset
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Dataset to profile (default: the configured training data)
    pub path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeCommand {
    /// Execute the analyze command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let path = match &self.path {
            Some(path) => config.resolve(path),
            None => config.training_data(),
        };

        tracing::info!("Profiling dataset {:?}", path);

        let dataset = load_dataset(&path)?;
        let profile = profile_dataset(&dataset);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        } else {
            println!("--- Data analysis for {} ---", path.display());
            print!("{}", profile);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_configured_dataset() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("TrainingDataset.csv"),
            "Loan_ID,LoanAmount\nLP001002,100\n",
        )
        .unwrap();

        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..AppConfig::default()
        };
        let cmd = AnalyzeCommand {
            path: None,
            json: true,
        };

        assert!(cmd.execute(&config).is_ok());
    }

    #[test]
    fn test_analyze_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            ..AppConfig::default()
        };
        let cmd = AnalyzeCommand {
            path: Some(PathBuf::from("absent.csv")),
            json: false,
        };

        assert!(cmd.execute(&config).is_err());
    }
}
