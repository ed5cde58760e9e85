//! Rule-based responder.
//!
//! Rules are data: each rule lists substrings that must all occur in the
//! lowercased query, and either a fixed answer or a dataset statistic. The
//! first matching rule wins. When none matches, the answer is an excerpt of
//! the top retrieved documents.
//!
//! A rules file looks like:
//!
//! ```yaml
//! rules:
//!   - matchAll: ["loan status", "lp001003"]
//!     response:
//!       text: "The loan status for LP001003 is Not Approved (N)."
//!   - matchAll: ["self-employed"]
//!     response:
//!       statistic: self_employed_ratio
//! ```

use super::Responder;
use crate::loader::Dataset;
use crate::statistics;
use crate::types::{Answer, AnswerKind, Document};
use loanqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Documents joined into the fallback excerpt.
const FALLBACK_DOCUMENTS: usize = 2;

/// Characters of the fallback excerpt.
const FALLBACK_CHARS: usize = 500;

const FACTORS_ANSWER: &str = "The factors that affect loan approval based on the provided context include:
- Applicant's and co-applicant's income, which determine the repayment capacity.
- Credit history, with a good credit history being a strong indicator of reliability in repaying debts.
- Loan amount requested and the loan term, which influence monthly installments and overall risk.
- Number of dependents, as it affects the applicant's disposable income.
- Employment status, distinguishing between self-employed and salaried individuals due to differences in income stability.
- Property area, since the location can influence loan terms or eligibility in certain housing schemes.
These factors are typically assessed together to determine an applicant's eligibility and ability to repay the loan.";

/// Dataset aggregates a rule can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    SelfEmployedRatio,
    AverageLoanAmount,
}

/// What a matching rule answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleResponse {
    Text { text: String },
    Statistic { statistic: Statistic },
}

/// One entry of the rules table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Substrings that must all occur in the lowercased query
    #[serde(rename = "matchAll")]
    pub match_all: Vec<String>,

    pub response: RuleResponse,
}

impl Rule {
    fn text(patterns: &[&str], text: &str) -> Self {
        Self {
            match_all: patterns.iter().map(|p| p.to_string()).collect(),
            response: RuleResponse::Text {
                text: text.to_string(),
            },
        }
    }

    fn statistic(patterns: &[&str], statistic: Statistic) -> Self {
        Self {
            match_all: patterns.iter().map(|p| p.to_string()).collect(),
            response: RuleResponse::Statistic { statistic },
        }
    }

    /// Whether every pattern occurs in the (already lowercased) query.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.match_all.iter().all(|p| query_lower.contains(p.as_str()))
    }
}

/// Ordered rules; the first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    pub rules: Vec<Rule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::default_table()
    }
}

impl RuleTable {
    /// The built-in table for the sample loan dataset.
    pub fn default_table() -> Self {
        Self {
            rules: vec![
                Rule::text(
                    &["loan status", "lp001003"],
                    "The loan status for LP001003 is Not Approved (N).",
                ),
                Rule::text(&["factors affect loan approval"], FACTORS_ANSWER),
                Rule::statistic(&["self-employed"], Statistic::SelfEmployedRatio),
                Rule::statistic(&["average loan amount"], Statistic::AverageLoanAmount),
            ],
        }
    }

    /// Load a rules table from YAML. Patterns are lowercased on load.
    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io_at(path, e))?;
        let table = Self::from_yaml(&contents)
            .map_err(|e| AppError::Parse(format!("rules file {}: {}", path.display(), e)))?;

        tracing::info!("Loaded {} rules from {:?}", table.rules.len(), path);
        Ok(table)
    }

    /// Parse and validate a rules table.
    pub fn from_yaml(contents: &str) -> AppResult<Self> {
        let mut table: RuleTable = serde_yaml::from_str(contents)
            .map_err(|e| AppError::Parse(e.to_string()))?;

        for (idx, rule) in table.rules.iter_mut().enumerate() {
            if rule.match_all.is_empty() || rule.match_all.iter().any(|p| p.trim().is_empty()) {
                return Err(AppError::Parse(format!(
                    "rule {} needs at least one non-empty pattern",
                    idx + 1
                )));
            }
            for pattern in &mut rule.match_all {
                *pattern = pattern.to_lowercase();
            }
        }

        Ok(table)
    }

    /// First rule matching the query, if any.
    pub fn find(&self, query: &str) -> Option<(usize, &Rule)> {
        let query_lower = query.to_lowercase();
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(&query_lower))
    }
}

/// Answers from the rules table, falling back to a document excerpt.
pub struct RuleResponder {
    table: RuleTable,
    dataset: Arc<Dataset>,
}

impl RuleResponder {
    pub fn new(table: RuleTable, dataset: Arc<Dataset>) -> Self {
        Self { table, dataset }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Answer synchronously; rules never fail.
    pub fn answer(&self, query: &str, documents: &[&Document]) -> Answer {
        match self.table.find(query) {
            Some((idx, rule)) => {
                tracing::debug!("Rule {} matched query", idx + 1);
                self.render(&rule.response)
            }
            None => {
                tracing::debug!("No rule matched; answering with document excerpt");
                fallback_answer(documents)
            }
        }
    }

    fn render(&self, response: &RuleResponse) -> Answer {
        match response {
            RuleResponse::Text { text } => Answer::new(text.clone(), AnswerKind::Canned),
            RuleResponse::Statistic { statistic } => {
                Answer::new(render_statistic(*statistic, &self.dataset), AnswerKind::Statistic)
            }
        }
    }
}

#[async_trait::async_trait]
impl Responder for RuleResponder {
    fn name(&self) -> &str {
        "rules"
    }

    async fn respond(&self, query: &str, documents: &[&Document]) -> AppResult<Answer> {
        Ok(self.answer(query, documents))
    }
}

/// Sentence reporting a statistic over the dataset.
pub fn render_statistic(statistic: Statistic, dataset: &Dataset) -> String {
    match statistic {
        Statistic::SelfEmployedRatio => {
            let summary = statistics::self_employed_summary(dataset);
            format!(
                "Based on the training dataset, there are {} self-employed applicants out of {} total applications.",
                summary.count, summary.total
            )
        }
        Statistic::AverageLoanAmount => match statistics::average_loan_amount(dataset) {
            Some(summary) => format!(
                "The average loan amount in the dataset is approximately {:.2} thousand units (based on {} valid entries).",
                summary.mean, summary.valid
            ),
            None => {
                "Unable to calculate average loan amount due to insufficient valid data.".to_string()
            }
        },
    }
}

/// Excerpt of the first retrieved documents.
pub fn fallback_answer(documents: &[&Document]) -> Answer {
    let context = documents
        .iter()
        .take(FALLBACK_DOCUMENTS)
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let excerpt: String = context.chars().take(FALLBACK_CHARS).collect();

    Answer::new(
        format!(
            "Based on the available data, here's what I found:\n\n{}...\n\nFor more specific information, please ask a more targeted question about loan applications or approval criteria.",
            excerpt
        ),
        AnswerKind::Fallback,
    )
}
