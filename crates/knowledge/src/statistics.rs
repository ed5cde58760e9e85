//! Aggregates over the training dataset used by the rule responder.

use crate::loader::Dataset;
use serde::Serialize;

pub const SELF_EMPLOYED_FIELD: &str = "Self_Employed";
pub const LOAN_AMOUNT_FIELD: &str = "LoanAmount";

/// Self-employed applicants versus all applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelfEmployedSummary {
    pub count: usize,
    pub total: usize,
}

/// Mean of the valid loan amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanAmountSummary {
    pub mean: f64,
    pub valid: usize,
}

/// Count rows whose `Self_Employed` is "yes" in any casing.
pub fn self_employed_summary(dataset: &Dataset) -> SelfEmployedSummary {
    let count = dataset
        .rows
        .iter()
        .filter(|row| {
            row.get(SELF_EMPLOYED_FIELD)
                .is_some_and(|v| v.to_lowercase() == "yes")
        })
        .count();

    SelfEmployedSummary {
        count,
        total: dataset.rows.len(),
    }
}

/// Parse a loan amount. Only finite, strictly positive values count.
pub fn parse_loan_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Mean `LoanAmount` over rows with a valid value, or `None` if there are none.
pub fn average_loan_amount(dataset: &Dataset) -> Option<LoanAmountSummary> {
    let (sum, valid) = dataset
        .rows
        .iter()
        .filter_map(|row| row.get(LOAN_AMOUNT_FIELD).and_then(parse_loan_amount))
        .fold((0.0f64, 0usize), |(sum, n), v| (sum + v, n + 1));

    if valid == 0 {
        return None;
    }

    Some(LoanAmountSummary {
        mean: sum / valid as f64,
        valid,
    })
}
