//! Dataset profiling: shape, inferred column types, missing values,
//! numeric summaries and distinct values of text columns.

use crate::loader::Dataset;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Inferred column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.pad("numeric"),
            Self::Text => f.pad("text"),
        }
    }
}

/// Summary of a numeric column over its non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,

    /// Rows where the value is absent or blank
    pub missing: usize,
    pub non_missing: usize,

    /// Present for numeric columns with at least one value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,

    /// Distinct values of a text column, in first-seen order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distinct: Vec<String>,
}

/// Profile of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Profile every column of the dataset.
///
/// A value is missing when the row lacks the field or it is blank. A column
/// is numeric when it has values and all of them parse as numbers.
pub fn profile_dataset(dataset: &Dataset) -> DatasetProfile {
    let columns = dataset
        .headers
        .iter()
        .map(|name| profile_column(dataset, name))
        .collect();

    DatasetProfile {
        rows: dataset.rows.len(),
        columns,
    }
}

fn profile_column(dataset: &Dataset, name: &str) -> ColumnProfile {
    let values: Vec<&str> = dataset
        .rows
        .iter()
        .filter_map(|row| row.get(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect();

    let missing = dataset.rows.len() - values.len();
    let numbers: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();

    match numbers {
        Some(numbers) if !numbers.is_empty() => ColumnProfile {
            name: name.to_string(),
            kind: ColumnKind::Numeric,
            missing,
            non_missing: values.len(),
            numeric: Some(summarize(&numbers)),
            distinct: Vec::new(),
        },
        _ => {
            let mut seen = HashSet::new();
            let distinct = values
                .iter()
                .filter(|v| seen.insert(**v))
                .map(|v| v.to_string())
                .collect();

            ColumnProfile {
                name: name.to_string(),
                kind: ColumnKind::Text,
                missing,
                non_missing: values.len(),
                numeric: None,
                distinct,
            }
        }
    }
}

fn summarize(numbers: &[f64]) -> NumericSummary {
    let sum: f64 = numbers.iter().sum();
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    NumericSummary {
        count: numbers.len(),
        mean: sum / numbers.len() as f64,
        min,
        max,
    }
}

impl fmt::Display for DatasetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shape: {} rows x {} columns", self.rows, self.columns.len())?;

        writeln!(f, "\nColumns:")?;
        for col in &self.columns {
            writeln!(
                f,
                "  {:<20} {:<8} {} non-missing, {} missing",
                col.name, col.kind, col.non_missing, col.missing
            )?;
        }

        writeln!(f, "\nNumeric columns:")?;
        for col in &self.columns {
            if let Some(stats) = &col.numeric {
                writeln!(
                    f,
                    "  {:<20} count={} mean={:.2} min={} max={}",
                    col.name, stats.count, stats.mean, stats.min, stats.max
                )?;
            }
        }

        writeln!(f, "\nDistinct values of text columns:")?;
        for col in self.columns.iter().filter(|c| c.kind == ColumnKind::Text) {
            writeln!(f, "  {}: [{}]", col.name, col.distinct.join(", "))?;
        }

        Ok(())
    }
}
