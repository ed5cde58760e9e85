//! Input loading: the documentation file and the tabular dataset.

use loanqa_core::{AppError, AppResult};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// One dataset record: field name to value, in header order.
///
/// A row shorter than the header lacks its trailing fields entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetRow {
    fields: Vec<(String, String)>,
}

impl DatasetRow {
    /// Build a row from `(field, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of a field, if the row has it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Fields in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A loaded tabular dataset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dataset {
    /// Field names from the header line
    pub headers: Vec<String>,

    /// Records in file order
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// Read the documentation file whole.
pub fn load_documentation(path: &Path) -> AppResult<String> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io_at(path, e))?;
    tracing::debug!("Loaded documentation {:?} ({} bytes)", path, text.len());
    Ok(text)
}

/// Load a comma-delimited dataset whose first line is the header.
///
/// Rows shorter than the header are kept without their missing trailing
/// fields; rows longer than the header are rejected. Values are kept verbatim.
pub fn load_dataset(path: &Path) -> AppResult<Dataset> {
    let file = File::open(path).map_err(|e| AppError::io_at(path, e))?;
    let dataset = parse_dataset(file).map_err(|e| match e {
        AppError::Parse(msg) => AppError::Parse(format!("{}: {}", path.display(), msg)),
        AppError::Io(inner) => AppError::io_at(path, inner),
        other => other,
    })?;

    tracing::info!(
        "Loaded dataset {:?}: {} rows, {} columns",
        path,
        dataset.rows.len(),
        dataset.headers.len()
    );

    Ok(dataset)
}

/// Parse a dataset from any reader.
pub fn parse_dataset<R: Read>(reader: R) -> AppResult<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(csv_error)?;

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(AppError::Parse(format!(
                "line {} has {} fields but the header has {}",
                line,
                record.len(),
                headers.len()
            )));
        }

        if record.len() < headers.len() {
            tracing::debug!(
                "Short row at line {}: {} of {} fields",
                record.position().map(|p| p.line()).unwrap_or_default(),
                record.len(),
                headers.len()
            );
        }

        rows.push(DatasetRow::from_pairs(
            headers.iter().cloned().zip(record.iter().map(str::to_string)),
        ));
    }

    Ok(Dataset { headers, rows })
}

fn csv_error(err: csv::Error) -> AppError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => AppError::Io(io),
            other => AppError::Parse(format!("{:?}", other)),
        }
    } else {
        AppError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "Loan_ID,Gender,Self_Employed,LoanAmount,Loan_Status\n\
LP001002,Male,No,,Y\n\
LP001003,Male,No,128,N\n\
LP001005,Male,Yes,66,Y\n";

    #[test]
    fn test_parse_dataset_preserves_order() {
        let dataset = parse_dataset(SAMPLE.as_bytes()).unwrap();

        assert_eq!(
            dataset.headers,
            vec!["Loan_ID", "Gender", "Self_Employed", "LoanAmount", "Loan_Status"]
        );
        assert_eq!(dataset.len(), 3);

        let row = &dataset.rows[1];
        assert_eq!(row.get("Loan_ID"), Some("LP001003"));
        assert_eq!(row.get("LoanAmount"), Some("128"));
        let fields: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(fields, dataset.headers);
    }

    #[test]
    fn test_empty_values_kept_verbatim() {
        let dataset = parse_dataset(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.rows[0].get("LoanAmount"), Some(""));
    }

    #[test]
    fn test_short_row_lacks_trailing_fields() {
        let data = "Loan_ID,Gender,Married\nLP1,Male\n";
        let dataset = parse_dataset(data.as_bytes()).unwrap();

        let row = &dataset.rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Gender"), Some("Male"));
        assert_eq!(row.get("Married"), None);
    }

    #[test]
    fn test_long_row_is_parse_error() {
        let data = "Loan_ID,Gender\nLP1,Male,extra\n";
        let err = parse_dataset(data.as_bytes()).unwrap_err();

        match err {
            AppError::Parse(msg) => assert!(msg.contains("line 2"), "unexpected: {}", msg),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_fields() {
        let data = "Loan_ID,Property_Area\nLP1,\"Semi, Urban\"\n";
        let dataset = parse_dataset(data.as_bytes()).unwrap();
        assert_eq!(dataset.rows[0].get("Property_Area"), Some("Semi, Urban"));
    }

    #[test]
    fn test_load_dataset_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.csv");

        match load_dataset(&path) {
            Err(AppError::Io(inner)) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
                assert!(inner.to_string().contains("missing.csv"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_documentation_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("docs.md");
        fs::write(&path, "# Loan data\n\nCredit_History: 1 = good\n").unwrap();

        let text = load_documentation(&path).unwrap();
        assert_eq!(text, "# Loan data\n\nCredit_History: 1 = good\n");
    }

    #[test]
    fn test_load_documentation_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load_documentation(&temp.path().join("none.md"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
