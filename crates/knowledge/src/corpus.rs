//! The fixed document corpus.
//!
//! Document 0 is the documentation text; documents 1..=N are synthesized
//! from the dataset rows in file order. The corpus is built once and never
//! mutated.

use crate::loader::{self, Dataset, DatasetRow};
use crate::types::{Document, DocumentSource};
use loanqa_core::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;

/// Primary-key column of the dataset.
pub const LOAN_ID_FIELD: &str = "Loan_ID";

/// Immutable list of retrievable documents plus the dataset they came from.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
    dataset: Arc<Dataset>,
}

impl Corpus {
    /// Build the corpus from already-loaded inputs.
    ///
    /// Fails with `AppError::Parse` if the dataset has no `Loan_ID` column.
    pub fn build(documentation: String, dataset: Dataset) -> AppResult<Self> {
        if !dataset.has_column(LOAN_ID_FIELD) {
            return Err(AppError::Parse(format!(
                "dataset has no {} column (found: {})",
                LOAN_ID_FIELD,
                dataset.headers.join(", ")
            )));
        }

        let mut documents = Vec::with_capacity(dataset.rows.len() + 1);
        documents.push(Document {
            text: documentation,
            source: DocumentSource::Documentation,
        });

        for (row_idx, row) in dataset.rows.iter().enumerate() {
            documents.push(Document {
                text: render_record(row),
                source: DocumentSource::Record {
                    row: row_idx,
                    loan_id: row.get(LOAN_ID_FIELD).unwrap_or_default().to_string(),
                },
            });
        }

        tracing::info!(
            "Built corpus: {} documents (1 documentation + {} records)",
            documents.len(),
            dataset.rows.len()
        );

        Ok(Self {
            documents,
            dataset: Arc::new(dataset),
        })
    }

    /// Load both input files and build the corpus.
    pub fn load(documentation_path: &Path, dataset_path: &Path) -> AppResult<Self> {
        let documentation = loader::load_documentation(documentation_path)?;
        let dataset = loader::load_dataset(dataset_path)?;
        Self::build(documentation, dataset)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The dataset the record documents were synthesized from.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Document texts in corpus order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.text.as_str())
    }
}

/// Render one dataset row as a document.
///
/// `Loan Application ID: <id>` comes first, followed by every other field as
/// `<field>: <value>`, one per line, in header order.
pub fn render_record(row: &DatasetRow) -> String {
    let mut text = format!(
        "Loan Application ID: {}\n",
        row.get(LOAN_ID_FIELD).unwrap_or_default()
    );

    for (field, value) in row.iter().filter(|(field, _)| *field != LOAN_ID_FIELD) {
        text.push_str(field);
        text.push_str(": ");
        text.push_str(value);
        text.push('\n');
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_dataset;

    fn dataset() -> Dataset {
        parse_dataset(
            "Gender,Loan_ID,Loan_Status\nMale,LP001002,Y\nFemale,LP001003,N\n".as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_documentation_is_document_zero() {
        let corpus = Corpus::build("Loan data documentation".to_string(), dataset()).unwrap();

        assert_eq!(corpus.len(), 1 + corpus.dataset().len());
        assert_eq!(corpus.documents()[0].text, "Loan data documentation");
        assert_eq!(corpus.documents()[0].source, DocumentSource::Documentation);
    }

    #[test]
    fn test_records_follow_row_order() {
        let corpus = Corpus::build(String::new(), dataset()).unwrap();

        assert_eq!(
            corpus.get(2).unwrap().source,
            DocumentSource::Record {
                row: 1,
                loan_id: "LP001003".to_string()
            }
        );
    }

    #[test]
    fn test_render_record_puts_id_first() {
        let corpus = Corpus::build(String::new(), dataset()).unwrap();

        assert_eq!(
            corpus.get(1).unwrap().text,
            "Loan Application ID: LP001002\nGender: Male\nLoan_Status: Y\n"
        );
    }

    #[test]
    fn test_render_record_short_row_without_id() {
        let row = DatasetRow::from_pairs([("Gender", "Male")]);
        assert_eq!(render_record(&row), "Loan Application ID: \nGender: Male\n");
    }

    #[test]
    fn test_missing_loan_id_column() {
        let data = parse_dataset("Gender,Loan_Status\nMale,Y\n".as_bytes()).unwrap();
        let err = Corpus::build(String::new(), data).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn test_empty_dataset_yields_documentation_only() {
        let data = parse_dataset("Loan_ID,Gender\n".as_bytes()).unwrap();
        let corpus = Corpus::build("docs".to_string(), data).unwrap();
        assert_eq!(corpus.len(), 1);
    }
}
