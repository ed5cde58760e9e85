//! Pipeline tests: files on disk through `RagSystem::ask`.

use crate::rag::RagSystem;
use crate::types::{AnswerKind, DocumentSource};
use loanqa_core::{AppConfig, AppError};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENTATION: &str = "# Loan data documentation\n\n\
Credit_History: 1 means the credit history meets guidelines.\n\
LoanAmount: loan amount in thousands.\n";

const TRAINING_DATA: &str = "Loan_ID,Gender,Married,Self_Employed,LoanAmount,Loan_Status\n\
LP001002,Male,No,No,,Y\n\
LP001003,Male,Yes,No,128,N\n\
LP001005,Male,Yes,Yes,66,Y\n\
LP001006,Male,Yes,No,120,Y\n\
LP001008,Male,No,No,141,Y\n";

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("loan_data_documentation.md"), DOCUMENTATION).unwrap();
    fs::write(temp.path().join("TrainingDataset.csv"), TRAINING_DATA).unwrap();
    temp
}

fn config(workspace: &Path) -> AppConfig {
    AppConfig {
        workspace: workspace.to_path_buf(),
        ..AppConfig::default()
    }
}

#[test]
fn test_corpus_shape() {
    let temp = workspace();
    let rag = RagSystem::from_config(&config(temp.path())).unwrap();

    let corpus = rag.corpus();
    assert_eq!(corpus.len(), 6);
    assert_eq!(corpus.get(0).unwrap().text, DOCUMENTATION);
    assert_eq!(corpus.get(0).unwrap().source, DocumentSource::Documentation);
    assert!(corpus
        .get(5)
        .unwrap()
        .text
        .starts_with("Loan Application ID: LP001008\n"));
}

#[tokio::test]
async fn test_rules_pipeline_answers_sample_questions() {
    let temp = workspace();
    let rag = RagSystem::from_config(&config(temp.path())).unwrap();

    let status = rag.ask("What is the loan status for LP001003?").await.unwrap();
    assert_eq!(
        status.answer.text,
        "The loan status for LP001003 is Not Approved (N)."
    );

    let self_employed = rag
        .ask("How many applicants are self-employed?")
        .await
        .unwrap();
    assert_eq!(
        self_employed.answer.text,
        "Based on the training dataset, there are 1 self-employed applicants out of 5 total applications."
    );

    let average = rag.ask("What is the average loan amount?").await.unwrap();
    assert_eq!(
        average.answer.text,
        "The average loan amount in the dataset is approximately 113.75 thousand units (based on 4 valid entries)."
    );
}

#[tokio::test]
async fn test_ask_reports_ranked_documents() {
    let temp = workspace();
    let rag = RagSystem::from_config(&config(temp.path())).unwrap();

    let result = rag.ask("Loan_Status of LP001006").await.unwrap();

    assert_eq!(result.query, "Loan_Status of LP001006");
    assert_eq!(result.retrieved_documents.len(), 3);
    assert_eq!(result.scores.len(), 3);
    assert!(result.retrieved_documents[0].contains("LP001006"));
    for pair in result.scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    assert_eq!(result.answer.kind, AnswerKind::Fallback);
}

#[tokio::test]
async fn test_tfidf_pipeline() {
    let temp = workspace();
    let mut cfg = config(temp.path());
    cfg.retriever = "tfidf".to_string();
    cfg.top_k = 2;

    let rag = RagSystem::from_config(&cfg).unwrap();
    assert_eq!(rag.retriever_name(), "tfidf");

    let result = rag.ask("Which applicant is LP001005?").await.unwrap();
    assert_eq!(result.retrieved_documents.len(), 2);
    assert!(result.retrieved_documents[0].starts_with("Loan Application ID: LP001005"));
    assert!(result.scores.iter().all(|s| (0.0..=1.0).contains(s)));
}

#[tokio::test]
async fn test_custom_rules_file() {
    let temp = workspace();
    fs::write(
        temp.path().join("rules.yaml"),
        "rules:\n  - matchAll: [interest]\n    response:\n      text: Interest rates are not recorded.\n",
    )
    .unwrap();

    let mut cfg = config(temp.path());
    cfg.rules_file = Some("rules.yaml".into());
    let rag = RagSystem::from_config(&cfg).unwrap();

    let result = rag.ask("What interest applies?").await.unwrap();
    assert_eq!(result.answer.text, "Interest rates are not recorded.");

    // The built-in rules are replaced, not extended
    let result = rag.ask("What is the loan status for LP001003?").await.unwrap();
    assert_eq!(result.answer.kind, AnswerKind::Fallback);
}

#[test]
fn test_missing_training_data_is_io_error() {
    let temp = workspace();
    let mut cfg = config(temp.path());
    cfg.training_data_path = "nope.csv".into();

    match RagSystem::from_config(&cfg) {
        Err(AppError::Io(e)) => assert!(e.to_string().contains("nope.csv")),
        Err(other) => panic!("Expected Io error, got {:?}", other),
        Ok(_) => panic!("Expected Io error"),
    }
}

#[test]
fn test_llm_responder_requires_api_key() {
    let temp = workspace();
    let mut cfg = config(temp.path());
    cfg.responder = "llm".to_string();

    assert!(matches!(
        RagSystem::from_config(&cfg),
        Err(AppError::Config(_))
    ));
}

#[tokio::test]
async fn test_llm_pipeline_against_completion_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4.1-mini",
            "choices": [{
                "message": {"role": "assistant", "content": "LP001003 was not approved."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 8}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = workspace();
    let mut cfg = config(temp.path());
    cfg.responder = "llm".to_string();
    cfg.api_key = Some("test-key".to_string());
    cfg.api_base = Some(server.uri());

    let rag = RagSystem::from_config(&cfg).unwrap();
    let result = rag.ask("What is the loan status for LP001003?").await.unwrap();

    assert_eq!(result.answer.text, "LP001003 was not approved.");
    assert_eq!(result.answer.kind, AnswerKind::Generated);
}

#[tokio::test]
async fn test_llm_failure_is_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let temp = workspace();
    let mut cfg = config(temp.path());
    cfg.responder = "llm".to_string();
    cfg.api_key = Some("test-key".to_string());
    cfg.api_base = Some(server.uri());

    let rag = RagSystem::from_config(&cfg).unwrap();
    let err = rag.ask("anything").await.unwrap_err();

    assert!(err.is_generation());
    assert!(err.to_string().contains("upstream down"));
}
