//! HTTP API tests driving the router directly.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use loanqa_core::{AppError, AppResult, GenerationErrorPolicy};
use loanqa_knowledge::{
    parse_dataset, Answer, Corpus, Document, KeywordRetriever, RagSystem, Responder,
    RuleResponder, RuleTable,
};
use loanqa_server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const TRAINING_DATA: &str = "Loan_ID,Gender,Self_Employed,LoanAmount,Loan_Status\n\
LP001002,Male,No,,Y\n\
LP001003,Male,No,128,N\n\
LP001005,Male,Yes,66,Y\n";

/// Responder that always fails with the given error.
struct FailingResponder {
    generation: bool,
}

#[async_trait::async_trait]
impl Responder for FailingResponder {
    fn name(&self) -> &str {
        "failing"
    }

    async fn respond(&self, _query: &str, _documents: &[&Document]) -> AppResult<Answer> {
        if self.generation {
            Err(AppError::Generation(
                "LLM error: Completion API error (401 Unauthorized): invalid api key".to_string(),
            ))
        } else {
            Err(AppError::Knowledge("corpus unavailable".to_string()))
        }
    }
}

fn corpus() -> Arc<Corpus> {
    let dataset = parse_dataset(TRAINING_DATA.as_bytes()).unwrap();
    Arc::new(Corpus::build("Loan data documentation".to_string(), dataset).unwrap())
}

fn app_with(responder: Box<dyn Responder>, policy: GenerationErrorPolicy) -> Router {
    let corpus = corpus();
    let retriever = Box::new(KeywordRetriever::new(corpus.texts()));
    let rag = RagSystem::new(corpus, retriever, responder, 3);
    router(AppState::new(Arc::new(rag), policy))
}

fn rules_app() -> Router {
    let corpus = corpus();
    let responder = Box::new(RuleResponder::new(
        RuleTable::default_table(),
        corpus.dataset().clone(),
    ));
    app_with(responder, GenerationErrorPolicy::Answer)
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(rules_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "message": "RAG system is running"})
    );
}

#[tokio::test]
async fn test_chat_answers_with_query() {
    let (status, body) = send(
        rules_app(),
        chat_request(r#"{"message": "What is the loan status for LP001003?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "response": "The loan status for LP001003 is Not Approved (N).",
            "query": "What is the loan status for LP001003?"
        })
    );
}

#[tokio::test]
async fn test_chat_statistic() {
    let (status, body) = send(
        rules_app(),
        chat_request(r#"{"message": "How many are self-employed?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "Based on the training dataset, there are 1 self-employed applicants out of 3 total applications."
    );
}

#[tokio::test]
async fn test_chat_missing_message() {
    for payload in [r#"{}"#, r#"{"text": "hi"}"#, r#"{"message": null}"#] {
        let (status, body) = send(rules_app(), chat_request(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body, json!({"error": "Message is required"}));
    }
}

#[tokio::test]
async fn test_chat_non_string_message() {
    let (status, body) = send(rules_app(), chat_request(r#"{"message": 42}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));
}

#[tokio::test]
async fn test_chat_invalid_json() {
    let (status, body) = send(rules_app(), chat_request("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));
}

#[tokio::test]
async fn test_chat_empty_body() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(rules_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message is required"}));
}

#[tokio::test]
async fn test_generation_failure_as_answer() {
    let app = app_with(
        Box::new(FailingResponder { generation: true }),
        GenerationErrorPolicy::Answer,
    );
    let (status, body) = send(app, chat_request(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "hello");
    assert_eq!(
        body["response"],
        "Error generating response: LLM error: Completion API error (401 Unauthorized): invalid api key"
    );
}

#[tokio::test]
async fn test_generation_failure_as_error() {
    let app = app_with(
        Box::new(FailingResponder { generation: true }),
        GenerationErrorPolicy::Error,
    );
    let (status, body) = send(app, chat_request(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Text generation failed"}));
}

#[tokio::test]
async fn test_unexpected_failure_is_generic_500() {
    let app = app_with(
        Box::new(FailingResponder { generation: false }),
        GenerationErrorPolicy::Answer,
    );
    let (status, body) = send(app, chat_request(r#"{"message": "hello"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chat")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = rules_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
