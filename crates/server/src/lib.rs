//! HTTP API for Loan QA.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/chat` | Answer `{"message": ...}`; returns `{"response", "query"}` |
//! | `GET`  | `/health` | Liveness check |
//!
//! Errors are returned as `{"error": "<message>"}`. A missing or malformed
//! `message` is a 400. A failed text-generation call is rendered according to
//! [`GenerationErrorPolicy`]; anything else is a 500 with the detail logged.
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use loanqa_core::{AppError, AppResult, GenerationErrorPolicy};
use loanqa_knowledge::RagSystem;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Prefix of the answer text when generation fails under the `answer` policy.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating response: ";

/// Shared state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The answering pipeline, built once at startup.
    pub rag: Arc<RagSystem>,

    /// How generation failures reach the caller.
    pub generation_errors: GenerationErrorPolicy,
}

impl AppState {
    pub fn new(rag: Arc<RagSystem>, generation_errors: GenerationErrorPolicy) -> Self {
        Self {
            rag,
            generation_errors,
        }
    }
}

/// Build the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(bind: &str, state: AppState) -> AppResult<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind).await.map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to bind {}: {}", bind, e),
        ))
    })?;

    tracing::info!("Loan QA server listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// An error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn message_required() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Message is required")
    }

    fn generation_failed() -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "Text generation failed")
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

// ============ POST /chat ============

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

/// JSON response body for `POST /chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub query: String,
}

async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = match payload {
        Ok(Json(ChatRequest {
            message: Some(message),
        })) => message,
        Ok(_) => {
            tracing::debug!("Rejected chat request without a message");
            return Err(ApiError::message_required());
        }
        Err(rejection) => {
            tracing::debug!("Rejected chat request: {}", rejection.body_text());
            return Err(ApiError::message_required());
        }
    };

    tracing::info!("Chat request ({} chars)", message.chars().count());

    match state.rag.ask(&message).await {
        Ok(result) => Ok(Json(ChatResponse {
            response: result.answer.text,
            query: result.query,
        })),
        Err(AppError::Generation(detail)) => match state.generation_errors {
            GenerationErrorPolicy::Answer => {
                tracing::warn!("Text generation failed: {}", detail);
                Ok(Json(ChatResponse {
                    response: format!("{}{}", GENERATION_ERROR_PREFIX, detail),
                    query: message,
                }))
            }
            GenerationErrorPolicy::Error => {
                tracing::error!("Text generation failed: {}", detail);
                Err(ApiError::generation_failed())
            }
        },
        Err(e) => {
            tracing::error!("Chat request failed: {}", e);
            Err(ApiError::internal())
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "RAG system is running",
    })
}
