use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinhubError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    #[error("API authentication error: {0}")]
    ApiAuth(String),
}

impl IntoResponse for FinhubError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FinhubError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            FinhubError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            FinhubError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            FinhubError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            FinhubError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            FinhubError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            FinhubError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            FinhubError::Llm(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            FinhubError::LlmUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            FinhubError::LlmRateLimit { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            FinhubError::ApiAuth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, FinhubError>;
