//! # V1 API Response Envelope & Error Contract
//!
//! Every v1 endpoint returns an [`ApiResponse<T>`] envelope with three optional
//! top-level fields:
//!
//! ```json
//! {
//!   "data": { ... },                                  // present on success
//!   "meta": { "total": 42 },                          // optional list metadata
//!   "error": { "code": "not_found", "message": "..." } // present on error
//! }
//! ```
//!
//! ## ID Formats
//!
//! - **itemId**, **highlightId**: nanoid, 21 characters
//! - **ownerEmail**: lowercased email address; path values are lowercased
//!   before lookup

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::FinhubError;

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed or failed validation. HTTP 400.
    InvalidRequest,
    /// The requested resource does not exist. HTTP 404.
    NotFound,
    /// An unexpected server-side error occurred. Internal details are never
    /// leaked to the client. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::NotFound => write!(f, "not_found"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error payload within the API envelope.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Human-readable description safe to display to end users.
    pub message: String,
}

/// List metadata. Field names serialize as camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub total: u64,
}

/// Canonical v1 API response envelope.
///
/// The HTTP status is derived from the error code on error, and is 200 on
/// success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// HTTP status to use in the response. Not serialized on the wire.
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    /// Error response. HTTP status is derived from the [`ErrorCode`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(_) => {
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<FinhubError> for ApiResponse<T> {
    /// Convert a [`FinhubError`] into a v1 [`ApiResponse`].
    ///
    /// Internal error details are **never** leaked to the client; they are
    /// logged via `tracing::error!` instead.
    fn from(err: FinhubError) -> Self {
        match err {
            FinhubError::NotFound(ref msg) => ApiResponse::error(ErrorCode::NotFound, msg.clone()),

            FinhubError::Validation(ref msg) => {
                ApiResponse::error(ErrorCode::InvalidRequest, msg.clone())
            }

            FinhubError::Json(ref e) => {
                ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid JSON: {e}"))
            }

            ref internal @ (FinhubError::Database(_)
            | FinhubError::Http(_)
            | FinhubError::Io(_)
            | FinhubError::Internal(_)
            | FinhubError::Llm(_)
            | FinhubError::LlmUnavailable(_)
            | FinhubError::LlmRateLimit { .. }
            | FinhubError::ApiAuth(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_serializes_without_error() {
        let resp = ApiResponse::success("hello");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["data"], "hello");
        assert!(json.get("error").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn error_response_serializes_without_data() {
        let resp = ApiResponse::<()>::error(ErrorCode::NotFound, "gone");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "gone");
    }

    #[test]
    fn meta_carries_total() {
        let resp = ApiResponse::success_with_meta(
            vec![1, 2, 3],
            ResponseMeta { total: 3 },
        );
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["meta"]["total"], 3);
    }

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_error_maps_to_invalid_request() {
        let resp: ApiResponse<()> = FinhubError::Validation("Owner email is required".into()).into();
        let err = resp.error.as_ref().expect("error");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_does_not_leak() {
        let resp: ApiResponse<()> = FinhubError::Internal("secret debug info".into()).into();
        let err = resp.error.as_ref().expect("error");
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "An internal error occurred");
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn llm_failures_are_internal() {
        let resp: ApiResponse<()> = FinhubError::LlmRateLimit {
            retry_after: Some(30),
        }
        .into();
        assert_eq!(
            resp.error.as_ref().expect("error").code,
            ErrorCode::InternalError
        );
    }
}
