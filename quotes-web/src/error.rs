//! Error types for quotes-web
//!
//! Every failure is returned to the caller as JSON:
//! `{"error": {"code": "...", "message": "...", ...}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quotes_common::ValidationError;
use serde_json::{json, Value};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Submission rejected (409 for near-duplicates, 422 otherwise)
    #[error(transparent)]
    Validation(ValidationError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<quotes_common::Error> for ApiError {
    fn from(err: quotes_common::Error) -> Self {
        use quotes_common::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Validation(v) => ApiError::Validation(v),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Unparseable, mistyped or incomplete JSON bodies are client errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body("NOT_FOUND", msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body("BAD_REQUEST", msg)),
            ApiError::Validation(err) => validation_response(err),
            ApiError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("INTERNAL_ERROR", msg),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn error_body(code: &str, message: String) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
        }
    })
}

fn validation_response(err: ValidationError) -> (StatusCode, Value) {
    let message = err.to_string();
    match err {
        ValidationError::ExactDuplicate { existing_id } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": {
                    "code": "EXACT_DUPLICATE",
                    "message": message,
                    "existing_id": existing_id,
                }
            }),
        ),
        ValidationError::SourceCapacityExceeded { count, capacity } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": {
                    "code": "SOURCE_CAPACITY_EXCEEDED",
                    "message": message,
                    "count": count,
                    "capacity": capacity,
                }
            }),
        ),
        ValidationError::WeightOutOfRange { weight, min, max } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": {
                    "code": "WEIGHT_OUT_OF_RANGE",
                    "message": message,
                    "weight": weight,
                    "min": min,
                    "max": max,
                }
            }),
        ),
        // Resubmitting with "confirmed": true resolves this one
        ValidationError::NearDuplicate {
            existing_id,
            score,
            matched_text,
        } => (
            StatusCode::CONFLICT,
            json!({
                "error": {
                    "code": "NEAR_DUPLICATE",
                    "message": message,
                    "existing_id": existing_id,
                    "score": score,
                    "matched_text": matched_text,
                    "requires_confirmation": true,
                }
            }),
        ),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
