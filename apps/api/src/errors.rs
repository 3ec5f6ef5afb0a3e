use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed AI response: {0}")]
    MalformedAiResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Extract(e) => match e {
                ExtractError::UnsupportedFormat => {
                    (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", e.to_string())
                }
                ExtractError::Pdf(detail) | ExtractError::Docx(detail) => {
                    tracing::warn!("Document extraction failed: {detail}");
                    (StatusCode::BAD_REQUEST, "EXTRACTION_FAILED", e.to_string())
                }
                ExtractError::EmptyText => {
                    (StatusCode::BAD_REQUEST, "EMPTY_DOCUMENT", e.to_string())
                }
                ExtractError::Task(err) => {
                    tracing::error!("Extraction task error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                    )
                }
            },
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                if matches!(e, LlmError::MissingApiKey) {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        "API key not configured. Please set GEMINI_API_KEY".to_string(),
                    )
                } else if e.is_invalid_api_key() {
                    (
                        StatusCode::UNAUTHORIZED,
                        "INVALID_API_KEY",
                        "Invalid API key. Check your GEMINI_API_KEY".to_string(),
                    )
                } else if e.is_rate_limited() {
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        "RATE_LIMITED",
                        "API rate limit exceeded. Please wait a minute and try again.".to_string(),
                    )
                } else {
                    let message = match e {
                        LlmError::Api { message, .. } => message.clone(),
                        other => other.to_string(),
                    };
                    (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", message)
                }
            }
            AppError::MalformedAiResponse(raw) => {
                tracing::error!("JSON parse error. Raw response: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MALFORMED_AI_RESPONSE",
                    "Failed to parse AI response. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
