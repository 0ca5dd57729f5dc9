//! Error types for prom2grafana.
//!
//! Client-facing messages are fixed per variant. Details from the provider
//! stay in the server logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::generator::GenerateError;

/// Result type alias for prom2grafana operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for prom2grafana.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body too large (max 1MB)")]
    PayloadTooLarge,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Metrics cannot be empty")]
    EmptyMetrics,

    #[error("Request timed out")]
    Timeout,

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("Not found")]
    NotFound,
}

/// JSON error body: `{"error": "<message>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    /// HTTP status and the message shown to the caller.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured"),
            Error::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            Error::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large (max 1MB)",
            ),
            Error::InvalidBody => (StatusCode::BAD_REQUEST, "Invalid request body"),
            Error::EmptyMetrics => (StatusCode::BAD_REQUEST, "Metrics cannot be empty"),
            Error::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "Request timeout - please try again",
            ),
            Error::Generation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate dashboard",
            ),
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        tracing::debug!(code = status.as_u16(), error_message = message, "Sending error response");

        let body = ErrorResponse {
            error: message.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
