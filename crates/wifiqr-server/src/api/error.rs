//! API error types and response handling.
//!
//! This module provides a unified error type for all API handlers
//! with automatic conversion to appropriate HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wifiqr_core::{QrError, ValidationErrors};

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
///
/// Each variant maps to a specific HTTP status code and produces a
/// consistent JSON error response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from client.
    #[error("Bad Request: {message}")]
    BadRequest {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Per-field failures, if any.
        details: Option<serde_json::Value>,
    },

    /// 404 Not Found - Resource does not exist.
    #[error("Not Found: {message}")]
    NotFound {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 413 Payload Too Large - Content does not fit in a QR code.
    #[error("Payload Too Large: {message}")]
    PayloadTooLarge {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
    },

    /// 499 Client Closed Request - The request was abandoned.
    #[error("Cancelled")]
    Cancelled,

    /// 500 Internal Server Error - Unexpected server-side error.
    #[error("Internal Error: {message}")]
    InternalError {
        /// Machine-readable error code.
        error_code: String,
        /// Human-readable error message.
        message: String,
        /// Optional details.
        details: Option<String>,
    },
}

/// Standard JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "validation_failed",
    "message": "ssid: SSID is required",
    "details": [{ "field": "ssid", "message": "SSID is required" }]
}))]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "record_not_found").
    #[schema(example = "record_not_found")]
    pub error: String,

    /// Human-readable error message.
    #[schema(example = "Wi-Fi network not found")]
    pub message: String,

    /// Optional additional details for debugging.
    #[schema(nullable)]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// 404 for a missing Wi-Fi record.
    #[must_use]
    pub fn record_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            error_code: "record_not_found".to_string(),
            message: format!("Wi-Fi network not found: {id}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Self::BadRequest {
                error_code,
                message,
                details,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: error_code,
                    message,
                    details,
                },
            ),

            Self::NotFound { error_code, message } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::PayloadTooLarge { error_code, message } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse {
                    error: error_code,
                    message,
                    details: None,
                },
            ),

            Self::Cancelled => (
                StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ErrorResponse {
                    error: "cancelled".to_string(),
                    message: "Request was cancelled".to_string(),
                    details: None,
                },
            ),

            Self::InternalError {
                error_code,
                message,
                details,
            } => {
                tracing::error!(
                    error_code = %error_code,
                    message = %message,
                    details = ?details,
                    "Internal server error"
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: error_code,
                        message,
                        details: details.map(|d| serde_json::json!(d)),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Convert from wifiqr_core errors.
impl From<QrError> for ApiError {
    fn from(err: QrError) -> Self {
        let error_code = err.error_code().to_ascii_lowercase();
        match err {
            QrError::Validation(message) => Self::BadRequest {
                error_code,
                message,
                details: None,
            },
            err @ QrError::EncodingOverflow { .. } => Self::PayloadTooLarge {
                error_code,
                message: err.to_string(),
            },
            QrError::Cancelled => Self::Cancelled,
            err => Self::InternalError {
                error_code,
                message: err.to_string(),
                details: None,
            },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::BadRequest {
            error_code: "validation_failed".to_string(),
            message: err.to_string(),
            details: serde_json::to_value(&err.0).ok(),
        }
    }
}
