//! Error handling module for the OTA backend.
//!
//! Centralized error type with mapping to HTTP status codes and the plain
//! `{ "error": ..., "details": ... }` wire body used by the manifest and
//! admin endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Application error type.
///
/// "No update" outcomes (opted-out user, no matching release) are not errors
/// and never pass through here; they map to an empty 204 at the API layer.
#[derive(Debug)]
pub enum AppError {
    /// Missing or empty required request fields
    Validation(String),
    /// Authentication required or rejected
    Unauthorized(String),
    /// Signed URL rejected: bad signature, expired, or path traversal
    Forbidden(String),
    /// Resource not found
    NotFound(String),
    /// An active release exists but its bundle row is missing. A
    /// data-integrity problem worth alerting on, distinct from "no update".
    BundleMissing { release_id: String },
    /// Signed URL minting failed, with the provider's diagnostic attached
    Signing {
        message: String,
        details: Option<serde_json::Value>,
    },
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BundleMissing { .. } => StatusCode::NOT_FOUND,
            AppError::Signing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the wire error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::BundleMissing { .. } => "Bundle not found for release".to_string(),
            AppError::Signing { message, .. } => message.clone(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Diagnostic payload attached to the wire body, if any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Signing { details, .. } => details.clone(),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

/// Wire error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.message(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}
