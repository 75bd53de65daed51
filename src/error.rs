//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
/// Requests fail independently; no error here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Wraps any sqlx::Error via `#[from]`, so database calls in handlers
    /// can use `?` directly.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Bearer token is missing, unknown, or revoked.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid authentication token")]
    InvalidToken,

    /// No key assignment exists with the requested identifier.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Key assignment not found")]
    AssignmentNotFound,

    /// Request body failed field validation on create/update.
    ///
    /// Returns HTTP 400 Bad Request. The String describes which field was
    /// rejected and why.
    #[error("Validation failed")]
    Validation(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidToken` → 401 Unauthorized
/// - `AssignmentNotFound` → 404 Not Found
/// - `Validation` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "invalid_token", self.to_string())
            }
            AppError::AssignmentNotFound => (
                StatusCode::NOT_FOUND,
                "assignment_not_found",
                self.to_string(),
            ),
            AppError::Validation(ref msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
