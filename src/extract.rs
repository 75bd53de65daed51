//! Custom request extractors.
//!
//! Axum's stock `Json` extractor answers malformed bodies with its own 422
//! plain-text rejection. This API reports every bad request body the same
//! way field validation does: HTTP 400 with the standard
//! `{"error": {"code": "validation_error", ...}}` payload. `AppJson` wraps
//! the stock extractor and converts the rejection.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

/// JSON body extractor whose rejection is an `AppError::Validation`.
///
/// Use in place of `axum::Json` for request bodies. A body that is not
/// valid JSON, is missing a required field, or carries a field of the
/// wrong type (e.g. a malformed timestamp) fails with 400 before the
/// handler runs.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}
