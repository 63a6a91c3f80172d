//! Custom error types for the cashout stats service
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API callers.
///
/// Pricing failures are deliberately NOT here: the provider being down or a
/// symbol being unknown degrades USD figures to 0, it never fails a request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("missing required field: {0}")]
    Validation(String),

    #[error("malformed request body: {0}")]
    BadPayload(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) | ApiError::BadPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            // No detail leaks for store failures; callers get a generic 500.
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self {
            ApiError::Store(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": body }))).into_response()
    }
}

/// Document-store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Price-provider errors. Always absorbed by the rate fetcher and logged,
/// never propagated to a request handler.
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("provider returned HTTP {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed quote body: {0}")]
    Malformed(String),
}
