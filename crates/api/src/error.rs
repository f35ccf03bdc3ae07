use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crosswordcoach_core::error::{CoreError, QueryError};
use crosswordcoach_db::error::StoreError;
use serde_json::json;

use crate::explainer::ExplainerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain, store, and explainer errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error": ..., "code": ... }`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `crosswordcoach_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An entry store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The explanation service failed.
    #[error(transparent)]
    Explainer(#[from] ExplainerError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The endpoint exists but has no backing implementation configured.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Core(CoreError::Query(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Query(err) => {
                    (StatusCode::BAD_REQUEST, "INVALID_QUERY", err.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Store errors surface to the caller as 400s ---
            AppError::Store(err) => {
                let message = if err.is_caller_facing() {
                    err.to_string()
                } else {
                    tracing::error!(error = %err, "Entry store error");
                    "Failed to query the entry store".to_string()
                };
                (StatusCode::BAD_REQUEST, "STORE_ERROR", message)
            }

            AppError::Explainer(err) => {
                tracing::error!(error = %err, "Explainer error");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXPLAINER_ERROR",
                    "The explanation service is unavailable".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotImplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
