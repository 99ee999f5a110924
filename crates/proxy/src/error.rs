//! Unified error handling with Sentry integration.
//!
//! Every failure in the catalog flow ends the request the same way: status
//! 500 with a JSON body `{"error": "<message>"}`. The message is the error's
//! `Display` output, so callers see e.g. `Printify API error: 404`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::printify::PrintifyError;

/// Application-level error type for the catalog proxy.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required configuration (credentials) is missing.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Printify API operation failed.
    #[error(transparent)]
    Printify(#[from] PrintifyError),

    /// Serializing the projected response failed.
    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        let body = ErrorBody {
            error: self.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
