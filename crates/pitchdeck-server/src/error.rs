//! HTTP error types for PR Pitch Deck.
//!
//! Only faults outside the user flow end up here. Login failures and
//! generation errors are part of the rendered page, not HTTP errors.
//! Responses are JSON: `{"error": <code>, "message": <text>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error returned from HTTP handlers and extractors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// `POST /navigate` named a view that does not exist.
    #[error("{0}")]
    UnknownView(String),
    /// A handler ran without the session middleware in front of it.
    #[error("no session attached to request")]
    SessionMissing,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::UnknownView(_) => StatusCode::BAD_REQUEST,
            Self::SessionMissing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::UnknownView(_) => "bad_request",
            Self::SessionMissing => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, axum::Json(body)).into_response()
    }
}
