//! Error types for the observer API.
//!
//! [`ObserverError`] converts into an HTTP response with a JSON body of
//! the form `{"error": "...", "status": 400}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sandbox_core::command::CommandError;

/// Errors that can occur in the observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The request body is not a well-formed command.
    #[error("invalid command: {0}")]
    InvalidCommand(#[from] serde_json::Error),

    /// The world refused the command.
    #[error(transparent)]
    Rejected(#[from] CommandError),

    /// Operator controls are not attached to this server.
    #[error("operator state not available")]
    OperatorUnavailable,
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCommand(_) | Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::OperatorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
