use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Single error boundary for the checkout flow.
///
/// Every failure between caller resolution and session creation funnels into
/// one of these variants and leaves the service as `{error: true, message}`.
/// Malformed input is deliberately not given its own status code: the caller
/// sees the same generic failure shape either way.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(anyhow::Error),

    #[error("{0}")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: bool,
            message: String,
        }

        let message = self.to_string();
        tracing::error!(error = %message, "checkout request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}
