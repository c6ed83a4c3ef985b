use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sentiment_types::wire::{ErrorBody, ErrorCode};
use thiserror::Error;

/// Central error type for the proxy endpoint
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Upstream rate limit exceeded")]
    UpstreamRateLimited,

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MissingCredential(_) => ErrorCode::MissingCredential,
            AppError::InvalidQuery(_) => ErrorCode::InvalidQuery,
            AppError::UpstreamRateLimited => ErrorCode::UpstreamRateLimited,
            AppError::UpstreamStatus(_) => ErrorCode::UpstreamStatus,
            AppError::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Callers only distinguish 200 from everything else; the code in
        // the body carries the detail.
        let body = Json(ErrorBody::new(self.code(), self.to_string()));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
