//! Error types for the fetch pipeline
//!
//! Every variant routes the pipeline to the sample dataset. The variants
//! only exist so operators can tell a missing API key from a flaky network.

use serde::Serialize;
use thiserror::Error;

/// Why a live fetch did not produce a usable response.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("Missing upstream credential: {0}")]
    MissingCredential(String),

    #[error("Upstream rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Proxy returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// Configuration problems are fixed by an operator, not by waiting.
    pub fn is_configuration(&self) -> bool {
        matches!(self, FetchError::MissingCredential(_))
    }

    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            FetchError::MissingCredential(_) => "missing_credential",
            FetchError::RateLimited(_) => "rate_limited",
            FetchError::Upstream(_) => "upstream",
            FetchError::Status { .. } => "status",
            FetchError::Transport(_) => "transport",
            FetchError::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let err = FetchError::MissingCredential("LUNARCRUSH_API_KEY is not configured".to_string());
        assert!(err.is_configuration());
        assert!(err.to_string().contains("LUNARCRUSH_API_KEY"));
        assert_eq!(err.label(), "missing_credential");
    }

    #[test]
    fn test_status_display() {
        let err = FetchError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "Proxy returned status 502: bad gateway");
    }

    #[test]
    fn test_serialized_shape() {
        let err = FetchError::Transport("connection refused".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "transport");
        assert_eq!(json["detail"], "connection refused");
    }
}
