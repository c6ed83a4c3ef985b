//! Proxy endpoint wire formats
//!
//! `GET /api/sentiment?desc={0|1}&limit={n}` answers with the upstream list
//! body `{ config, data: [...] }` on success and `{ error, code }` with
//! status 500 on any failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FetchError;
use crate::query::{QueryParams, DEFAULT_LIMIT};
use crate::record::RawRecord;

/// Query string accepted by the proxy endpoint. Both fields are optional.
///
/// Values stay raw strings so that a malformed `limit` reaches the handler
/// and is answered with the uniform error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyQuery {
    pub desc: Option<String>,
    pub limit: Option<String>,
}

impl ProxyQuery {
    /// Absent `desc` means ascending. Absent or empty `limit` means
    /// [`DEFAULT_LIMIT`]; any other value must parse as an integer.
    pub fn to_params(&self) -> Result<QueryParams, String> {
        let sort_descending = matches!(
            self.desc.as_deref().map(str::trim),
            Some("1") | Some("true")
        );
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| format!("limit {:?}: {}", raw, e))?,
        };
        Ok(QueryParams::new(sort_descending, limit))
    }
}

impl From<QueryParams> for ProxyQuery {
    fn from(params: QueryParams) -> Self {
        Self {
            desc: Some(params.desc_flag().to_string()),
            limit: Some(params.limit.to_string()),
        }
    }
}

/// Machine-readable failure code carried next to the human message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    MissingCredential,
    InvalidQuery,
    UpstreamRateLimited,
    UpstreamStatus,
    UpstreamUnavailable,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingCredential => "MISSING_CREDENTIAL",
            ErrorCode::InvalidQuery => "INVALID_QUERY",
            ErrorCode::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            ErrorCode::UpstreamStatus => "UPSTREAM_STATUS",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MISSING_CREDENTIAL" => Some(ErrorCode::MissingCredential),
            "INVALID_QUERY" => Some(ErrorCode::InvalidQuery),
            "UPSTREAM_RATE_LIMITED" => Some(ErrorCode::UpstreamRateLimited),
            "UPSTREAM_STATUS" => Some(ErrorCode::UpstreamStatus),
            "UPSTREAM_UNAVAILABLE" => Some(ErrorCode::UpstreamUnavailable),
            _ => None,
        }
    }
}

/// Uniform failure body returned by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.as_str().to_string()),
        }
    }

    /// Classify a failure body received with a non-200 `status`.
    pub fn into_fetch_error(self, status: u16) -> FetchError {
        match self.code.as_deref().and_then(ErrorCode::from_code) {
            Some(ErrorCode::MissingCredential) => FetchError::MissingCredential(self.error),
            Some(ErrorCode::UpstreamRateLimited) => FetchError::RateLimited(self.error),
            Some(ErrorCode::UpstreamStatus) | Some(ErrorCode::UpstreamUnavailable) => {
                FetchError::Upstream(self.error)
            }
            Some(ErrorCode::InvalidQuery) | None => FetchError::Status {
                status,
                message: self.error,
            },
        }
    }
}

/// A successful list response. `data` is `None` when the body carried no
/// usable list, which the pipeline reports without falling back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamPayload {
    pub config: Option<Value>,
    pub data: Option<Vec<RawRecord>>,
}

impl UpstreamPayload {
    pub fn from_value(body: Value) -> Self {
        let Value::Object(mut body) = body else {
            return Self::default();
        };
        let config = body.remove("config");
        let data = match body.remove("data") {
            Some(Value::Array(items)) => {
                Some(items.into_iter().map(RawRecord::from_value).collect())
            }
            _ => None,
        };
        Self { config, data }
    }

    pub fn from_records(records: Vec<RawRecord>) -> Self {
        Self {
            config: None,
            data: Some(records),
        }
    }
}
