//! Live data sources for the pipeline
//!
//! A source either yields the parsed list body or a classified
//! [`FetchError`]. It never decides about fallback; that is the
//! pipeline's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use sentiment_types::errors::FetchError;
use sentiment_types::query::QueryParams;
use sentiment_types::wire::{ErrorBody, UpstreamPayload};
use serde_json::Value;
use tracing::debug;

/// Longest slice of a non-JSON failure body kept in the error message.
const MAX_ERROR_SNIPPET: usize = 200;

#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn fetch(&self, params: &QueryParams) -> Result<UpstreamPayload, FetchError>;

    fn name(&self) -> &'static str;
}

/// Reads the ranked list through the first-party proxy endpoint.
pub struct ProxySource {
    http: Client,
    endpoint: String,
}

impl ProxySource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// `{endpoint}?desc={0|1}&limit={n}`
    pub fn request_url(&self, params: &QueryParams) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| FetchError::Transport(format!("invalid proxy url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("desc", params.desc_flag())
            .append_pair("limit", &params.limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl SentimentSource for ProxySource {
    async fn fetch(&self, params: &QueryParams) -> Result<UpstreamPayload, FetchError> {
        let url = self.request_url(params)?;
        debug!(%url, "Requesting sentiment list");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(classify_failure(status, &bytes));
        }

        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(UpstreamPayload::from_value(body))
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

/// Any non-200 is a failure. The proxy's `{ error, code }` body refines
/// the category when present.
fn classify_failure(status: StatusCode, body: &[u8]) -> FetchError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error_body) => error_body.into_fetch_error(status.as_u16()),
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            FetchError::Status {
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_SNIPPET).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> ProxySource {
        ProxySource::new("http://localhost:8080/api/sentiment", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_request_url_encodes_flag_and_limit() {
        let url = source().request_url(&QueryParams::new(true, 20)).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/sentiment?desc=1&limit=20"
        );

        let url = source().request_url(&QueryParams::new(false, 0)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/sentiment?desc=0&limit=0");
    }

    #[test]
    fn test_invalid_endpoint_is_transport_error() {
        let source = ProxySource::new("::nope::", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            source.request_url(&QueryParams::default()),
            Err(FetchError::Transport(_))
        ));
    }

    #[test]
    fn test_classify_missing_credential() {
        let body = json!({ "error": "LUNARCRUSH_API_KEY is not configured", "code": "MISSING_CREDENTIAL" });
        let err = classify_failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            body.to_string().as_bytes(),
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_classify_plain_error_body() {
        let body = json!({ "error": "boom" });
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, body.to_string().as_bytes());
        assert_eq!(
            err,
            FetchError::Status {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_classify_non_json_body() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>".as_bytes());
        assert_eq!(
            err,
            FetchError::Status {
                status: 502,
                message: "<html>bad gateway</html>".to_string()
            }
        );
    }
}
