//! Client for the upstream ranked coin-list API.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use sentiment_types::query::QueryParams;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;

pub struct UpstreamClient {
    http: Client,
    url: String,
    sort: String,
}

impl UpstreamClient {
    pub fn new(url: String, sort: String, timeout: Duration) -> Result<Self, anyhow::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url, sort })
    }

    /// `{url}?sort={sort}&limit={n}` plus `desc=1` only when descending.
    pub fn list_url(&self, params: &QueryParams) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| AppError::UpstreamUnavailable(format!("invalid upstream url: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("sort", &self.sort);
            pairs.append_pair("limit", &params.limit.to_string());
            if params.sort_descending {
                pairs.append_pair("desc", "1");
            }
        }
        Ok(url)
    }

    /// Fetch the ranked list and return the body untouched.
    pub async fn fetch_list(&self, api_key: &str, params: &QueryParams) -> Result<Value, AppError> {
        let url = self.list_url(params)?;
        debug!(%url, "Calling upstream list API");

        let res = self
            .http
            .get(url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("request failed: {}", e)))?;

        let status = res.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Upstream rate limit hit");
            return Err(AppError::UpstreamRateLimited);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned non-success status");
            return Err(AppError::UpstreamStatus(status.as_u16()));
        }

        res.json::<Value>()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("invalid upstream body: {}", e)))
    }
}
