use crate::config::ProxyConfig;
use crate::upstream::UpstreamClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self, anyhow::Error> {
        let upstream = UpstreamClient::new(
            config.upstream_url.clone(),
            config.upstream_sort.clone(),
            config.upstream_timeout(),
        )?;

        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        })
    }
}
