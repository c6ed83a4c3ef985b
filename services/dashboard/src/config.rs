use std::env;
use std::time::Duration;

use sentiment_types::query::{QueryParams, DEFAULT_LIMIT};

use crate::view::ViewMode;

/// Dashboard configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Full URL of the proxy's sentiment endpoint.
    pub proxy_url: String,
    pub timeout_ms: u64,
    pub limit: i64,
    pub sort_descending: bool,
    pub view_mode: ViewMode,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|s| parse_bool(&s))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let view_mode = env::var("DASHBOARD_VIEW")
            .ok()
            .and_then(|v| match v.parse::<ViewMode>() {
                Ok(mode) => Some(mode),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring DASHBOARD_VIEW");
                    None
                }
            })
            .unwrap_or(defaults.view_mode);

        Self {
            proxy_url: env_str("DASHBOARD_PROXY_URL", &defaults.proxy_url),
            timeout_ms: env_u64("DASHBOARD_TIMEOUT_MS", defaults.timeout_ms),
            limit: env_i64("DASHBOARD_LIMIT", defaults.limit),
            sort_descending: env_bool("DASHBOARD_DESC", defaults.sort_descending),
            view_mode,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_params(&self) -> QueryParams {
        QueryParams::new(self.sort_descending, self.limit)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            proxy_url: "http://127.0.0.1:8080/api/sentiment".to_string(),
            timeout_ms: 15_000,
            limit: DEFAULT_LIMIT,
            sort_descending: true,
            view_mode: ViewMode::Cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.initial_params(), QueryParams::new(true, 30));
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.view_mode, ViewMode::Cards);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(" YES "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }
}
