use std::env;
use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

/// Environment variable holding the upstream bearer credential.
pub const API_KEY_VAR: &str = "LUNARCRUSH_API_KEY";

pub const DEFAULT_UPSTREAM_URL: &str = "https://lunarcrush.com/api4/public/coins/list/v2";
pub const DEFAULT_UPSTREAM_SORT: &str = "sentiment";

/// Proxy configuration derived from environment variables.
#[derive(Clone)]
pub struct ProxyConfig {
    pub bind: String,
    pub port: u16,
    /// Upstream bearer credential. `None` is reported per request, not at
    /// startup, so the endpoint stays up and explains itself.
    pub api_key: Option<String>,
    pub upstream_url: String,
    /// Metric the upstream ranks by.
    pub upstream_sort: String,
    pub upstream_timeout_ms: u64,
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env_str("SENTIMENT_PROXY_BIND", &defaults.bind),
            port: env_u16("SENTIMENT_PROXY_PORT", defaults.port),
            api_key: env_opt(API_KEY_VAR),
            upstream_url: env_str("LUNARCRUSH_COINS_URL", &defaults.upstream_url),
            upstream_sort: env_str("LUNARCRUSH_SORT", &defaults.upstream_sort),
            upstream_timeout_ms: env_u64(
                "SENTIMENT_UPSTREAM_TIMEOUT_MS",
                defaults.upstream_timeout_ms,
            ),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_sort: DEFAULT_UPSTREAM_SORT.to_string(),
            upstream_timeout_ms: 10_000,
        }
    }
}

// Hand-written so the credential never reaches a log line.
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_url", &self.upstream_url)
            .field("upstream_sort", &self.upstream_sort)
            .field("upstream_timeout_ms", &self.upstream_timeout_ms)
            .finish()
    }
}
