//! Client configuration: upstream base URLs and the request deadline.

use std::time::Duration;

pub const DEFAULT_HOSE_BASE_URL: &str = "https://api.hsx.vn";
pub const DEFAULT_HNX_BASE_URL: &str = "https://hnx.vn";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the two exchanges live and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub hose_base_url: String,
    pub hnx_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hose_base_url: DEFAULT_HOSE_BASE_URL.to_string(),
            hnx_base_url: DEFAULT_HNX_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads `VNQUOTES_HOSE_URL`, `VNQUOTES_HNX_URL` and
    /// `VNQUOTES_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout = lookup("VNQUOTES_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        Self {
            hose_base_url: lookup("VNQUOTES_HOSE_URL").unwrap_or(defaults.hose_base_url),
            hnx_base_url: lookup("VNQUOTES_HNX_URL").unwrap_or(defaults.hnx_base_url),
            timeout,
        }
    }

    /// Points both exchanges at the same base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            hose_base_url: base_url.to_string(),
            hnx_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
