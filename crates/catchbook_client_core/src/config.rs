use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the day records live. `api_url` points at the relay (or straight at
/// the sheet script); without it every remote call fails with `NotConfigured`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("CATCHBOOK_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(
                env::var("CATCHBOOK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
