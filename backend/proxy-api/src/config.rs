use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// Deployed sheet script URL. Requests are refused with a 500 while unset.
    pub gas_url: Option<String>,
    pub port: u16,
    pub gas_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            gas_url: env::var("GAS_URL")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8888".to_string())
                .parse()
                .unwrap_or(8888),
            gas_timeout: Duration::from_secs(
                env::var("GAS_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            ),
        })
    }
}
