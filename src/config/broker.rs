//! Market-data broker configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Default broker name, also the prefix of the credential env vars.
pub const DEFAULT_BROKER_NAME: &str = "alpaca";

/// Default market-data API root.
pub const DEFAULT_BASE_URL: &str = "https://data.alpaca.markets/v2";

/// Settings for the quote/order-book provider.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Broker name; `{NAME}_API_KEY` and `{NAME}_API_SECRET` hold the credentials.
    #[serde(default = "default_name")]
    pub name: String,
    /// API root that `/stocks/{symbol}/...` paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Outbound request timeout. Zero leaves the HTTP library default in place.
    #[serde(default, with = "duration")]
    pub request_timeout: Duration,
    /// API key ID (loaded from environment variable).
    #[serde(skip)]
    pub api_key: String,
    /// API secret (loaded from environment variable).
    #[serde(skip)]
    pub api_secret: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            base_url: default_base_url(),
            request_timeout: Duration::ZERO,
            api_key: String::new(),
            api_secret: String::new(),
        }
    }
}

impl BrokerConfig {
    /// Prefix used for credential environment variables.
    pub fn env_prefix(&self) -> String {
        self.name.to_uppercase()
    }
}

fn default_name() -> String {
    DEFAULT_BROKER_NAME.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
