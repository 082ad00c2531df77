//! Quote fetching configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Settings for the fetch-with-fallback path.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotesConfig {
    /// Maximum number of price levels kept per side.
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// How long a fetched result is reused for the same symbol.
    #[serde(default = "default_cache_ttl", with = "duration")]
    pub cache_ttl: Duration,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

fn default_depth() -> usize {
    5
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(5)
}
