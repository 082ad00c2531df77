//! Refresh loop configuration.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Refresh driver settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Wait between two full passes over the symbol list.
    #[serde(default = "default_interval", with = "duration")]
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}
