//! History log configuration.

use serde::Deserialize;

/// Observation log settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Path to the append-only CSV log.
    #[serde(default = "default_path")]
    pub path: String,
    /// Destination written by the download action.
    #[serde(default = "default_export_path")]
    pub export_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            export_path: default_export_path(),
        }
    }
}

fn default_path() -> String {
    "orderbook_history.csv".to_string()
}

fn default_export_path() -> String {
    "multi_ticker_orderbook.csv".to_string()
}
