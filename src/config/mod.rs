//! Configuration loading and validation for the dashboard.
//!
//! Uses serde_yaml to load YAML configuration files. Broker credentials
//! never live in the file; they are read from the environment (and a
//! `.env` file, if present) at startup.

mod app;
mod broker;
mod duration;
mod error;
mod history;
mod quotes;
mod refresh;

pub use app::AppConfig;
pub use broker::BrokerConfig;
pub use error::ConfigError;
pub use history::HistoryConfig;
pub use quotes::QuotesConfig;
pub use refresh::RefreshConfig;

use serde::Deserialize;
use std::{env, fs};

/// Root configuration structure for the dashboard.
///
/// Required sections: app. Everything else falls back to defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and logging.
    pub app: AppConfig,
    /// Quote provider endpoint and credentials.
    #[serde(default)]
    pub broker: BrokerConfig,
    /// Book depth and memoization window.
    #[serde(default)]
    pub quotes: QuotesConfig,
    /// Interval between refresh passes.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// CSV log location and export destination.
    #[serde(default)]
    pub history: HistoryConfig,
    /// Tickers shown on startup. May be empty; the dashboard then asks for input.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
}

fn default_symbols() -> Vec<String> {
    vec!["AAPL".to_string(), "MSFT".to_string(), "TSLA".to_string()]
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Loads `.env` first, then the YAML file, then credentials from
    /// `{BROKER}_API_KEY` and `{BROKER}_API_SECRET`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.load_credentials_from_env();
        config.normalize_symbols();
        config.validate()?;

        Ok(config)
    }

    /// Load credentials from environment variables.
    fn load_credentials_from_env(&mut self) {
        let prefix = self.broker.env_prefix();
        self.broker.api_key = env::var(format!("{}_API_KEY", prefix)).unwrap_or_default();
        self.broker.api_secret = env::var(format!("{}_API_SECRET", prefix)).unwrap_or_default();
    }

    fn normalize_symbols(&mut self) {
        self.symbols = parse_symbols(&self.symbols.join(","));
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.broker.api_key.is_empty() || self.broker.api_secret.is_empty() {
            return Err(ConfigError::MissingCredentials {
                broker: self.broker.name.clone(),
                prefix: self.broker.env_prefix(),
            });
        }

        if self.broker.base_url.is_empty() {
            return Err(ConfigError::Validation("broker.base_url is required".into()));
        }

        if self.quotes.depth == 0 {
            return Err(ConfigError::Validation(
                "quotes.depth must be at least 1".into(),
            ));
        }

        if self.refresh.interval.is_zero() {
            return Err(ConfigError::Validation(
                "refresh.interval must be positive".into(),
            ));
        }

        if self.history.path.is_empty() {
            return Err(ConfigError::Validation("history.path is required".into()));
        }

        Ok(())
    }
}

/// Parses a comma-separated ticker list.
///
/// Entries are trimmed and upper-cased; empty entries and repeats are dropped.
pub fn parse_symbols(input: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for raw in input.split(',') {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() || symbols.contains(&symbol) {
            continue;
        }
        symbols.push(symbol);
    }
    symbols
}
