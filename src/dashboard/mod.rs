//! Refresh driver for the dashboard.
//!
//! Runs one fetch → log → present pass over every configured symbol, in
//! order, then waits for the refresh interval or a manual trigger.

mod error;
mod stats;
pub mod tui;
mod ui;

pub use error::DashboardError;
pub use stats::Stats;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::config::{Config, parse_symbols};
use crate::history::{CsvHistory, format_timestamp};
use crate::presenter::SymbolView;
use crate::quotes::{QuoteFetcher, QuoteSource};

/// Shown when the ticker list is empty.
pub const EMPTY_SYMBOLS_PROMPT: &str = "Enter at least one ticker.";

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message shown to the user in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

/// Dashboard owns every component and the state the UI draws.
pub struct Dashboard<S> {
    fetcher: QuoteFetcher<S>,
    history: CsvHistory,
    export_path: PathBuf,
    interval: Duration,
    symbols: Vec<String>,
    views: Vec<SymbolView>,
    status: Option<Status>,
    stats: Stats,
    last_pass: Option<DateTime<Local>>,
    next_due: Instant,
}

impl<S: QuoteSource> Dashboard<S> {
    /// Creates a dashboard whose first pass is due immediately.
    pub fn new(
        fetcher: QuoteFetcher<S>,
        history: CsvHistory,
        export_path: impl Into<PathBuf>,
        interval: Duration,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            history,
            export_path: export_path.into(),
            interval,
            symbols,
            views: Vec::new(),
            status: None,
            stats: Stats::default(),
            last_pass: None,
            next_due: Instant::now(),
        }
    }

    /// Wires a dashboard from configuration around the given quote source.
    pub fn from_config(config: &Config, source: S) -> Result<Self, DashboardError> {
        let history = CsvHistory::open(&config.history.path)?;
        let fetcher = QuoteFetcher::new(source, config.quotes.depth, config.quotes.cache_ttl);

        info!(
            symbols = ?config.symbols,
            interval = ?config.refresh.interval,
            depth = fetcher.depth(),
            history = %history.path().display(),
            "dashboard initialized"
        );

        Ok(Self::new(
            fetcher,
            history,
            &config.history.export_path,
            config.refresh.interval,
            config.symbols.clone(),
        ))
    }

    /// Runs one full pass. Failures never abort the pass; they end up in
    /// the status line and the stats.
    pub async fn run_pass(&mut self) {
        if self.symbols.is_empty() {
            self.views.clear();
            self.set_status(StatusLevel::Warning, EMPTY_SYMBOLS_PROMPT);
            self.schedule_next();
            return;
        }

        let captured_at = Local::now();
        let timestamp = format_timestamp(captured_at);
        let symbols = self.symbols.clone();
        let mut views = Vec::with_capacity(symbols.len());
        let mut problems = Vec::new();

        for symbol in &symbols {
            let outcome = self.fetcher.fetch(symbol).await;
            self.stats.fetches += 1;

            if outcome.pair.is_empty() {
                self.stats.empty_results += 1;
                if let Some(warning) = &outcome.warning {
                    problems.push(warning.clone());
                }
            } else {
                match self.history.append(symbol, &outcome.pair, &timestamp) {
                    Ok(rows) => self.stats.rows_written += rows as u64,
                    Err(e) => {
                        error!(symbol = %symbol, error = %e, "failed to write history");
                        self.stats.write_failures += 1;
                        problems.push(format!("failed to log {}: {}", symbol, e));
                    }
                }
            }

            views.push(SymbolView::build(symbol, &outcome));
        }

        self.views = views;
        self.stats.passes += 1;
        self.last_pass = Some(captured_at);

        if problems.is_empty() {
            self.set_status(
                StatusLevel::Info,
                format!(
                    "Updated {} symbol(s) at {}",
                    symbols.len(),
                    captured_at.format("%H:%M:%S")
                ),
            );
        } else {
            warn!(problems = problems.len(), "pass completed with problems");
            self.set_status(StatusLevel::Warning, problems.join("; "));
        }

        self.schedule_next();
    }

    /// Replaces the ticker list from comma-separated input and makes a
    /// fresh pass due. State for removed symbols is discarded.
    pub fn set_symbols(&mut self, input: &str) -> &[String] {
        let symbols = parse_symbols(input);

        self.fetcher.retain_symbols(&symbols);
        self.views.retain(|v| symbols.contains(&v.symbol));

        if symbols.is_empty() {
            self.set_status(StatusLevel::Warning, EMPTY_SYMBOLS_PROMPT);
        }

        info!(symbols = ?symbols, "ticker list changed");
        self.symbols = symbols;
        self.request_refresh();
        &self.symbols
    }

    /// Manual trigger: the next pass is due now.
    pub fn request_refresh(&mut self) {
        self.next_due = Instant::now();
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    fn schedule_next(&mut self) {
        self.next_due = Instant::now() + self.interval;
    }

    /// Copies the full log to the configured export path.
    pub fn export_history(&mut self) -> Result<u64, DashboardError> {
        match self.history.export(&self.export_path) {
            Ok(bytes) => {
                let message = format!(
                    "Saved full history ({} bytes) to {}",
                    bytes,
                    self.export_path.display()
                );
                self.set_status(StatusLevel::Info, message);
                Ok(bytes)
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.set_status(StatusLevel::Error, format!("Export failed: {}", e));
                Err(e.into())
            }
        }
    }

    pub fn set_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status = Some(Status {
            level,
            message: message.into(),
        });
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn views(&self) -> &[SymbolView] {
        &self.views
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn last_pass(&self) -> Option<DateTime<Local>> {
        self.last_pass
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn history(&self) -> &CsvHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests;
