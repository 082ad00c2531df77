//! Toolkit-independent view model for one symbol's book.
//!
//! The terminal UI and the plain-text renderer both draw from
//! [`SymbolView`], so formatting rules live in one place.

mod format;
mod text;

pub use format::{format_currency, format_price, format_quantity};
pub use text::render_text;

use crate::domain::Book;
use crate::quotes::{BookSource, FetchOutcome};

/// One table row: formatted price and quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRow {
    pub price: String,
    pub quantity: String,
}

/// One bar: price label on the x-axis, quantity as height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBar {
    pub label: String,
    pub quantity: u64,
}

/// Bar chart data, bids and asks as separate series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chart {
    pub bids: Vec<ChartBar>,
    pub asks: Vec<ChartBar>,
}

impl Chart {
    /// Largest quantity across both series.
    pub fn max_quantity(&self) -> u64 {
        self.bids
            .iter()
            .chain(&self.asks)
            .map(|b| b.quantity)
            .max()
            .unwrap_or(0)
    }
}

/// What a symbol's panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Data {
        bids: Vec<LevelRow>,
        asks: Vec<LevelRow>,
        spread: String,
        chart: Chart,
    },
    NoData {
        warning: Option<String>,
    },
}

/// SymbolView is everything needed to draw one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolView {
    pub symbol: String,
    pub source: BookSource,
    pub panel: Panel,
}

impl SymbolView {
    pub fn build(symbol: &str, outcome: &FetchOutcome) -> Self {
        let pair = &outcome.pair;
        let panel = if pair.is_empty() {
            Panel::NoData {
                warning: outcome.warning.clone(),
            }
        } else {
            Panel::Data {
                bids: rows(&pair.bids),
                asks: rows(&pair.asks),
                spread: format_currency(pair.spread()),
                chart: Chart {
                    bids: bars(&pair.bids),
                    asks: bars(&pair.asks),
                },
            }
        };

        Self {
            symbol: symbol.to_string(),
            source: outcome.source,
            panel,
        }
    }
}

fn rows(book: &Book) -> Vec<LevelRow> {
    book.levels()
        .iter()
        .map(|l| LevelRow {
            price: format_currency(l.price),
            quantity: format_quantity(l.quantity),
        })
        .collect()
}

fn bars(book: &Book) -> Vec<ChartBar> {
    book.levels()
        .iter()
        .map(|l| ChartBar {
            label: format_price(l.price),
            quantity: l.quantity,
        })
        .collect()
}

/// Short label for where the data came from.
pub fn source_label(source: BookSource) -> &'static str {
    match source {
        BookSource::Book => "level-2",
        BookSource::Quote => "quote",
        BookSource::Unavailable => "unavailable",
    }
}
