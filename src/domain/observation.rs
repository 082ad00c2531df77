//! Observation rows written to the history log.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Book, BookPair};

/// Side of the book a level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// Observation is one price level captured at one point in time.
///
/// Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Capture time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: Side,
    pub price: Decimal,
    pub quantity: u64,
}

impl Observation {
    /// Expands a book pair into rows, bids first then asks.
    pub fn from_book(symbol: &str, pair: &BookPair, timestamp: &str) -> Vec<Observation> {
        let rows = |side: Side, book: &Book| {
            book.levels()
                .iter()
                .map(|level| Observation {
                    timestamp: timestamp.to_string(),
                    symbol: symbol.to_string(),
                    side,
                    price: level.price,
                    quantity: level.quantity,
                })
                .collect::<Vec<_>>()
        };

        let mut out = rows(Side::Bid, &pair.bids);
        out.extend(rows(Side::Ask, &pair.asks));
        out
    }
}
