//! Order book data structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// PriceLevel represents a single aggregated price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: u64,
}

impl PriceLevel {
    pub fn new(price: Decimal, quantity: u64) -> Self {
        Self { price, quantity }
    }
}

/// One side of the book, in provider order.
///
/// Bids are expected highest first, asks lowest first; the order is kept
/// exactly as the provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    levels: Vec<PriceLevel>,
}

impl Book {
    pub fn new(levels: Vec<PriceLevel>) -> Self {
        Self { levels }
    }

    /// Returns the first (best) level, if any.
    pub fn best(&self) -> Option<&PriceLevel> {
        self.levels.first()
    }

    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Keeps at most `depth` levels, dropping from the far end.
    pub fn truncated(mut self, depth: usize) -> Self {
        self.levels.truncate(depth);
        self
    }
}

impl FromIterator<PriceLevel> for Book {
    fn from_iter<I: IntoIterator<Item = PriceLevel>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// BookPair holds both sides of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPair {
    pub bids: Book,
    pub asks: Book,
}

impl BookPair {
    pub fn new(bids: Book, asks: Book) -> Self {
        Self { bids, asks }
    }

    /// True when neither side has a level.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Best ask minus best bid; zero when either side is empty.
    pub fn spread(&self) -> Decimal {
        match (self.asks.best(), self.bids.best()) {
            (Some(ask), Some(bid)) => ask.price - bid.price,
            _ => Decimal::ZERO,
        }
    }
}
