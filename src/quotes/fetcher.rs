//! Fetch-with-fallback: level-2 book first, top-of-book quote second.

use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info, warn};

use super::{BookSnapshot, QuoteSource, TopOfBook, TtlCache};
use crate::domain::{Book, BookPair, PriceLevel};

/// Which path produced a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSource {
    /// Level-2 snapshot.
    Book,
    /// Top-of-book quote fallback.
    Quote,
    /// Both requests failed.
    Unavailable,
}

/// Result of one fetch for one symbol. Never an error: failures degrade to
/// an empty pair plus a warning for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub pair: BookPair,
    pub source: BookSource,
    pub warning: Option<String>,
}

impl FetchOutcome {
    fn unavailable(warning: String) -> Self {
        Self {
            pair: BookPair::default(),
            source: BookSource::Unavailable,
            warning: Some(warning),
        }
    }
}

/// QuoteFetcher resolves a symbol to a [`BookPair`], memoizing per symbol.
pub struct QuoteFetcher<S> {
    source: S,
    depth: usize,
    cache: TtlCache<FetchOutcome>,
}

impl<S: QuoteSource> QuoteFetcher<S> {
    pub fn new(source: S, depth: usize, cache_ttl: Duration) -> Self {
        Self {
            source,
            depth,
            cache: TtlCache::new(cache_ttl),
        }
    }

    /// Fetches `symbol`, reusing a result younger than the cache TTL.
    pub async fn fetch(&mut self, symbol: &str) -> FetchOutcome {
        self.fetch_at(symbol, Instant::now()).await
    }

    pub async fn fetch_at(&mut self, symbol: &str, now: Instant) -> FetchOutcome {
        if let Some(cached) = self.cache.get(symbol, now) {
            debug!(symbol = %symbol, "serving cached result");
            return cached;
        }

        let outcome = self.fetch_uncached(symbol).await;
        self.cache.insert(symbol, outcome.clone(), now);
        outcome
    }

    async fn fetch_uncached(&self, symbol: &str) -> FetchOutcome {
        match self.source.book(symbol).await {
            Ok(Some(snapshot)) => {
                let pair = pair_from_snapshot(&snapshot, self.depth);
                debug!(
                    symbol = %symbol,
                    bids = pair.bids.len(),
                    asks = pair.asks.len(),
                    "level-2 snapshot"
                );
                return FetchOutcome {
                    pair,
                    source: BookSource::Book,
                    warning: None,
                };
            }
            Ok(None) => debug!(symbol = %symbol, "no snapshot in book response, trying quote"),
            Err(e) => debug!(symbol = %symbol, error = %e, "book request failed, trying quote"),
        }

        match self.source.quote(symbol).await {
            Ok(quote) => {
                let pair = pair_from_quote(&quote);
                let warning = if pair.is_empty() {
                    warn!(symbol = %symbol, "quote has no usable levels");
                    Some(format!("quote for {} had no valid levels", symbol))
                } else {
                    info!(symbol = %symbol, "using top-of-book quote");
                    None
                };
                FetchOutcome {
                    pair,
                    source: BookSource::Quote,
                    warning,
                }
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "no data");
                FetchOutcome::unavailable(format!("no data for {}: {}", symbol, e))
            }
        }
    }

    /// Forgets memoized results for symbols no longer displayed.
    pub fn retain_symbols(&mut self, symbols: &[String]) {
        self.cache.retain_symbols(symbols);
        debug!(cached = self.cache.len(), "pruned quote cache");
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Builds a level, rejecting negative prices and sizes. Sizes are
/// truncated to whole units.
fn level(price: Decimal, size: Decimal) -> Option<PriceLevel> {
    if price < Decimal::ZERO || size < Decimal::ZERO {
        return None;
    }
    let quantity = size.trunc().to_u64()?;
    Some(PriceLevel::new(price, quantity))
}

/// Zips parallel price/size arrays into at most `depth` levels.
pub(crate) fn book_from_arrays(prices: &[Decimal], sizes: &[Decimal], depth: usize) -> Book {
    prices
        .iter()
        .zip(sizes)
        .filter_map(|(p, s)| level(*p, *s))
        .collect::<Book>()
        .truncated(depth)
}

pub(crate) fn pair_from_snapshot(snapshot: &BookSnapshot, depth: usize) -> BookPair {
    BookPair::new(
        book_from_arrays(&snapshot.bp, &snapshot.bs, depth),
        book_from_arrays(&snapshot.ap, &snapshot.as_, depth),
    )
}

pub(crate) fn pair_from_quote(quote: &TopOfBook) -> BookPair {
    BookPair::new(
        level(quote.bp, quote.bs).into_iter().collect(),
        level(quote.ap, quote.as_).into_iter().collect(),
    )
}
