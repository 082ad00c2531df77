//! Quote and order-book retrieval.
//!
//! [`Client`] talks to the market-data HTTP API, [`QuoteFetcher`] layers the
//! book-then-quote fallback and the per-symbol memoization on top of any
//! [`QuoteSource`].

mod cache;
mod client;
mod fetcher;

pub use cache::TtlCache;
pub use client::{Client, ClientConfig};
pub use fetcher::{BookSource, FetchOutcome, QuoteFetcher};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Longest response body kept in a status error.
const MAX_ERROR_BODY: usize = 200;

/// Quote retrieval errors.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Server answered with anything other than 200.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid credential header: {0}")]
    InvalidHeader(String),
}

impl QuoteError {
    pub(crate) fn status(status: u16, body: &[u8]) -> Self {
        let mut body = String::from_utf8_lossy(body).trim().to_string();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        QuoteError::Status { status, body }
    }
}

/// Result type for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Level-2 snapshot as returned by the book endpoint.
///
/// Prices and sizes arrive as parallel arrays per side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookSnapshot {
    #[serde(default)]
    pub bp: Vec<Decimal>,
    #[serde(default)]
    pub bs: Vec<Decimal>,
    #[serde(default)]
    pub ap: Vec<Decimal>,
    #[serde(default, rename = "as")]
    pub as_: Vec<Decimal>,
}

/// Best bid and ask from the quote endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopOfBook {
    pub bp: Decimal,
    pub bs: Decimal,
    pub ap: Decimal,
    #[serde(rename = "as")]
    pub as_: Decimal,
}

/// QuoteSource is the seam between the fallback logic and the transport.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Requests level-2 depth. `Ok(None)` means the call succeeded but the
    /// body carried no snapshot.
    async fn book(&self, symbol: &str) -> Result<Option<BookSnapshot>>;

    /// Requests the top-of-book quote.
    async fn quote(&self, symbol: &str) -> Result<TopOfBook>;
}
