//! Dashboard error types.

use crate::history::HistoryError;
use crate::quotes::QuoteError;

/// Dashboard error type.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("quote client error: {0}")]
    Client(#[from] QuoteError),
    #[error("history error: {0}")]
    History(#[from] HistoryError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
