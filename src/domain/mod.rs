//! Domain models for order-book observations.

mod book;
mod observation;

pub use book::{Book, BookPair, PriceLevel};
pub use observation::{Observation, Side};
