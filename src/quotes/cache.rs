//! Fixed-TTL memoization keyed by symbol.

use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    fetched_at: Instant,
}

/// TtlCache maps a symbol to the last value fetched for it.
///
/// An entry is served while `now - fetched_at < ttl`. Time is passed in by
/// the caller so the driver and tests share one clock.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, Entry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns a fresh entry for `symbol`, evicting it if it has expired.
    pub fn get(&mut self, symbol: &str, now: Instant) -> Option<V> {
        let fresh = match self.entries.get(symbol) {
            Some(entry) => now.saturating_duration_since(entry.fetched_at) < self.ttl,
            None => return None,
        };

        if fresh {
            self.entries.get(symbol).map(|e| e.value.clone())
        } else {
            self.entries.remove(symbol);
            None
        }
    }

    pub fn insert(&mut self, symbol: &str, value: V, now: Instant) {
        self.entries.insert(
            symbol.to_string(),
            Entry {
                value,
                fetched_at: now,
            },
        );
    }

    /// Drops entries for symbols not in `symbols`.
    pub fn retain_symbols(&mut self, symbols: &[String]) {
        self.entries.retain(|k, _| symbols.iter().any(|s| s == k));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
