//! Runtime statistics for the refresh driver.

/// Counters accumulated across refresh passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub passes: u64,
    pub fetches: u64,
    pub empty_results: u64,
    pub rows_written: u64,
    pub write_failures: u64,
}
