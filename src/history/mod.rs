//! Append-only observation history.

mod csv_log;

pub use csv_log::CsvHistory;

/// Timestamp format for history rows (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// HistoryError represents errors that can occur while logging or exporting.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Formats a capture time the way history rows store it.
pub fn format_timestamp(at: chrono::DateTime<chrono::Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
