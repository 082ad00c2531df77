//! CSV implementation of the observation log.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::HistoryError;
use crate::domain::{BookPair, Observation};

/// Column names, in write order.
pub const HEADER: [&str; 5] = ["timestamp", "symbol", "type", "price", "quantity"];

/// CsvHistory appends observations to a single CSV file.
///
/// The file is only ever opened in append mode; earlier rows are never
/// rewritten.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    /// Opens the log, creating it with a header if absent or empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let history = Self {
            path: path.as_ref().to_path_buf(),
        };
        if history.ensure_header()? {
            info!(path = %history.path.display(), "created history log");
        }
        Ok(history)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header if the file is missing or empty. Returns true if
    /// it was written.
    fn ensure_header(&self) -> Result<bool, HistoryError> {
        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if !needs_header {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(true)
    }

    /// Appends one row per level, bids before asks. Returns rows written;
    /// an empty pair writes nothing.
    pub fn append(
        &self,
        symbol: &str,
        pair: &BookPair,
        timestamp: &str,
    ) -> Result<usize, HistoryError> {
        let rows = Observation::from_book(symbol, pair, timestamp);
        if rows.is_empty() {
            return Ok(0);
        }

        self.ensure_header()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        debug!(symbol = %symbol, rows = rows.len(), "appended observations");
        Ok(rows.len())
    }

    /// Reads every observation back, oldest first.
    pub fn read_all(&self) -> Result<Vec<Observation>, HistoryError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));

        let headers = reader.headers()?.clone();
        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(HistoryError::InvalidData(format!(
                "unexpected header: {}",
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        reader
            .deserialize()
            .map(|row| row.map_err(HistoryError::from))
            .collect()
    }

    /// Copies the full log to `dest`; returns bytes copied. A log that
    /// does not read back as observations is not exported.
    pub fn export(&self, dest: impl AsRef<Path>) -> Result<u64, HistoryError> {
        let dest = dest.as_ref();
        let rows = self.read_all()?.len();

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut src = File::open(&self.path)?;
        let mut out = File::create(dest)?;
        let bytes = std::io::copy(&mut src, &mut out)?;
        out.flush()?;

        info!(
            from = %self.path.display(),
            to = %dest.display(),
            rows,
            bytes,
            "exported history"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
