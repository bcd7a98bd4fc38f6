/// Data acquisition and normalization.
///
/// Submodules:
/// - `noaa`      — NOAA STAR VH service: URL construction + file download.
/// - `normalize` — stored CSV files → cleaned `RecordSet`.
/// - `fixtures` (test only) — representative response payloads.

pub mod noaa;
pub mod normalize;

#[cfg(test)]
pub mod fixtures;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can arise when fetching or reading NOAA series files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Non-2xx HTTP response from the NOAA service.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The body did not contain a weekly series.
    #[error("Parse error: {0}")]
    Parse(String),
    /// No file in the data directory yielded any records.
    #[error("no VHI files could be read from {}", .0.display())]
    NoFilesRead(PathBuf),
}
