/// NOAA STAR Vegetation Health time series client.
///
/// Handles URL construction and file download for the province-level
/// endpoint:
///   https://www.star.nesdis.noaa.gov/smcd/emb/vci/VH/get_TS_admin.php
///
/// Each region's full weekly series is stored as one file named
/// `NOAA_ID{provinceID}_{ddmmYYYYHHMMSS}.csv` in the data directory. A
/// region that already has a file is not fetched again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use threadpool::ThreadPool;
use tracing::{debug, info, warn};

use crate::config::{DownloadSettings, VhiConfig};
use crate::ingest::normalize::parse_series_csv;
use crate::ingest::IngestError;
use crate::regions::{self, REGION_CATALOG};

const FILE_PREFIX: &str = "NOAA_ID";
const FILE_EXTENSION: &str = ".csv";

// ---------------------------------------------------------------------------
// URL and file naming
// ---------------------------------------------------------------------------

/// Builds the series URL for one NOAA provinceID.
pub fn build_series_url(settings: &DownloadSettings, source_id: u32) -> String {
    format!(
        "{}?country={}&provinceID={}&year1={}&year2={}&type={}",
        settings.base_url,
        urlencoding::encode(&settings.country),
        source_id,
        settings.year_from,
        settings.year_to,
        urlencoding::encode(&settings.series_type)
    )
}

/// File name a series downloaded at `timestamp` is stored under.
pub fn series_file_name<Tz: TimeZone>(source_id: u32, timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}_{}{}",
        FILE_PREFIX,
        source_id,
        timestamp.format("%d%m%Y%H%M%S"),
        FILE_EXTENSION
    )
}

/// Extracts the NOAA provinceID from a stored file name.
///
/// The `NOAA_ID{id}_` marker may appear anywhere in a `.csv` name, so
/// renamed copies such as `old_NOAA_ID5_….csv` still resolve. Returns
/// `None` when no marker is followed by digits and an underscore.
pub fn parse_source_id(file_name: &str) -> Option<u32> {
    if !file_name.ends_with(FILE_EXTENSION) {
        return None;
    }
    file_name.match_indices(FILE_PREFIX).find_map(|(start, _)| {
        let rest = &file_name[start + FILE_PREFIX.len()..];
        let (digits, _) = rest.split_once('_')?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    })
}

/// Returns the first stored file for `source_id`, if any.
pub fn find_existing_file(dir: &Path, source_id: u32) -> io::Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_source_id)
                == Some(source_id)
        })
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Outcome counts for a full catalog download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DownloadSummary {
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

/// Builds the blocking HTTP client shared by all download workers.
pub fn build_client(settings: &DownloadSettings) -> Result<reqwest::blocking::Client, IngestError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetches one region's series and writes it into `dir`.
///
/// The body is only stored when it holds at least one weekly row, so a
/// failed region is fetched again on the next run. Returns the path of the
/// written file.
pub fn download_region(
    client: &reqwest::blocking::Client,
    settings: &DownloadSettings,
    source_id: u32,
    dir: &Path,
) -> Result<PathBuf, IngestError> {
    let url = build_series_url(settings, source_id);
    debug!(source_id, %url, "fetching series");

    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(IngestError::Http(response.status().as_u16()));
    }
    let body = response.text()?;
    // A title-only body would otherwise mark the region as downloaded.
    parse_series_csv(&body)?;

    let path = dir.join(series_file_name(source_id, &Local::now()));
    if let Err(source) = fs::write(&path, &body) {
        let _ = fs::remove_file(&path);
        return Err(IngestError::Io { path, source });
    }
    Ok(path)
}

/// Downloads every catalog region that has no stored file yet.
///
/// Requests run on a pool of `download.workers` threads. A failure for one
/// region is logged and counted; it never aborts the others.
pub fn download_all(config: &VhiConfig) -> Result<DownloadSummary, IngestError> {
    let dir = config.storage.data_dir.clone();
    fs::create_dir_all(&dir).map_err(|source| IngestError::Io {
        path: dir.clone(),
        source,
    })?;

    let client = build_client(&config.download)?;
    let pool = ThreadPool::new(config.download.workers.max(1));
    let (tx, rx) = mpsc::channel();
    let mut summary = DownloadSummary::default();

    for region in REGION_CATALOG {
        let existing = find_existing_file(&dir, region.source_id).map_err(|source| IngestError::Io {
            path: dir.clone(),
            source,
        })?;
        if let Some(path) = existing {
            info!(
                source_id = region.source_id,
                "data for {} already present at {}, skipping",
                region.name,
                path.display()
            );
            summary.skipped += 1;
            continue;
        }

        let tx = tx.clone();
        let client = client.clone();
        let settings = config.download.clone();
        let dir = dir.clone();
        let source_id = region.source_id;
        pool.execute(move || {
            let outcome = download_region(&client, &settings, source_id, &dir);
            // The receiver outlives the pool; a send error only means the
            // collector already gave up.
            let _ = tx.send((source_id, outcome));
        });
    }
    drop(tx);

    for (source_id, outcome) in rx {
        let name = regions::find_by_source_id(source_id)
            .map(|r| r.name)
            .unwrap_or(regions::UNKNOWN_REGION_NAME);
        match outcome {
            Ok(path) => {
                info!(source_id, "downloaded {} to {}", name, path.display());
                summary.downloaded += 1;
            }
            Err(e) => {
                warn!(source_id, "download failed for {}: {}", name, e);
                summary.failed += 1;
            }
        }
    }
    pool.join();

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
