/// NOAA series file parser and record normalizer.
///
/// Turns the stored `NOAA_ID*.csv` files into one `RecordSet`:
///
/// 1. Strip the `<tt><pre>` / `<br>` markup the service wraps its text in.
/// 2. Skip the title and header lines; split each weekly row on commas.
/// 3. Coerce cells to numbers, mapping unreadable cells and the `-1`
///    sentinel to `None`.
/// 4. Attach the catalog region and keep only complete rows.
///
/// Malformed rows are dropped here so the analysis layer can assume clean
/// input.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::ingest::noaa::parse_source_id;
use crate::ingest::IngestError;
use crate::model::{resolve_sentinel, RawObservation, RecordSet, VhiRecord};
use crate::regions::{self, Region};

/// Valid ISO week numbers.
const WEEK_RANGE: std::ops::RangeInclusive<u32> = 1..=53;

// Column positions in a weekly row: year, week, SMN, SMT, VCI, TCI, VHI.
const COL_SMN: usize = 2;
const COL_SMT: usize = 3;
const COL_VCI: usize = 4;
const COL_TCI: usize = 5;
const COL_VHI: usize = 6;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Removes HTML tags, turning `<br>` into line breaks.
fn strip_markup(text: &str) -> String {
    let text = text.replace("<br>", "\n").replace("<BR>", "\n");
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Parses the body of a NOAA series response into raw weekly rows.
///
/// Lines whose first two fields are not a year and a week (the title and
/// header lines) are skipped. Index cells that are missing, non-numeric or
/// equal to the sentinel become `None`.
///
/// # Errors
/// `IngestError::Parse` if the text contains no weekly rows at all.
pub fn parse_series_csv(text: &str) -> Result<Vec<RawObservation>, IngestError> {
    let cleaned = strip_markup(text);
    let mut rows = Vec::new();

    for line in cleaned.lines() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let Some(year) = fields.first().and_then(|f| f.parse::<i32>().ok()) else {
            continue;
        };
        let Some(week) = fields.get(1).and_then(|f| f.parse::<u32>().ok()) else {
            continue;
        };

        let cell = |idx: usize| {
            fields
                .get(idx)
                .and_then(|f| f.parse::<f64>().ok())
                .and_then(resolve_sentinel)
        };

        rows.push(RawObservation {
            year,
            week,
            smn: cell(COL_SMN),
            smt: cell(COL_SMT),
            vci: cell(COL_VCI),
            tci: cell(COL_TCI),
            vhi: cell(COL_VHI),
        });
    }

    if rows.is_empty() {
        return Err(IngestError::Parse("no weekly rows found in series".to_string()));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Attaches `region` to each complete observation.
///
/// Rows with any missing column or a week outside 1..=53 are dropped.
pub fn normalize(observations: &[RawObservation], region: &Region) -> Vec<VhiRecord> {
    observations
        .iter()
        .filter(|o| WEEK_RANGE.contains(&o.week))
        .filter_map(|o| {
            // SMN/SMT are not carried forward but a gap there marks the row incomplete.
            o.smn?;
            o.smt?;
            Some(VhiRecord {
                region_id: region.region_id,
                region_name: region.name.to_string(),
                year: o.year,
                week: o.week,
                vci: o.vci?,
                tci: o.tci?,
                vhi: o.vhi?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Directory loading
// ---------------------------------------------------------------------------

/// Reads every stored series in `dir` into one record set.
///
/// Files are processed in file-name order. Files with an unrecognized name,
/// an id missing from the catalog, or unreadable content are skipped with a
/// warning.
///
/// # Errors
/// - `IngestError::Io` if the directory itself cannot be listed.
/// - `IngestError::NoFilesRead` if no file could be read.
pub fn load_record_set(dir: &Path) -> Result<RecordSet, IngestError> {
    let entries = fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".csv"))
        })
        .collect();
    paths.sort();

    let mut records = Vec::new();
    let mut files_read = 0;

    for path in &paths {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

        let Some(source_id) = parse_source_id(file_name) else {
            warn!("could not extract a NOAA id from {}, skipping", file_name);
            continue;
        };
        let Some(region) = regions::find_by_source_id(source_id) else {
            warn!(source_id, "no catalog region for {}, skipping", file_name);
            continue;
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        let observations = match parse_series_csv(&text) {
            Ok(observations) => observations,
            Err(e) => {
                warn!("failed to parse {}: {}", path.display(), e);
                continue;
            }
        };

        let cleaned = normalize(&observations, region);
        info!(
            region_id = region.region_id,
            "loaded {} ({}): {} of {} rows kept",
            file_name,
            region.name,
            cleaned.len(),
            observations.len()
        );
        records.extend(cleaned);
        files_read += 1;
    }

    if files_read == 0 {
        return Err(IngestError::NoFilesRead(dir.to_path_buf()));
    }
    Ok(RecordSet::new(records))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    fn odesa() -> &'static Region {
        regions::find_by_source_id(17).expect("Odesa should be in the catalog")
    }

    // --- Parsing -------------------------------------------------------------

    #[test]
    fn test_parse_skips_title_and_header_lines() {
        let rows = parse_series_csv(fixture_odesa_csv()).expect("fixture should parse");
        assert_eq!(rows.len(), 6, "six weekly rows in the Odesa fixture");
        assert_eq!(rows[0].year, 2001);
        assert_eq!(rows[0].week, 1);
        assert_eq!(rows[0].vhi, Some(41.95));
        assert_eq!(rows[0].smt, Some(265.36));
    }

    #[test]
    fn test_parse_resolves_sentinel_row_to_none() {
        let rows = parse_series_csv(fixture_odesa_csv()).expect("fixture should parse");
        let sentinel = rows
            .iter()
            .find(|r| r.year == 2002 && r.week == 3)
            .expect("week 3 row should still be parsed");
        assert_eq!(sentinel.vhi, None);
        assert_eq!(sentinel.vci, None);
        assert_eq!(sentinel.smn, None);
    }

    #[test]
    fn test_parse_handles_br_separated_layout() {
        let rows = parse_series_csv(fixture_vinnytsia_br_csv()).expect("fixture should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].week, 31);
        assert_eq!(rows[1].vhi, Some(9.20));
    }

    #[test]
    fn test_parse_empty_series_is_error() {
        let err = parse_series_csv(fixture_empty_series_csv())
            .expect_err("a body without rows should be rejected");
        assert!(matches!(err, IngestError::Parse(_)));
    }

    #[test]
    fn test_parse_coerces_bad_cells_to_none() {
        let rows = parse_series_csv(fixture_malformed_rows_csv()).expect("fixture should parse");
        let week2 = rows.iter().find(|r| r.week == 2).expect("week 2 parsed");
        assert_eq!(week2.vci, None, "'n/a' should coerce to None");
        assert_eq!(week2.tci, Some(31.0));

        let short = rows.iter().find(|r| r.week == 3).expect("short row parsed");
        assert_eq!(short.smn, Some(0.053));
        assert_eq!(short.vhi, None, "missing trailing cells are None");
    }

    #[test]
    fn test_strip_markup_keeps_text_between_tags() {
        assert_eq!(strip_markup("<tt><pre>a,b</pre></tt>"), "a,b");
        assert_eq!(strip_markup("x<br>y"), "x\ny");
    }

    // --- Cleaning ------------------------------------------------------------

    #[test]
    fn test_normalize_drops_sentinel_rows_and_attaches_region() {
        let rows = parse_series_csv(fixture_odesa_csv()).unwrap();
        let records = normalize(&rows, odesa());

        assert_eq!(records.len(), 5, "the sentinel week should be dropped");
        assert!(records.iter().all(|r| r.region_id == 14));
        assert!(records.iter().all(|r| r.region_name == "Odesa"));
        assert!(!records.iter().any(|r| r.year == 2002 && r.week == 3));
    }

    #[test]
    fn test_normalize_drops_incomplete_and_out_of_range_rows() {
        let rows = parse_series_csv(fixture_malformed_rows_csv()).unwrap();
        let records = normalize(&rows, odesa());
        let weeks: Vec<u32> = records.iter().map(|r| r.week).collect();
        assert_eq!(weeks, vec![1, 4], "weeks 2, 3 and 60 should be dropped");
    }

    // --- Directory loading ---------------------------------------------------

    #[test]
    fn test_load_record_set_reads_all_recognized_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("NOAA_ID17_01012024120000.csv"), fixture_odesa_csv()).unwrap();
        fs::write(
            dir.path().join("NOAA_ID24_01012024120000.csv"),
            fixture_vinnytsia_br_csv(),
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let set = load_record_set(dir.path()).expect("two readable files");
        assert_eq!(set.len(), 7);
        assert_eq!(set.region_names(), vec!["Odesa", "Vinnytsia"]);
    }

    #[test]
    fn test_load_record_set_skips_unknown_and_unparseable_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("NOAA_ID17_01012024120000.csv"), fixture_odesa_csv()).unwrap();
        fs::write(dir.path().join("NOAA_ID12_01012024120000.csv"), fixture_odesa_csv()).unwrap();
        fs::write(dir.path().join("random.csv"), fixture_odesa_csv()).unwrap();
        fs::write(
            dir.path().join("NOAA_ID25_01012024120000.csv"),
            fixture_empty_series_csv(),
        )
        .unwrap();

        let set = load_record_set(dir.path()).expect("the Odesa file is readable");
        assert!(set.records().iter().all(|r| r.region_id == 14));
    }

    #[test]
    fn test_load_record_set_with_no_readable_files_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("random.csv"), "nothing").unwrap();

        let err = load_record_set(dir.path()).expect_err("no files should be read");
        assert!(matches!(err, IngestError::NoFilesRead(_)));
    }

    #[test]
    fn test_load_record_set_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_record_set(&dir.path().join("absent")).expect_err("missing dir");
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
