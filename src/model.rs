/// Core data types for the vegetation health service.
///
/// This module defines the shared domain model imported by all other modules:
/// the cleaned weekly record, the raw parsed row it is built from, the record
/// set handed to the analysis layer, and the query result types.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Sentinel handling
// ---------------------------------------------------------------------------

/// Value the NOAA files use for "no observation" in every numeric column.
pub const MISSING_SENTINEL: f64 = -1.0;

/// Resolves the NOAA missing-value sentinel to `None`.
pub fn resolve_sentinel(value: f64) -> Option<f64> {
    if (value - MISSING_SENTINEL).abs() < f64::EPSILON {
        None
    } else {
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One row of a NOAA weekly series, before region attachment and cleaning.
///
/// Every index column is optional: `None` means the cell was the `-1`
/// sentinel or could not be read as a number.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub year: i32,
    pub week: u32,
    pub smn: Option<f64>,
    pub smt: Option<f64>,
    pub vci: Option<f64>,
    pub tci: Option<f64>,
    pub vhi: Option<f64>,
}

/// A cleaned weekly observation for one region.
///
/// Records only exist for rows where all indices were present, so analysis
/// code never has to look for the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VhiRecord {
    pub region_id: u32,
    pub region_name: String,
    pub year: i32,
    pub week: u32,
    pub vci: f64,
    pub tci: f64,
    pub vhi: f64,
}

/// The three condition indices a caller can select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VhiIndex {
    Vci,
    Tci,
    #[default]
    Vhi,
}

impl VhiIndex {
    /// Reads this index from a record.
    pub fn value_of(self, record: &VhiRecord) -> f64 {
        match self {
            VhiIndex::Vci => record.vci,
            VhiIndex::Tci => record.tci,
            VhiIndex::Vhi => record.vhi,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VhiIndex::Vci => "VCI",
            VhiIndex::Tci => "TCI",
            VhiIndex::Vhi => "VHI",
        }
    }
}

impl fmt::Display for VhiIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VhiIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VCI" => Ok(VhiIndex::Vci),
            "TCI" => Ok(VhiIndex::Tci),
            "VHI" => Ok(VhiIndex::Vhi),
            other => Err(format!("unknown index '{}', expected VCI, TCI or VHI", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Record set
// ---------------------------------------------------------------------------

/// The normalized records for one process run.
///
/// Built once by the normalizer and read-only afterwards; every query takes
/// `records()` explicitly rather than reaching for shared state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<VhiRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<VhiRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[VhiRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest year present, or `None` for an empty set.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Distinct region names, sorted.
    pub fn region_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<VhiRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = VhiRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Query result types
// ---------------------------------------------------------------------------

/// One point of a weekly VHI series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub week: u32,
    pub vhi: f64,
}

/// Summary statistics over the VHI values of one (region, year) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtremumStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A range query was asked for a year window that runs backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid year range: {year_from} is after {year_to}")]
pub struct InvalidRangeError {
    pub year_from: i32,
    pub year_to: i32,
}
