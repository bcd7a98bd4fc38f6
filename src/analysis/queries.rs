/// Point, range, extremum and drought queries over a record set.
///
/// Every function takes the records explicitly and never mutates them.
/// Missing (region, year) combinations are not errors: they show up as an
/// empty sequence or as an absent key.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::model::{ExtremumStats, InvalidRangeError, SeriesPoint, VhiRecord};

/// Drought criteria: a year qualifies when at least `min_region_count`
/// distinct regions recorded a VHI strictly below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroughtCriteria {
    pub threshold: f64,
    pub min_region_count: usize,
}

impl Default for DroughtCriteria {
    fn default() -> Self {
        Self {
            threshold: 15.0,
            min_region_count: 5,
        }
    }
}

impl From<&crate::config::DroughtSettings> for DroughtCriteria {
    fn from(settings: &crate::config::DroughtSettings) -> Self {
        DroughtCriteria {
            threshold: settings.threshold,
            min_region_count: settings.min_region_count,
        }
    }
}

/// A single below-threshold week inside a drought year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroughtObservation {
    pub region_id: u32,
    pub region_name: String,
    pub week: u32,
    pub vhi: f64,
}

// ---------------------------------------------------------------------------
// Point and range queries
// ---------------------------------------------------------------------------

/// Weekly VHI for one region and year, in record order.
pub fn series_for_region_year(records: &[VhiRecord], region_id: u32, year: i32) -> Vec<SeriesPoint> {
    records
        .iter()
        .filter(|r| r.region_id == region_id && r.year == year)
        .map(|r| SeriesPoint {
            week: r.week,
            vhi: r.vhi,
        })
        .collect()
}

/// Records for any of `region_ids` within `year_from..=year_to`, in record
/// order.
///
/// # Errors
/// `InvalidRangeError` when `year_from > year_to`.
pub fn range_query<'a>(
    records: &'a [VhiRecord],
    region_ids: &[u32],
    year_from: i32,
    year_to: i32,
) -> Result<Vec<&'a VhiRecord>, InvalidRangeError> {
    if year_from > year_to {
        return Err(InvalidRangeError { year_from, year_to });
    }
    let wanted: HashSet<u32> = region_ids.iter().copied().collect();
    Ok(records
        .iter()
        .filter(|r| wanted.contains(&r.region_id) && (year_from..=year_to).contains(&r.year))
        .collect())
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Min, max, mean and median of a non-empty sample; `None` when empty.
///
/// The median of an even-sized sample is the mean of the two middle values.
pub fn summarize(values: &[f64]) -> Option<ExtremumStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    // Summation rounding can land the mean one ulp outside the sample.
    let mean = (sorted.iter().sum::<f64>() / sorted.len() as f64).clamp(min, max);

    Some(ExtremumStats {
        min,
        max,
        mean,
        median,
    })
}

/// VHI statistics for every requested (region, year) pair that has data.
///
/// Pairs without records are omitted rather than reported as errors.
pub fn extremum_stats(
    records: &[VhiRecord],
    region_ids: &[u32],
    years: &[i32],
) -> BTreeMap<(u32, i32), ExtremumStats> {
    let mut stats = BTreeMap::new();
    for &region_id in region_ids {
        for &year in years {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.region_id == region_id && r.year == year)
                .map(|r| r.vhi)
                .collect();
            if let Some(summary) = summarize(&values) {
                stats.insert((region_id, year), summary);
            }
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Drought detection
// ---------------------------------------------------------------------------

/// Years in which enough distinct regions fell below the VHI threshold,
/// mapped to those regions.
///
/// A region counts once per year however many of its weeks are below the
/// threshold. The comparison is strict.
pub fn detect_drought_years(
    records: &[VhiRecord],
    criteria: &DroughtCriteria,
) -> BTreeMap<i32, BTreeSet<u32>> {
    let mut regions_by_year: BTreeMap<i32, BTreeSet<u32>> = BTreeMap::new();
    for r in records.iter().filter(|r| r.vhi < criteria.threshold) {
        regions_by_year.entry(r.year).or_default().insert(r.region_id);
    }
    regions_by_year.retain(|_, regions| regions.len() >= criteria.min_region_count);
    regions_by_year
}

/// The below-threshold weeks of `region_ids` in `year`, in record order.
pub fn drought_observations(
    records: &[VhiRecord],
    year: i32,
    region_ids: &BTreeSet<u32>,
    threshold: f64,
) -> Vec<DroughtObservation> {
    records
        .iter()
        .filter(|r| r.year == year && region_ids.contains(&r.region_id) && r.vhi < threshold)
        .map(|r| DroughtObservation {
            region_id: r.region_id,
            region_name: r.region_name.clone(),
            week: r.week,
            vhi: r.vhi,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
