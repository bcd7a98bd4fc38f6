/// Filtering and comparison queries behind the data explorer.
///
/// A caller picks a region, a week window, a year window, an index and a
/// sort order; `filter_records` returns the matching rows and
/// `compare_regions` averages the index per region over the same windows.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::model::{VhiIndex, VhiRecord};

/// Row ordering by the selected index.
///
/// A single selector, so "ascending" and "descending" can never both be
/// requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "unsorted" => Ok(SortOrder::Unsorted),
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Explorer selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerFilter {
    pub region_name: String,
    pub weeks: RangeInclusive<u32>,
    pub years: RangeInclusive<i32>,
    pub index: VhiIndex,
    pub sort: SortOrder,
}

impl ExplorerFilter {
    /// Filter for one region over all years, weeks 1-52, VHI, unsorted.
    pub fn for_region(region_name: &str) -> Self {
        Self {
            region_name: region_name.to_string(),
            weeks: 1..=52,
            years: i32::MIN..=i32::MAX,
            index: VhiIndex::Vhi,
            sort: SortOrder::Unsorted,
        }
    }
}

/// Mean of the selected index for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMean {
    pub region_id: u32,
    pub region_name: String,
    pub mean: f64,
}

fn in_window(record: &VhiRecord, weeks: &RangeInclusive<u32>, years: &RangeInclusive<i32>) -> bool {
    weeks.contains(&record.week) && years.contains(&record.year)
}

/// Records of the selected region inside both windows.
///
/// Sorted by the selected index when `filter.sort` asks for it (stable, so
/// ties keep record order), otherwise in record order.
pub fn filter_records<'a>(records: &'a [VhiRecord], filter: &ExplorerFilter) -> Vec<&'a VhiRecord> {
    let mut rows: Vec<&VhiRecord> = records
        .iter()
        .filter(|r| r.region_name == filter.region_name && in_window(r, &filter.weeks, &filter.years))
        .collect();

    let index = filter.index;
    match filter.sort {
        SortOrder::Unsorted => {}
        SortOrder::Ascending => rows.sort_by(|a, b| index.value_of(a).total_cmp(&index.value_of(b))),
        SortOrder::Descending => rows.sort_by(|a, b| index.value_of(b).total_cmp(&index.value_of(a))),
    }
    rows
}

/// Per-region mean of `index` over the week and year windows.
///
/// Ordered by region name unless `sort` orders by the mean. Regions with no
/// records in the windows are absent.
pub fn compare_regions(
    records: &[VhiRecord],
    weeks: &RangeInclusive<u32>,
    years: &RangeInclusive<i32>,
    index: VhiIndex,
    sort: SortOrder,
) -> Vec<RegionMean> {
    // name -> (id, sum, count)
    let mut totals: BTreeMap<&str, (u32, f64, usize)> = BTreeMap::new();
    for r in records.iter().filter(|r| in_window(r, weeks, years)) {
        let entry = totals.entry(r.region_name.as_str()).or_insert((r.region_id, 0.0, 0));
        entry.1 += index.value_of(r);
        entry.2 += 1;
    }

    let mut means: Vec<RegionMean> = totals
        .into_iter()
        .map(|(name, (region_id, sum, count))| RegionMean {
            region_id,
            region_name: name.to_string(),
            mean: sum / count as f64,
        })
        .collect();

    match sort {
        SortOrder::Unsorted => {}
        SortOrder::Ascending => means.sort_by(|a, b| a.mean.total_cmp(&b.mean)),
        SortOrder::Descending => means.sort_by(|a, b| b.mean.total_cmp(&a.mean)),
    }
    means
}

/// Monday of ISO week `week` in ISO year `year`, for placing weekly values
/// on a calendar axis. `None` if the week does not exist in that year.
pub fn week_start_date(year: i32, week: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}
