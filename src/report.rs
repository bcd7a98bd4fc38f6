/// Plain-text reports for the command-line tools.
///
/// Each function renders the result of one query into a string; the
/// binaries print them. Region names come from the catalog.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::analysis::queries::{drought_observations, DroughtCriteria};
use crate::model::{ExtremumStats, SeriesPoint, VhiRecord};
use crate::regions;

/// Weekly VHI table for one region and year.
pub fn format_series(region_id: u32, year: i32, series: &[SeriesPoint]) -> String {
    let mut out = format!("[VHI] Region {}, year {}:\n", regions::label(region_id), year);
    if series.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    out.push_str("  Week     VHI\n");
    for point in series {
        let _ = writeln!(out, "  {:>4}  {:>6.2}", point.week, point.vhi);
    }
    out
}

/// One line per (region, year) with data.
pub fn format_extremes(stats: &BTreeMap<(u32, i32), ExtremumStats>) -> String {
    let mut out = String::new();
    for (&(region_id, year), s) in stats {
        let _ = writeln!(
            out,
            "[EXTREMES] Region {}, year {}: min {:.2}, max {:.2}, mean {:.2}, median {:.2}",
            regions::label(region_id),
            year,
            s.min,
            s.max,
            s.mean,
            s.median
        );
    }
    if out.is_empty() {
        out.push_str("[EXTREMES] no data for the requested regions and years\n");
    }
    out
}

/// Region/year/week/VHI table for a range query.
pub fn format_range(region_ids: &[u32], year_from: i32, year_to: i32, rows: &[&VhiRecord]) -> String {
    let labels: Vec<String> = region_ids.iter().map(|&id| regions::label(id)).collect();
    let mut out = format!(
        "[RANGE] Regions [{}], years {}-{}: {} rows\n",
        labels.join(", "),
        year_from,
        year_to,
        rows.len()
    );
    for r in rows {
        let _ = writeln!(out, "  {:<16} {:>4} {:>3} {:>6.2}", r.region_name, r.year, r.week, r.vhi);
    }
    out
}

/// Drought years with their regions and the individual dry weeks.
pub fn format_droughts(
    records: &[VhiRecord],
    droughts: &BTreeMap<i32, BTreeSet<u32>>,
    criteria: &DroughtCriteria,
) -> String {
    let mut out = format!(
        "[DROUGHTS] Years with >= {} regions below VHI {}:\n",
        criteria.min_region_count, criteria.threshold
    );
    if droughts.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for (year, region_ids) in droughts {
        let labels: Vec<String> = region_ids.iter().map(|&id| regions::label(id)).collect();
        let _ = writeln!(out, "  Year {}: {}", year, labels.join(", "));
        for obs in drought_observations(records, *year, region_ids, criteria.threshold) {
            let _ = writeln!(out, "    {:<16} week {:>2}  VHI {:>6.2}", obs.region_name, obs.week, obs.vhi);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::queries::detect_drought_years;

    fn rec(region_id: u32, year: i32, week: u32, vhi: f64) -> VhiRecord {
        VhiRecord {
            region_id,
            region_name: regions::region_name(region_id).to_string(),
            year,
            week,
            vci: vhi,
            tci: vhi,
            vhi,
        }
    }

    #[test]
    fn test_empty_series_report_says_no_data() {
        let report = format_series(14, 2002, &[]);
        assert!(report.contains("14 (Odesa)"));
        assert!(report.contains("no data"));
    }

    #[test]
    fn test_series_report_lists_each_week() {
        let series = [SeriesPoint { week: 1, vhi: 41.95 }, SeriesPoint { week: 2, vhi: 9.2 }];
        let report = format_series(14, 2002, &series);
        assert!(report.contains("41.95"));
        assert!(report.contains(" 9.20"));
    }

    #[test]
    fn test_extremes_report_uses_two_decimals() {
        let mut stats = BTreeMap::new();
        stats.insert(
            (1, 2000),
            ExtremumStats { min: 20.0, max: 60.0, mean: 40.0, median: 40.0 },
        );
        let report = format_extremes(&stats);
        assert!(report.contains("1 (Vinnytsia), year 2000"), "got: {}", report);
        assert!(report.contains("mean 40.00"));
    }

    #[test]
    fn test_drought_report_lists_regions_and_weeks() {
        let records: Vec<VhiRecord> = (1..=5).map(|id| rec(id, 2000, 10 + id, 10.0)).collect();
        let criteria = DroughtCriteria::default();
        let droughts = detect_drought_years(&records, &criteria);
        let report = format_droughts(&records, &droughts, &criteria);
        assert!(report.contains("Year 2000"));
        assert!(report.contains("5 (Zhytomyr)"));
        assert!(report.contains("week 15"));
    }

    #[test]
    fn test_range_report_counts_rows() {
        let a = rec(4, 2005, 1, 50.0);
        let report = format_range(&[4, 5], 2005, 2007, &[&a]);
        assert!(report.contains("4 (Donetsk), 5 (Zhytomyr)"));
        assert!(report.contains("1 rows"));
    }
}
