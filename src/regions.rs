/// Region catalog for the Ukrainian vegetation health series.
///
/// NOAA numbers the Ukrainian provinces alphabetically by their English
/// names, while this service uses the Ukrainian alphabetical order. The
/// catalog maps one onto the other and carries the display name for each
/// region. This is the single source of truth for region identifiers; other
/// modules should look regions up here rather than hardcoding ids.

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// Display name used when an id is not in the catalog.
pub const UNKNOWN_REGION_NAME: &str = "Unknown region";

/// One administrative region.
#[derive(Debug, PartialEq, Eq)]
pub struct Region {
    /// `provinceID` used by the NOAA STAR VH service.
    pub source_id: u32,
    /// Local identifier used throughout the record set.
    pub region_id: u32,
    /// Human-readable region name.
    pub name: &'static str,
}

/// All regions, ordered by local id.
///
/// Source ids: NOAA STAR `get_TS_admin.php` provinceID for country=UKR.
pub static REGION_CATALOG: &[Region] = &[
    Region { source_id: 24, region_id: 1, name: "Vinnytsia" },
    Region { source_id: 25, region_id: 2, name: "Volyn" },
    Region { source_id: 5, region_id: 3, name: "Dnipropetrovsk" },
    Region { source_id: 6, region_id: 4, name: "Donetsk" },
    Region { source_id: 27, region_id: 5, name: "Zhytomyr" },
    Region { source_id: 23, region_id: 6, name: "Zakarpattia" },
    Region { source_id: 26, region_id: 7, name: "Zaporizhzhia" },
    Region { source_id: 7, region_id: 8, name: "Ivano-Frankivsk" },
    Region { source_id: 11, region_id: 9, name: "Kyiv" },
    Region { source_id: 13, region_id: 10, name: "Kirovohrad" },
    Region { source_id: 14, region_id: 11, name: "Luhansk" },
    Region { source_id: 15, region_id: 12, name: "Lviv" },
    Region { source_id: 16, region_id: 13, name: "Mykolaiv" },
    Region { source_id: 17, region_id: 14, name: "Odesa" },
    Region { source_id: 18, region_id: 15, name: "Poltava" },
    Region { source_id: 19, region_id: 16, name: "Rivne" },
    Region { source_id: 21, region_id: 17, name: "Sumy" },
    Region { source_id: 22, region_id: 18, name: "Ternopil" },
    Region { source_id: 8, region_id: 19, name: "Kharkiv" },
    Region { source_id: 9, region_id: 20, name: "Kherson" },
    Region { source_id: 10, region_id: 21, name: "Khmelnytskyi" },
    Region { source_id: 1, region_id: 22, name: "Cherkasy" },
    Region { source_id: 2, region_id: 23, name: "Chernihiv" },
    Region { source_id: 3, region_id: 24, name: "Chernivtsi" },
    Region { source_id: 4, region_id: 25, name: "Crimea" },
];

/// Looks up a region by its NOAA provinceID. Returns `None` if not found.
pub fn find_by_source_id(source_id: u32) -> Option<&'static Region> {
    REGION_CATALOG.iter().find(|r| r.source_id == source_id)
}

/// Looks up a region by its local id. Returns `None` if not found.
pub fn find_by_region_id(region_id: u32) -> Option<&'static Region> {
    REGION_CATALOG.iter().find(|r| r.region_id == region_id)
}

/// Display name for a local id, falling back to `UNKNOWN_REGION_NAME`.
pub fn region_name(region_id: u32) -> &'static str {
    find_by_region_id(region_id)
        .map(|r| r.name)
        .unwrap_or(UNKNOWN_REGION_NAME)
}

/// Formats a region as `"14 (Odesa)"` for reports.
pub fn label(region_id: u32) -> String {
    format!("{} ({})", region_id, region_name(region_id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_covers_all_twenty_five_regions() {
        assert_eq!(REGION_CATALOG.len(), 25);
        let ids: HashSet<_> = REGION_CATALOG.iter().map(|r| r.region_id).collect();
        for id in 1..=25 {
            assert!(ids.contains(&id), "local id {} missing from catalog", id);
        }
    }

    #[test]
    fn test_no_duplicate_source_ids() {
        let mut seen = HashSet::new();
        for region in REGION_CATALOG {
            assert!(
                seen.insert(region.source_id),
                "duplicate source id {} found in REGION_CATALOG",
                region.source_id
            );
        }
    }

    #[test]
    fn test_source_ids_skip_the_unused_noaa_slots() {
        // NOAA has no Ukrainian province at 12 (Kyiv city) or 20 (Sevastopol).
        assert!(find_by_source_id(12).is_none());
        assert!(find_by_source_id(20).is_none());
    }

    #[test]
    fn test_find_by_source_id_remaps_to_local_id() {
        let odesa = find_by_source_id(17).expect("source id 17 should be Odesa");
        assert_eq!(odesa.region_id, 14);
        assert_eq!(odesa.name, "Odesa");

        let crimea = find_by_source_id(4).expect("source id 4 should be Crimea");
        assert_eq!(crimea.region_id, 25);
    }

    #[test]
    fn test_catalog_is_ordered_by_local_id() {
        let ids: Vec<_> = REGION_CATALOG.iter().map(|r| r.region_id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_unknown_region_falls_back_to_placeholder_name() {
        assert_eq!(region_name(99), UNKNOWN_REGION_NAME);
        assert_eq!(label(99), "99 (Unknown region)");
        assert_eq!(label(1), "1 (Vinnytsia)");
    }
}
