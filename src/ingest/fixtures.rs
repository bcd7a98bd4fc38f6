/// Representative NOAA STAR VH payloads for tests.
///
/// The service answers `get_TS_admin.php` with plain text wrapped in
/// `<tt><pre>` tags: a title line naming the province, a header line, then
/// one comma-separated row per week with a trailing comma. Weeks without an
/// observation carry `-1` in every index column.

/// Odesa (NOAA provinceID 17), two years of excerpted weeks. 2002 week 3 is
/// a sentinel row.
pub fn fixture_odesa_csv() -> &'static str {
    "<tt><pre>Ukraine Province= 17: Odessa, from 1981 to 2024, weekly, Mean\n\
year,week, SMN,SMT,VCI,TCI, VHI,\n\
2001,  1,  0.061,265.36, 52.18, 31.72, 41.95,\n\
2001,  2,  0.059,264.01, 50.03, 35.96, 42.99,\n\
2002,  1,  0.064,266.12, 58.40, 28.11, 43.26,\n\
2002,  2,  0.062,265.88, 55.72, 24.06, 39.89,\n\
2002,  3, -1.000, -1.00, -1.00, -1.00, -1.00,\n\
2002,  4,  0.060,264.70, 49.10, 20.44, 34.77,\n\
</pre></tt>"
}

/// Vinnytsia (NOAA provinceID 24) in the `<br>`-separated layout some
/// responses use instead of newlines.
pub fn fixture_vinnytsia_br_csv() -> &'static str {
    "<tt><pre>Ukraine Province= 24: Vinnytsya, from 1981 to 2024, weekly, Mean<br>\
year,week, SMN,SMT,VCI,TCI, VHI,<br>\
2000, 30,  0.301,297.14, 12.50,  9.80, 11.15,<br>\
2000, 31,  0.295,298.02, 10.44,  7.96,  9.20,<br>\
</pre></tt>"
}

/// A response body with a title but no rows, as returned for an unknown
/// province id.
pub fn fixture_empty_series_csv() -> &'static str {
    "<tt><pre>Ukraine Province= 99: , from 1981 to 2024, weekly, Mean\n\
year,week, SMN,SMT,VCI,TCI, VHI,\n\
</pre></tt>"
}

/// Rows with non-numeric cells and an out-of-range week, which the
/// normalizer must drop.
pub fn fixture_malformed_rows_csv() -> &'static str {
    "year,week, SMN,SMT,VCI,TCI, VHI,\n\
2005,  1,  0.050,262.00, 40.00, 30.00, 35.00,\n\
2005,  2,  0.051,262.10, n/a, 31.00, 36.00,\n\
2005, 60,  0.052,262.20, 41.00, 32.00, 36.50,\n\
2005,  3,  0.053\n\
2005,  4,  0.054,262.40, 42.00, 33.00, 37.50,\n"
}
