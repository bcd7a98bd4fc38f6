/// vhi_service: vegetation health (VHI) time series for the regions of Ukraine.
///
/// # Module structure
///
/// ```text
/// vhi_service
/// ├── model       — shared data types (VhiRecord, RecordSet, VhiIndex, InvalidRangeError, …)
/// ├── config      — service configuration loader (vhi.toml + environment)
/// ├── regions     — NOAA provinceID → local region id → name catalog
/// ├── logging     — tracing subscriber setup
/// ├── ingest
/// │   ├── noaa      — NOAA STAR VH service: URL construction + parallel download
/// │   ├── normalize — stored CSV files → cleaned RecordSet
/// │   └── fixtures (test only) — representative response payloads
/// ├── analysis
/// │   ├── queries  — series, range, extremum statistics, drought detection
/// │   └── explorer — region/week/year filtering, index sorting, region means
/// ├── report      — text rendering of query results for the CLI tools
/// └── endpoint    — JSON HTTP API over the record set
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod report;
