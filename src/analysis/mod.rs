/// Data analysis for the vegetation health service.
///
/// Submodules:
/// - `queries`  — series, range, extremum statistics and drought detection.
/// - `explorer` — region/week/year filtering, index sorting, region means.

pub mod explorer;
pub mod queries;
