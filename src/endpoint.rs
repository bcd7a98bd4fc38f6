/// HTTP endpoint for querying the vegetation health record set
///
/// Provides a small read-only JSON API over the records loaded at startup,
/// for notebooks and dashboards that should not parse the NOAA files
/// themselves.
///
/// Endpoints:
/// - GET /health - Service health check
/// - GET /regions - Region catalog and the year span present in the data
/// - GET /series?region=ID&year=YYYY - Weekly VHI for one region and year
/// - GET /extremes?regions=ID,ID&years=YYYY,YYYY - Min/max/mean/median VHI
/// - GET /range?regions=ID,ID&from=YYYY&to=YYYY - Records in a year window
/// - GET /droughts?threshold=T&min_regions=N - Drought years
/// - GET /explore?region=NAME&weeks=A-B&years=A-B&index=VHI&sort=asc - Explorer rows
/// - GET /compare?weeks=A-B&years=A-B&index=VHI&sort=desc - Per-region means

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::analysis::explorer::{compare_regions, filter_records, week_start_date, ExplorerFilter, SortOrder};
use crate::analysis::queries::{
    detect_drought_years, extremum_stats, range_query, series_for_region_year, DroughtCriteria,
};
use crate::model::{InvalidRangeError, RecordSet, VhiIndex};
use crate::regions::{self, REGION_CATALOG};

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/health",
    "/regions",
    "/series",
    "/extremes",
    "/range",
    "/droughts",
    "/explore",
    "/compare",
];

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Handler failure carrying the HTTP status to answer with.
#[derive(Debug, PartialEq)]
struct ApiError {
    status: u16,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
        }
    }
}

type ApiResult = Result<Value, ApiError>;

/// Splits a request URL into its path and decoded query parameters.
fn split_url(url: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key.to_string(), value))
        })
        .collect();
    (path, params)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid value '{}' for '{}'", raw, key)))
}

fn required<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<T, ApiError> {
    let raw = params
        .get(key)
        .ok_or_else(|| ApiError::bad_request(format!("missing parameter '{}'", key)))?;
    parse_value(key, raw)
}

fn optional<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, ApiError> {
    params.get(key).map(|raw| parse_value(key, raw)).transpose()
}

/// Comma-separated list, e.g. `regions=1,2,3`.
fn required_list<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Vec<T>, ApiError> {
    let raw = params
        .get(key)
        .ok_or_else(|| ApiError::bad_request(format!("missing parameter '{}'", key)))?;
    raw.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_value(key, item))
        .collect()
}

/// Inclusive window written as `A-B`, or a single value `A`.
fn optional_window<T: FromStr + Copy>(
    params: &HashMap<String, String>,
    key: &str,
    default: RangeInclusive<T>,
) -> Result<RangeInclusive<T>, ApiError> {
    let Some(raw) = params.get(key) else {
        return Ok(default);
    };
    match raw.split_once('-') {
        Some((start, end)) => Ok(parse_value(key, start)?..=parse_value(key, end)?),
        None => {
            let single = parse_value(key, raw)?;
            Ok(single..=single)
        }
    }
}

/// `weeks=` window, 1..=52 when absent.
fn week_window(params: &HashMap<String, String>) -> Result<RangeInclusive<u32>, ApiError> {
    let weeks = optional_window(params, "weeks", 1..=52)?;
    if weeks.start() > weeks.end() {
        return Err(ApiError::bad_request(format!(
            "invalid week range: {} is after {}",
            weeks.start(),
            weeks.end()
        )));
    }
    Ok(weeks)
}

/// `years=` window, the span present in `set` when absent.
fn year_window(set: &RecordSet, params: &HashMap<String, String>) -> Result<RangeInclusive<i32>, ApiError> {
    let all_years = set.year_bounds().map(|(a, b)| a..=b).unwrap_or(i32::MIN..=i32::MAX);
    let years = optional_window(params, "years", all_years)?;
    if years.start() > years.end() {
        let err = InvalidRangeError {
            year_from: *years.start(),
            year_to: *years.end(),
        };
        return Err(ApiError::bad_request(err.to_string()));
    }
    Ok(years)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_health(set: &RecordSet) -> ApiResult {
    Ok(json!({
        "status": "ok",
        "service": "vhi_service",
        "version": env!("CARGO_PKG_VERSION"),
        "records": set.len(),
    }))
}

fn handle_regions(set: &RecordSet) -> ApiResult {
    let catalog: Vec<Value> = REGION_CATALOG
        .iter()
        .map(|r| json!({ "region_id": r.region_id, "source_id": r.source_id, "name": r.name }))
        .collect();
    let years = set.year_bounds().map(|(from, to)| json!({ "from": from, "to": to }));
    Ok(json!({
        "regions": catalog,
        "regions_with_data": set.region_names(),
        "years": years,
    }))
}

fn handle_series(set: &RecordSet, params: &HashMap<String, String>) -> ApiResult {
    let region_id: u32 = required(params, "region")?;
    let year: i32 = required(params, "year")?;
    let series = series_for_region_year(set.records(), region_id, year);
    Ok(json!({
        "region_id": region_id,
        "region_name": regions::region_name(region_id),
        "year": year,
        "series": series,
    }))
}

fn handle_extremes(set: &RecordSet, params: &HashMap<String, String>) -> ApiResult {
    let region_ids: Vec<u32> = required_list(params, "regions")?;
    let years: Vec<i32> = required_list(params, "years")?;
    let stats: Vec<Value> = extremum_stats(set.records(), &region_ids, &years)
        .into_iter()
        .map(|((region_id, year), s)| {
            json!({
                "region_id": region_id,
                "region_name": regions::region_name(region_id),
                "year": year,
                "min": s.min,
                "max": s.max,
                "mean": s.mean,
                "median": s.median,
            })
        })
        .collect();
    Ok(json!({ "stats": stats }))
}

fn handle_range(set: &RecordSet, params: &HashMap<String, String>) -> ApiResult {
    let region_ids: Vec<u32> = required_list(params, "regions")?;
    let year_from: i32 = required(params, "from")?;
    let year_to: i32 = required(params, "to")?;
    let rows = range_query(set.records(), &region_ids, year_from, year_to)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(json!({ "count": rows.len(), "records": rows }))
}

fn handle_droughts(
    set: &RecordSet,
    defaults: &DroughtCriteria,
    params: &HashMap<String, String>,
) -> ApiResult {
    let criteria = DroughtCriteria {
        threshold: optional(params, "threshold")?.unwrap_or(defaults.threshold),
        min_region_count: optional(params, "min_regions")?.unwrap_or(defaults.min_region_count),
    };
    let years: Vec<Value> = detect_drought_years(set.records(), &criteria)
        .into_iter()
        .map(|(year, region_ids)| json!({ "year": year, "regions": region_ids }))
        .collect();
    Ok(json!({
        "threshold": criteria.threshold,
        "min_region_count": criteria.min_region_count,
        "years": years,
    }))
}

fn handle_explore(set: &RecordSet, params: &HashMap<String, String>) -> ApiResult {
    let region_name: String = required(params, "region")?;
    let filter = ExplorerFilter {
        weeks: week_window(params)?,
        years: year_window(set, params)?,
        index: optional(params, "index")?.unwrap_or_default(),
        sort: optional::<SortOrder>(params, "sort")?.unwrap_or_default(),
        ..ExplorerFilter::for_region(&region_name)
    };
    let rows: Vec<Value> = filter_records(set.records(), &filter)
        .into_iter()
        .map(|r| {
            json!({
                "year": r.year,
                "week": r.week,
                "date": week_start_date(r.year, r.week).map(|d| d.to_string()),
                "region_name": r.region_name,
                "vci": r.vci,
                "tci": r.tci,
                "vhi": r.vhi,
            })
        })
        .collect();
    Ok(json!({ "index": filter.index, "count": rows.len(), "records": rows }))
}

fn handle_compare(set: &RecordSet, params: &HashMap<String, String>) -> ApiResult {
    let weeks = week_window(params)?;
    let years = year_window(set, params)?;
    let index: VhiIndex = optional(params, "index")?.unwrap_or_default();
    let sort: SortOrder = optional(params, "sort")?.unwrap_or_default();
    let means = compare_regions(set.records(), &weeks, &years, index, sort);
    Ok(json!({ "index": index, "regions": means }))
}

/// Routes one request URL to its handler.
///
/// Returns the HTTP status and the JSON body. Kept free of any socket
/// handling so it can be exercised directly.
pub fn route(set: &RecordSet, defaults: &DroughtCriteria, url: &str) -> (u16, Value) {
    let (path, params) = split_url(url);
    let result = match path {
        "/health" => handle_health(set),
        "/regions" => handle_regions(set),
        "/series" => handle_series(set, &params),
        "/extremes" => handle_extremes(set, &params),
        "/range" => handle_range(set, &params),
        "/droughts" => handle_droughts(set, defaults, &params),
        "/explore" => handle_explore(set, &params),
        "/compare" => handle_compare(set, &params),
        _ => Err(ApiError {
            status: 404,
            message: "Not found".to_string(),
        }),
    };

    match result {
        Ok(body) => (200, body),
        Err(e) if e.status == 404 => (
            404,
            json!({ "error": e.message, "available_endpoints": AVAILABLE_ENDPOINTS }),
        ),
        Err(e) => (e.status, json!({ "error": e.message })),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks forever.
pub fn start_endpoint_server(
    port: u16,
    set: RecordSet,
    defaults: DroughtCriteria,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))?;
    info!("HTTP endpoint listening on http://0.0.0.0:{} ({} records)", port, set.len());

    for request in server.incoming_requests() {
        let (status, body) = route(&set, &defaults, request.url());
        debug!(method = %request.method(), url = request.url(), status, "request");

        if let Err(e) = request.respond(create_response(status, &body)) {
            warn!("failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_data(json.to_string().into_bytes())
        .with_status_code(status_code);
    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
