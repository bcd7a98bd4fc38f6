//! Vegetation Health Service - Main Entry Point
//!
//! Loads the NOAA weekly VHI series for every Ukrainian region and:
//! 1. Optionally downloads any region series not yet on disk
//! 2. Normalizes the stored files into one record set
//! 3. Prints the standard report (series, extremes, range, drought years)
//! 4. Optionally serves the record set over a JSON HTTP endpoint
//!
//! Usage:
//!   cargo run --release                              # Report from files already downloaded
//!   cargo run --release -- --download                # Fetch missing regions first
//!   cargo run --release -- --endpoint 8080           # Report, then serve on port 8080
//!   cargo run --release -- --config other.toml       # Use another configuration file
//!
//! Environment:
//!   VHI_CONFIG   - configuration file (default: vhi.toml)
//!   VHI_DATA_DIR - directory holding NOAA_ID*.csv files
//!   RUST_LOG     - tracing filter

use std::env;
use std::path::PathBuf;

use vhi_service::analysis::queries::{
    detect_drought_years, extremum_stats, range_query, series_for_region_year, DroughtCriteria,
};
use vhi_service::config::load_config;
use vhi_service::endpoint;
use vhi_service::ingest::{noaa, normalize};
use vhi_service::{logging, report};

struct Args {
    config: Option<PathBuf>,
    download: bool,
    endpoint_port: Option<u16>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config: None,
        download: false,
        endpoint_port: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--download" => {
                parsed.download = true;
                i += 1;
            }
            "--endpoint" => {
                let port = args
                    .get(i + 1)
                    .and_then(|p| p.parse().ok())
                    .ok_or("--endpoint requires a port number")?;
                parsed.endpoint_port = Some(port);
                i += 2;
            }
            "--config" => {
                let path = args.get(i + 1).ok_or("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
                i += 2;
            }
            other => {
                return Err(format!(
                    "Unknown argument: {}\nUsage: {} [--config PATH] [--download] [--endpoint PORT]",
                    other, args[0]
                ));
            }
        }
    }
    Ok(parsed)
}

fn main() {
    println!("🌱 Vegetation Health Service");
    println!("============================\n");

    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = load_config(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("\n❌ Configuration error: {}\n", e);
        std::process::exit(1);
    });
    logging::init(&config.logging.level);

    if args.download {
        println!("📥 Downloading missing region series...");
        match noaa::download_all(&config) {
            Ok(summary) => println!(
                "✓ Downloaded {}, skipped {}, failed {}\n",
                summary.downloaded, summary.skipped, summary.failed
            ),
            Err(e) => {
                eprintln!("\n❌ Download failed: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    println!("📊 Loading records from {}...", config.storage.data_dir.display());
    let set = normalize::load_record_set(&config.storage.data_dir).unwrap_or_else(|e| {
        eprintln!("\n❌ {}\n", e);
        eprintln!("Run with --download to fetch the NOAA series first.\n");
        std::process::exit(1);
    });
    println!("✓ Loaded {} records for {} regions\n", set.len(), set.region_names().len());

    let records = set.records();

    println!("{}", report::format_series(14, 2002, &series_for_region_year(records, 14, 2002)));

    println!("{}", report::format_extremes(&extremum_stats(records, &[1, 2, 3], &[2000, 2010])));

    let (range_regions, year_from, year_to) = ([4, 5], 2005, 2007);
    match range_query(records, &range_regions, year_from, year_to) {
        Ok(rows) => println!("{}", report::format_range(&range_regions, year_from, year_to, &rows)),
        Err(e) => eprintln!("✗ {}", e),
    }

    let criteria = DroughtCriteria::from(&config.drought);
    let droughts = detect_drought_years(records, &criteria);
    println!("{}", report::format_droughts(records, &droughts, &criteria));

    if let Some(port) = args.endpoint_port {
        println!("🚀 Starting HTTP endpoint on http://0.0.0.0:{}", port);
        println!("   Press Ctrl+C to stop\n");
        if let Err(e) = endpoint::start_endpoint_server(port, set, criteria) {
            eprintln!("\n❌ Endpoint server error: {}", e);
            std::process::exit(1);
        }
    }
}
