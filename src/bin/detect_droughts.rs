#!/usr/bin/env rust
//! Drought Year Detection
//!
//! Loads the stored NOAA series and lists the years in which at least N
//! distinct regions recorded a VHI below the threshold, with every dry week
//! of the qualifying regions.
//!
//! Usage:
//!   cargo run --bin detect_droughts
//!
//! Options:
//!   --threshold T      VHI threshold (default from vhi.toml, 15)
//!   --min-regions N    Minimum distinct regions per year (default from vhi.toml, 5)
//!
//! Environment:
//!   VHI_CONFIG   - configuration file (default: vhi.toml)
//!   VHI_DATA_DIR - directory holding NOAA_ID*.csv files

use std::env;

use vhi_service::analysis::queries::{detect_drought_years, DroughtCriteria};
use vhi_service::config::load_config;
use vhi_service::ingest::normalize::load_record_set;
use vhi_service::{logging, report};

fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>, String> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .and_then(|v| v.parse().ok())
            .map(Some)
            .ok_or_else(|| format!("{} requires a numeric value", flag)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🌾 Drought Year Detection");
    println!("=========================\n");

    let args: Vec<String> = env::args().collect();
    let config = load_config(None)?;
    logging::init(&config.logging.level);

    let defaults = DroughtCriteria::from(&config.drought);
    let criteria = DroughtCriteria {
        threshold: flag_value(&args, "--threshold")?.unwrap_or(defaults.threshold),
        min_region_count: flag_value(&args, "--min-regions")?.unwrap_or(defaults.min_region_count),
    };

    println!("📊 Loading records from {}...", config.storage.data_dir.display());
    let set = load_record_set(&config.storage.data_dir)?;
    println!("✓ Loaded {} records\n", set.len());

    let droughts = detect_drought_years(set.records(), &criteria);
    println!("{}", report::format_droughts(set.records(), &droughts, &criteria));
    println!("Found {} drought years", droughts.len());

    Ok(())
}
