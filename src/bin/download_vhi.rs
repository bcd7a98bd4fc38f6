#!/usr/bin/env rust
//! NOAA VHI Series Download
//!
//! Fetches the weekly vegetation health series for every region in the
//! catalog and stores each as NOAA_ID{provinceID}_{timestamp}.csv in the
//! configured data directory. Regions that already have a file are skipped,
//! so the tool can be re-run after a partial failure.
//!
//! Usage:
//!   cargo run --bin download_vhi
//!
//! Environment:
//!   VHI_CONFIG   - configuration file (default: vhi.toml)
//!   VHI_DATA_DIR - target directory

use vhi_service::config::load_config;
use vhi_service::ingest::noaa::download_all;
use vhi_service::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🛰  NOAA VHI Series Download");
    println!("===========================\n");

    let config = load_config(None)?;
    logging::init(&config.logging.level);

    println!(
        "📋 Requesting {}–{} ({}) into {}",
        config.download.year_from,
        config.download.year_to,
        config.download.series_type,
        config.storage.data_dir.display()
    );
    println!("   Workers: {}\n", config.download.workers);

    let summary = download_all(&config)?;

    println!("\n🎉 DOWNLOAD COMPLETE");
    println!("===========================");
    println!("Regions downloaded: {}", summary.downloaded);
    println!("Regions skipped:    {}", summary.skipped);
    println!("Regions failed:     {}", summary.failed);

    if summary.failed > 0 {
        println!("\nRe-run to retry the failed regions.");
    }

    Ok(())
}
