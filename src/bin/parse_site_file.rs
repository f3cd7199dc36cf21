//! Parse a saved AHPS hydrograph document and summarize it.
//!
//! Usage:
//!   cargo run --bin parse_site_file -- <xml_file> [trust|validate|sort]
//!
//! Documents can be saved from:
//!   https://water.weather.gov/ahps2/hydrograph_to_xml.php?output=xml&gage=btrl1
//!
//! Shows:
//!   - Site metadata and published flood stages
//!   - Rating table sizes
//!   - Current level, stage and projected crest

use ahps_service::config::ObservationOrder;
use ahps_service::ingest::ahps::parse_site_with;
use std::env;
use std::fs;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <xml_file> [trust|validate|sort]", args[0]);
        std::process::exit(1);
    }

    let order = match args.get(2).map(|s| s.as_str()) {
        None | Some("trust") => ObservationOrder::Trust,
        Some("validate") => ObservationOrder::Validate,
        Some("sort") => ObservationOrder::Sort,
        Some(other) => {
            eprintln!("Unknown ordering policy: {}", other);
            std::process::exit(1);
        }
    };

    let filename = &args[1];
    let bytes = match fs::read(filename) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    println!("Parsing AHPS hydrograph document from: {}\n", filename);

    let site = match parse_site_with(&bytes, order) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ {} ({})", site.name, site.id);
    println!("  Originator: {}  Generated: {}", site.originator, site.generation_time);
    if let Some(status) = &site.disclaimers.status {
        println!("  Status: {}", status);
    }

    println!("\nFlood stages:");
    if site.significant_stages.is_empty() {
        println!("  (none published)");
    }
    for (stage, threshold) in &site.significant_stages {
        println!("  {:<9} {:>8.2} {}", stage.as_str(), threshold.value, threshold.units);
    }

    println!(
        "\nRating points: {} (alternate: {})",
        site.rating_curve.points.len(),
        site.alternate_rating_curve.points.len()
    );
    println!(
        "Observed points: {}  Forecast points: {}\n",
        site.observed.len(),
        site.forecast.points.len()
    );

    match site.current_level() {
        Ok(level) => println!(
            "Current level: {:.2} {} at {}",
            level.value, level.unit, level.timestamp
        ),
        Err(e) => println!("Current level: {}", e),
    }
    match site.current_stage() {
        Ok(stage) => println!("Current stage: {}", stage),
        Err(e) => println!("Current stage: {}", e),
    }
    match site.projected_crest() {
        Ok(crest) => println!(
            "Projected crest: {:.2} {} at {}",
            crest.value, crest.unit, crest.timestamp
        ),
        Err(e) => println!("Projected crest: {}", e),
    }
}
