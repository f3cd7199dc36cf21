//! AHPS Gauge Report - command line
//!
//! Fetches the AHPS hydrograph report for each gauge and prints the
//! current level, flood stage and projected crest.
//!
//! Usage:
//!   cargo run --release                          # All gauges in ahps.toml
//!   cargo run --release -- btrl1 pkin2           # Specific gauges
//!   cargo run --release -- --json btrl1          # One JSON object per gauge
//!   cargo run --release -- --config other.toml   # Alternate config file
//!
//! Environment (also read from .env):
//!   AHPS_BASE_URL     - endpoint override
//!   AHPS_TIMEOUT_SECS - client timeout override
//!   RUST_LOG          - log level (e.g. debug)

use ahps_service::client::SiteClient;
use ahps_service::config::{self, AhpsConfig};
use ahps_service::model::{AhpsError, SiteRecord};
use serde_json::json;
use std::env;

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut as_json = false;
    let mut gauges: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            "--json" => {
                as_json = true;
                i += 1;
            }
            flag if flag.starts_with("--") => {
                eprintln!("Unknown argument: {}", flag);
                eprintln!("Usage: {} [--config PATH] [--json] [GAUGE ...]", args[0]);
                std::process::exit(1);
            }
            gauge => {
                gauges.push(gauge.to_lowercase());
                i += 1;
            }
        }
    }

    let config = match load_effective_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if gauges.is_empty() {
        gauges = config.gauges.iter().map(|g| g.id.clone()).collect();
    }
    if gauges.is_empty() {
        eprintln!("No gauges given and none configured in {}", config::CONFIG_PATH);
        std::process::exit(1);
    }

    let client = match SiteClient::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    if !as_json {
        println!("🌊 AHPS Gauge Report");
        println!("====================\n");
    }

    let mut failures = 0;
    for gauge in &gauges {
        match client.get_site(gauge) {
            Ok(site) if as_json => println!("{}", site_json(gauge, &site)),
            Ok(site) => print_site(gauge, &config, &site),
            Err(e) => {
                failures += 1;
                eprintln!("   ✗ {} - {}", gauge, e);
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Config file (explicit path, else ahps.toml if present, else defaults)
/// with environment overrides applied.
fn load_effective_config(path: Option<&str>) -> Result<AhpsConfig, config::ConfigError> {
    let base = match path {
        Some(p) => config::load_config_from(p)?,
        None if std::path::Path::new(config::CONFIG_PATH).exists() => config::load_config()?,
        None => AhpsConfig::default(),
    };
    config::apply_overrides(
        base,
        env::var("AHPS_BASE_URL").ok(),
        env::var("AHPS_TIMEOUT_SECS").ok(),
    )
}

fn print_site(gauge: &str, config: &AhpsConfig, site: &SiteRecord) {
    let name = config
        .find_gauge(gauge)
        .map(|g| g.name.as_str())
        .unwrap_or(site.name.as_str());
    println!("📍 {} ({})", name, site.id);

    match site.current_level() {
        Ok(level) => println!(
            "   Level:  {:.2} {} at {}",
            level.value,
            level.unit,
            level.timestamp.to_rfc3339()
        ),
        Err(e) => println!("   Level:  n/a ({})", e),
    }

    match site.current_stage() {
        Ok(stage) => println!("   Stage:  {}", stage),
        Err(e) => println!("   Stage:  n/a ({})", e),
    }

    match site.projected_crest() {
        Ok(crest) => println!(
            "   Crest:  {:.2} {} at {}",
            crest.value,
            crest.unit,
            crest.timestamp.to_rfc3339()
        ),
        Err(AhpsError::EmptyForecast) => println!("   Crest:  no forecast issued"),
        Err(e) => println!("   Crest:  n/a ({})", e),
    }
    println!();
}

fn site_json(gauge: &str, site: &SiteRecord) -> serde_json::Value {
    json!({
        "gauge": gauge,
        "id": site.id,
        "name": site.name,
        "stage": site.current_stage().ok(),
        "level": site.current_level().ok(),
        "crest": site.projected_crest().ok(),
    })
}
