//! Service configuration loader - parses ahps.toml
//!
//! Keeps the endpoint, client timeout, ordering policy and the list of
//! monitored gauges out of the code, so adding a gauge or pointing at a
//! mirror does not need a rebuild.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default AHPS hydrograph endpoint. The gauge id is appended as `gage`.
pub const DEFAULT_BASE_URL: &str = "https://water.weather.gov/ahps2/hydrograph_to_xml.php?output=xml";

/// Default client-side timeout for one document fetch, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default config file, relative to the working directory.
pub const CONFIG_PATH: &str = "ahps.toml";

// ---------------------------------------------------------------------------
// TOML structures
// ---------------------------------------------------------------------------

/// Root of ahps.toml. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AhpsConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub parsing: ParsingConfig,
    #[serde(default, rename = "gauge")]
    pub gauges: Vec<GaugeConfig>,
}

/// Where and how to fetch documents.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsingConfig {
    #[serde(default)]
    pub observation_order: ObservationOrder,
}

/// How much to trust the "`observed[0]` is most recent" contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationOrder {
    /// Use the order as published.
    #[default]
    Trust,
    /// Reject documents whose observations are not newest-first.
    Validate,
    /// Stable-sort observations newest-first after parsing.
    Sort,
}

/// One monitored gauge.
#[derive(Debug, Clone, Deserialize)]
pub struct GaugeConfig {
    /// AHPS gauge id (NWSLI), e.g. `"btrl1"`.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Parse(toml::de::Error),
    InvalidOverride { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "Failed to read {}: {}", path, source),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidOverride { key, value } => {
                write!(f, "Invalid value '{}' for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses ahps.toml contents.
pub fn parse_config(contents: &str) -> Result<AhpsConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Loads configuration from the given path.
pub fn load_config_from<P: AsRef<Path>>(path: P) -> Result<AhpsConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&contents)
}

/// Loads `ahps.toml` from the current working directory (project root when
/// running via `cargo run`).
pub fn load_config() -> Result<AhpsConfig, ConfigError> {
    load_config_from(CONFIG_PATH)
}

/// Applies `AHPS_BASE_URL` / `AHPS_TIMEOUT_SECS` style overrides.
///
/// Takes the raw values rather than reading the environment so callers
/// decide where they come from (the binaries use `dotenv` + `std::env`).
pub fn apply_overrides(
    mut config: AhpsConfig,
    base_url: Option<String>,
    timeout_secs: Option<String>,
) -> Result<AhpsConfig, ConfigError> {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.service.base_url = url.trim().to_string();
    }
    if let Some(raw) = timeout_secs {
        config.service.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
            key: "AHPS_TIMEOUT_SECS",
            value: raw.clone(),
        })?;
    }
    Ok(config)
}

impl AhpsConfig {
    pub fn find_gauge(&self, id: &str) -> Option<&GaugeConfig> {
        self.gauges.iter().find(|g| g.id.eq_ignore_ascii_case(id))
    }
}
