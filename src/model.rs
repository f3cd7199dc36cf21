//! Core data types for the AHPS gauge report service.
//!
//! This module defines the shared domain model imported by all other modules:
//! the parsed `SiteRecord`, its threshold/rating/time-series parts, the
//! `RiverPoint` returned by the derivation queries, and `AhpsError`.
//! It contains no I/O. The only logic is small accessors on the types.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Stage vocabulary
// ---------------------------------------------------------------------------

/// Returned by `SiteRecord::current_stage` when the reading is below every
/// published threshold.
pub const UNKNOWN_STAGE: &str = "unknown";

/// AHPS uses `-999` (and lower) in `secondary` for "no value".
pub const MISSING_VALUE_SENTINEL: f64 = -999.0;

/// Named flood-severity levels published under `<sigstages>` and
/// `<sigflows>`, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Low,
    Action,
    Bankfull,
    Flood,
    Moderate,
    Major,
    Record,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Low,
        Stage::Action,
        Stage::Bankfull,
        Stage::Flood,
        Stage::Moderate,
        Stage::Major,
        Stage::Record,
    ];

    /// The lower-cased element tag this stage is published under.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Low => "low",
            Stage::Action => "action",
            Stage::Bankfull => "bankfull",
            Stage::Flood => "flood",
            Stage::Moderate => "moderate",
            Stage::Major => "major",
            Stage::Record => "record",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// A numeric level with its (opaque) unit label, e.g. `27.0 ft`.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub value: f64,
    pub units: String,
}

/// One row of a stage/flow rating table.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingPoint {
    pub stage_value: f64,
    pub stage_units: String,
    pub flow_value: f64,
    pub flow_units: String,
}

/// A rating table as published (`<rating>` or `<alt_rating>`).
/// Points keep source order and are not sorted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatingCurve {
    pub dignity: Option<String>,
    pub points: Vec<RatingPoint>,
}

/// The principal measured quantity of a sample (usually stage height).
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub name: String,
    pub units: String,
}

/// The companion quantity of a sample (usually flow).
///
/// Kept as raw text: the service frequently publishes `-999` or blanks here,
/// and nothing downstream depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryQuantity {
    pub raw: String,
    pub name: String,
    pub units: String,
}

impl SecondaryQuantity {
    /// Best-effort numeric value. `None` for blanks, non-numeric text and
    /// the missing-value sentinel.
    pub fn value(&self) -> Option<f64> {
        self.raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > MISSING_VALUE_SENTINEL)
    }
}

/// One observed or forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    /// Instant with the UTC offset exactly as the source wrote it.
    pub timestamp: DateTime<FixedOffset>,
    /// The `timezone` attribute of `<valid>`, e.g. `"UTC"`.
    pub timezone: Option<String>,
    pub primary: Quantity,
    pub secondary: Option<SecondaryQuantity>,
    /// SHEF physical-element/duration/type/source code, uninterpreted.
    pub pedts: Option<String>,
}

/// A forecast batch: samples plus batch metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    pub issued: Option<String>,
    pub timezone: Option<String>,
    pub points: Vec<TimePoint>,
}

/// Free-text notices attached to every AHPS document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Disclaimers {
    pub xml_version: Option<String>,
    pub status: Option<String>,
    pub quality: Option<String>,
    pub observed: Option<String>,
    pub general: Option<String>,
    pub standing: Option<String>,
}

/// Everything one AHPS hydrograph document says about a single gauge.
///
/// Built once by `ingest::ahps::parse_site` and never mutated afterwards.
/// `observed[0]` is the most recent observation; that ordering is the
/// producer's contract and is not re-checked unless requested at parse time
/// (see `config::ObservationOrder`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiteRecord {
    pub name: String,
    pub id: String,
    pub timezone: String,
    pub originator: String,
    pub generation_time: String,
    pub disclaimers: Disclaimers,
    pub significant_stages: BTreeMap<Stage, Threshold>,
    pub significant_flows: BTreeMap<Stage, Threshold>,
    pub zero_datum: Option<Threshold>,
    pub rating_curve: RatingCurve,
    pub alternate_rating_curve: RatingCurve,
    pub observed: Vec<TimePoint>,
    pub forecast: Forecast,
}

/// A single value at a point in time, as returned by the level and crest
/// queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiverPoint {
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl From<&TimePoint> for RiverPoint {
    fn from(point: &TimePoint) -> Self {
        RiverPoint {
            value: point.primary.value,
            unit: point.primary.units.clone(),
            timestamp: point.timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching, parsing or querying an AHPS report.
#[derive(Debug, Clone, PartialEq)]
pub enum AhpsError {
    /// Not UTF-8, not well-formed XML, or not the `<site>` schema.
    MalformedXml(String),
    /// A field that must be numeric could not be parsed.
    NumericField { field: String, value: String },
    /// A `<valid>` timestamp did not match `YYYY-MM-DDTHH:MM:SS±HH:MM`.
    TimestampField { value: String },
    /// A query needed `observed[0]` but there are no observations.
    EmptyObservations,
    /// A query needed forecast points but there are none.
    EmptyForecast,
    /// `observed[index]` is newer than `observed[index - 1]`.
    UnorderedObservations { index: usize },
    /// Non-2xx HTTP response from the AHPS service.
    HttpError(u16),
    /// Transport failure: connect, timeout, body read.
    RequestError(String),
}

impl fmt::Display for AhpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AhpsError::MalformedXml(msg) => write!(f, "Malformed XML: {}", msg),
            AhpsError::NumericField { field, value } => {
                write!(f, "Non-numeric value '{}' in field {}", value, field)
            }
            AhpsError::TimestampField { value } => write!(
                f,
                "Timestamp '{}' does not match YYYY-MM-DDTHH:MM:SS±HH:MM",
                value
            ),
            AhpsError::EmptyObservations => write!(f, "No observed readings in report"),
            AhpsError::EmptyForecast => write!(f, "No forecast readings in report"),
            AhpsError::UnorderedObservations { index } => write!(
                f,
                "Observation {} is newer than the one before it (expected most recent first)",
                index
            ),
            AhpsError::HttpError(code) => write!(f, "HTTP error: {}", code),
            AhpsError::RequestError(msg) => write!(f, "Request failed: {}", msg),
        }
    }
}

impl std::error::Error for AhpsError {}
