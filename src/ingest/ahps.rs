//! NWS AHPS hydrograph XML client.
//!
//! Handles URL construction, the blocking fetch and XML parsing for the
//! AHPS hydrograph endpoint:
//!   https://water.weather.gov/ahps2/hydrograph_to_xml.php?output=xml&gage=<id>
//!
//! The endpoint returns one `<site>` document per gauge. See `fixtures.rs`
//! for annotated examples of the document structure.

use std::collections::BTreeMap;
use std::str;

use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Deserialize;

use crate::config::ObservationOrder;
use crate::model::{
    AhpsError, Disclaimers, Forecast, Quantity, RatingCurve, RatingPoint, SecondaryQuantity,
    SiteRecord, Stage, Threshold, TimePoint,
};

/// Fixed `<valid>` format: `YYYY-MM-DDTHH:MM:SS±HH:MM`. `Z` is not accepted.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

const ROOT_ELEMENT: &str = "site";

// ---------------------------------------------------------------------------
// Serde structures for AHPS XML deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WireSite {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@id", default)]
    id: String,
    #[serde(rename = "@timezone", default)]
    timezone: String,
    #[serde(rename = "@originator", default)]
    originator: String,
    #[serde(rename = "@generationtime", default)]
    generation_time: String,
    #[serde(default)]
    disclaimers: Option<WireDisclaimers>,
    #[serde(default)]
    sigstages: Option<WireStageSet>,
    #[serde(default)]
    sigflows: Option<WireStageSet>,
    #[serde(default)]
    zerodatum: Option<WireLevel>,
    #[serde(default)]
    rating: Option<WireRating>,
    #[serde(default)]
    alt_rating: Option<WireRating>,
    #[serde(default)]
    observed: Option<WireSeries>,
    #[serde(default)]
    forecast: Option<WireSeries>,
}

#[derive(Deserialize)]
struct WireDisclaimers {
    #[serde(rename = "AHPSXMLversion", default)]
    xml_version: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    quality: Option<WireText>,
    #[serde(default)]
    observed: Option<WireText>,
    #[serde(default)]
    general: Option<WireText>,
    #[serde(default)]
    standing: Option<WireText>,
}

/// Element whose attributes we don't need, only its text.
#[derive(Deserialize)]
struct WireText {
    #[serde(rename = "$text", default)]
    text: String,
}

/// The seven named stage elements. Used for both `<sigstages>` and
/// `<sigflows>`.
#[derive(Deserialize)]
struct WireStageSet {
    #[serde(default)]
    low: Option<WireLevel>,
    #[serde(default)]
    action: Option<WireLevel>,
    #[serde(default)]
    bankfull: Option<WireLevel>,
    #[serde(default)]
    flood: Option<WireLevel>,
    #[serde(default)]
    moderate: Option<WireLevel>,
    #[serde(default)]
    major: Option<WireLevel>,
    #[serde(default)]
    record: Option<WireLevel>,
}

/// `<flood units="ft">35.00</flood>`
#[derive(Deserialize)]
struct WireLevel {
    #[serde(rename = "@units", default)]
    units: String,
    #[serde(rename = "$text", default)]
    text: String,
}

#[derive(Deserialize)]
struct WireRating {
    #[serde(rename = "@dignity", default)]
    dignity: Option<String>,
    #[serde(rename = "datum", default)]
    datum: Vec<WireRatingDatum>,
}

/// `<datum stage="3.00" stageUnits="ft" flow="114.00" flowUnits="kcfs"/>`
#[derive(Deserialize)]
struct WireRatingDatum {
    #[serde(rename = "@stage")]
    stage: String,
    #[serde(rename = "@stageUnits", default)]
    stage_units: String,
    #[serde(rename = "@flow")]
    flow: String,
    #[serde(rename = "@flowUnits", default)]
    flow_units: String,
}

#[derive(Deserialize)]
struct WireSeries {
    #[serde(rename = "@timezone", default)]
    timezone: Option<String>,
    #[serde(rename = "@issued", default)]
    issued: Option<String>,
    #[serde(rename = "datum", default)]
    datum: Vec<WireDatum>,
}

#[derive(Deserialize)]
struct WireDatum {
    valid: WireValid,
    primary: WireQuantity,
    #[serde(default)]
    secondary: Option<WireQuantity>,
    #[serde(default)]
    pedts: Option<String>,
}

#[derive(Deserialize)]
struct WireValid {
    #[serde(rename = "@timezone", default)]
    timezone: Option<String>,
    #[serde(rename = "$text", default)]
    text: String,
}

/// `<primary name="Stage" units="ft">7.67</primary>`
#[derive(Deserialize)]
struct WireQuantity {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@units", default)]
    units: String,
    #[serde(rename = "$text", default)]
    text: String,
}

// ---------------------------------------------------------------------------
// URL construction and fetch
// ---------------------------------------------------------------------------

/// Builds the hydrograph URL for one gauge by adding the `gage` query
/// parameter to `base_url` (which may already carry `?output=xml`).
///
/// # Example
/// ```
/// use ahps_service::ingest::ahps::build_site_url;
///
/// let url = build_site_url(
///     "https://water.weather.gov/ahps2/hydrograph_to_xml.php?output=xml",
///     "btrl1",
/// );
/// assert!(url.ends_with("?output=xml&gage=btrl1"));
/// ```
pub fn build_site_url(base_url: &str, gauge: &str) -> String {
    let separator = if base_url.ends_with('?') || base_url.ends_with('&') {
        ""
    } else if base_url.contains('?') {
        "&"
    } else {
        "?"
    };

    format!(
        "{}{}gage={}",
        base_url,
        separator,
        urlencoding::encode(gauge.trim())
    )
}

/// Fetches the raw hydrograph document for `gauge`.
///
/// The timeout is whatever `client` was built with.
///
/// # Errors
/// - `AhpsError::HttpError` - non-2xx response.
/// - `AhpsError::RequestError` - connect/timeout/body read failure.
pub fn fetch_site_xml(
    client: &reqwest::blocking::Client,
    base_url: &str,
    gauge: &str,
) -> Result<Vec<u8>, AhpsError> {
    let url = build_site_url(base_url, gauge);

    debug!("Fetching: {}", url);

    let response = client
        .get(&url)
        .header("Accept", "application/xml")
        .send()
        .map_err(|e| AhpsError::RequestError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!("AHPS API error for {}: {}", gauge, status);
        return Err(AhpsError::HttpError(status.as_u16()));
    }

    let body = response
        .bytes()
        .map_err(|e| AhpsError::RequestError(e.to_string()))?;

    Ok(body.to_vec())
}

// ---------------------------------------------------------------------------
// Document parsing
// ---------------------------------------------------------------------------

/// Parses an AHPS hydrograph document into a `SiteRecord`, trusting the
/// published observation order.
///
/// # Errors
/// - `AhpsError::MalformedXml` - not UTF-8, not well-formed, wrong root
///   element or a required element/attribute is missing.
/// - `AhpsError::NumericField` - a threshold, rating or primary value is
///   not a finite number.
/// - `AhpsError::TimestampField` - a `<valid>` value is not
///   `YYYY-MM-DDTHH:MM:SS±HH:MM`.
///
/// The first failure is returned; no partial record is ever produced.
pub fn parse_site(bytes: &[u8]) -> Result<SiteRecord, AhpsError> {
    parse_site_with(bytes, ObservationOrder::Trust)
}

/// Like `parse_site`, with an explicit observation ordering policy.
///
/// `Validate` additionally fails with `AhpsError::UnorderedObservations`;
/// `Sort` reorders `observed` newest-first. The forecast is never touched.
pub fn parse_site_with(bytes: &[u8], order: ObservationOrder) -> Result<SiteRecord, AhpsError> {
    let text = str::from_utf8(bytes)
        .map_err(|e| AhpsError::MalformedXml(format!("document is not UTF-8: {}", e)))?;
    let text = text.trim_start_matches('\u{feff}');

    let root = root_element_name(text)?;
    if root != ROOT_ELEMENT {
        return Err(AhpsError::MalformedXml(format!(
            "expected <{}> root element, found <{}>",
            ROOT_ELEMENT, root
        )));
    }

    let wire: WireSite = quick_xml::de::from_str(text)
        .map_err(|e| AhpsError::MalformedXml(e.to_string()))?;

    let mut site = convert_site(wire)?;

    match order {
        ObservationOrder::Trust => {}
        ObservationOrder::Validate => check_newest_first(&site.observed)?,
        ObservationOrder::Sort => site
            .observed
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }

    Ok(site)
}

/// Scans the whole document for well-formedness and returns the name of its
/// root element. Only whitespace, comments and processing instructions may
/// appear outside the single root element.
fn root_element_name(text: &str) -> Result<String, AhpsError> {
    let mut reader = Reader::from_str(text);
    let mut root: Option<String> = None;
    let mut depth: usize = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    claim_root(&mut root, e.name().as_ref())?;
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    claim_root(&mut root, e.name().as_ref())?;
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(t)) if depth == 0 => {
                if !t.iter().all(|b| b.is_ascii_whitespace()) {
                    return Err(AhpsError::MalformedXml(
                        "text outside the root element".to_string(),
                    ));
                }
            }
            Ok(Event::CData(_)) if depth == 0 => {
                return Err(AhpsError::MalformedXml(
                    "CDATA outside the root element".to_string(),
                ));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(AhpsError::MalformedXml(e.to_string())),
        }
    }
    if depth != 0 {
        return Err(AhpsError::MalformedXml("unclosed root element".to_string()));
    }
    root.ok_or_else(|| AhpsError::MalformedXml("document has no root element".to_string()))
}

fn claim_root(root: &mut Option<String>, name: &[u8]) -> Result<(), AhpsError> {
    if root.is_some() {
        return Err(AhpsError::MalformedXml(
            "more than one root element".to_string(),
        ));
    }
    *root = Some(String::from_utf8_lossy(name).into_owned());
    Ok(())
}

fn convert_site(wire: WireSite) -> Result<SiteRecord, AhpsError> {
    let significant_stages = match &wire.sigstages {
        Some(set) => convert_stage_set("sigstages", set)?,
        None => Default::default(),
    };
    let significant_flows = match &wire.sigflows {
        Some(set) => convert_stage_set("sigflows", set)?,
        None => Default::default(),
    };

    let zero_datum = match &wire.zerodatum {
        Some(level) => convert_level("zerodatum", level)?,
        None => None,
    };

    let rating_curve = convert_rating("rating", wire.rating)?;
    let alternate_rating_curve = convert_rating("alt_rating", wire.alt_rating)?;

    let observed = match wire.observed {
        Some(series) => convert_points("observed", series.datum)?,
        None => Vec::new(),
    };

    let forecast = match wire.forecast {
        Some(series) => Forecast {
            issued: series.issued,
            timezone: series.timezone,
            points: convert_points("forecast", series.datum)?,
        },
        None => Forecast::default(),
    };

    Ok(SiteRecord {
        name: wire.name,
        id: wire.id,
        timezone: wire.timezone,
        originator: wire.originator,
        generation_time: wire.generation_time,
        disclaimers: wire.disclaimers.map(convert_disclaimers).unwrap_or_default(),
        significant_stages,
        significant_flows,
        zero_datum,
        rating_curve,
        alternate_rating_curve,
        observed,
        forecast,
    })
}

/// Explicit stage-by-stage decoding of `<sigstages>`/`<sigflows>`.
fn convert_stage_set(
    section: &str,
    set: &WireStageSet,
) -> Result<BTreeMap<Stage, Threshold>, AhpsError> {
    let declared = [
        (Stage::Low, &set.low),
        (Stage::Action, &set.action),
        (Stage::Bankfull, &set.bankfull),
        (Stage::Flood, &set.flood),
        (Stage::Moderate, &set.moderate),
        (Stage::Major, &set.major),
        (Stage::Record, &set.record),
    ];

    let mut thresholds = BTreeMap::new();
    for (stage, level) in declared {
        let Some(level) = level else { continue };
        let field = format!("{}/{}", section, stage.as_str());
        if let Some(threshold) = convert_level(&field, level)? {
            thresholds.insert(stage, threshold);
        }
    }
    Ok(thresholds)
}

/// An element with empty text means "not published" and yields `None`.
fn convert_level(field: &str, level: &WireLevel) -> Result<Option<Threshold>, AhpsError> {
    if level.text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(Threshold {
        value: parse_number(field, &level.text)?,
        units: level.units.trim().to_string(),
    }))
}

fn convert_rating(section: &str, rating: Option<WireRating>) -> Result<RatingCurve, AhpsError> {
    let Some(rating) = rating else {
        return Ok(RatingCurve::default());
    };

    let mut points = Vec::with_capacity(rating.datum.len());
    for (i, datum) in rating.datum.into_iter().enumerate() {
        points.push(RatingPoint {
            stage_value: parse_number(&format!("{}/datum[{}]@stage", section, i), &datum.stage)?,
            stage_units: datum.stage_units,
            flow_value: parse_number(&format!("{}/datum[{}]@flow", section, i), &datum.flow)?,
            flow_units: datum.flow_units,
        });
    }

    Ok(RatingCurve {
        dignity: rating.dignity,
        points,
    })
}

fn convert_points(section: &str, datum: Vec<WireDatum>) -> Result<Vec<TimePoint>, AhpsError> {
    let mut points = Vec::with_capacity(datum.len());
    for (i, d) in datum.into_iter().enumerate() {
        let timestamp = parse_timestamp(&d.valid.text)?;
        let value = parse_number(&format!("{}/datum[{}]/primary", section, i), &d.primary.text)?;

        points.push(TimePoint {
            timestamp,
            timezone: d.valid.timezone,
            primary: Quantity {
                value,
                name: d.primary.name,
                units: d.primary.units,
            },
            secondary: d.secondary.map(|s| SecondaryQuantity {
                raw: s.text.trim().to_string(),
                name: s.name,
                units: s.units,
            }),
            pedts: d.pedts.map(|p| p.trim().to_string()),
        });
    }
    Ok(points)
}

fn convert_disclaimers(wire: WireDisclaimers) -> Disclaimers {
    let text = |t: Option<WireText>| t.map(|t| t.text.trim().to_string());
    Disclaimers {
        xml_version: wire.xml_version.map(|v| v.trim().to_string()),
        status: wire.status.map(|v| v.trim().to_string()),
        quality: text(wire.quality),
        observed: text(wire.observed),
        general: text(wire.general),
        standing: text(wire.standing),
    }
}

/// Parses a numeric field, rejecting NaN and infinities.
fn parse_number(field: &str, raw: &str) -> Result<f64, AhpsError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AhpsError::NumericField {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Parses a `<valid>` timestamp, keeping the offset as written.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, AhpsError> {
    DateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|_| AhpsError::TimestampField {
        value: raw.to_string(),
    })
}

fn check_newest_first(observed: &[TimePoint]) -> Result<(), AhpsError> {
    for (i, pair) in observed.windows(2).enumerate() {
        if pair[1].timestamp > pair[0].timestamp {
            return Err(AhpsError::UnorderedObservations { index: i + 1 });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
