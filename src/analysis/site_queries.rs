//! Derived readings over a parsed `SiteRecord`.
//!
//! These answer the three questions asked of every gauge report: what
//! flood stage is the river in right now, what is the latest level, and
//! where will the forecast crest. All of them take `observed[0]` as the
//! most recent observation and never re-sort; the ordering is fixed at
//! parse time (see `config::ObservationOrder`).

use std::collections::BTreeMap;

use crate::model::{AhpsError, RiverPoint, SiteRecord, Stage, Threshold, UNKNOWN_STAGE};

// ---------------------------------------------------------------------------
// Stage classification
// ---------------------------------------------------------------------------

/// Returns the stage whose threshold is the highest one still at or below
/// `level`, or `None` if `level` is below every threshold.
///
/// Equal threshold values resolve to the more severe stage.
pub fn classify_level(level: f64, thresholds: &BTreeMap<Stage, Threshold>) -> Option<Stage> {
    let mut best: Option<(Stage, f64)> = None;

    // BTreeMap iterates in ascending severity, so `>=` lets the later
    // (more severe) stage take a tie.
    for (stage, threshold) in thresholds {
        if level < threshold.value {
            continue;
        }
        match best {
            Some((_, best_value)) if threshold.value < best_value => {}
            _ => best = Some((*stage, threshold.value)),
        }
    }

    best.map(|(stage, _)| stage)
}

impl SiteRecord {
    /// Current flood stage name (`"low"` … `"record"`), or `"unknown"` when
    /// the latest reading is below every published threshold.
    ///
    /// # Errors
    /// `AhpsError::EmptyObservations` if the report has no observations.
    pub fn current_stage(&self) -> Result<&'static str, AhpsError> {
        let latest = self.observed.first().ok_or(AhpsError::EmptyObservations)?;

        Ok(classify_level(latest.primary.value, &self.significant_stages)
            .map(|stage| stage.as_str())
            .unwrap_or(UNKNOWN_STAGE))
    }

    /// The most recent observed primary reading, unchanged.
    ///
    /// # Errors
    /// `AhpsError::EmptyObservations` if the report has no observations.
    pub fn current_level(&self) -> Result<RiverPoint, AhpsError> {
        self.observed
            .first()
            .map(RiverPoint::from)
            .ok_or(AhpsError::EmptyObservations)
    }

    /// The highest forecast primary reading. When the peak value occurs
    /// more than once, the earliest-listed entry is returned.
    ///
    /// # Errors
    /// `AhpsError::EmptyForecast` if the report has no forecast points.
    pub fn projected_crest(&self) -> Result<RiverPoint, AhpsError> {
        let mut points = self.forecast.points.iter();
        let mut crest = points.next().ok_or(AhpsError::EmptyForecast)?;

        for point in points {
            if point.primary.value > crest.primary.value {
                crest = point;
            }
        }

        Ok(RiverPoint::from(crest))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
