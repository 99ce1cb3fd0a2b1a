//! Lookup states and results.

use std::sync::Arc;

use chrono::NaiveDate;
use phone_safe_crime_models::Incident;
use phone_safe_location_models::Coordinate;
use phone_safe_risk_models::{RiskAssessment, RiskLabel};
use serde::Serialize;

use crate::LookupError;

/// Where a lookup currently stands.
///
/// Exactly one of these is visible at a time, so a result and an error can
/// never be shown together.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LookupState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Turning the submission into a coordinate.
    Resolving,
    /// Coordinate known; waiting for the crime API.
    FetchingIncidents {
        /// Resolved coordinate.
        coordinate: Coordinate,
        /// Postcode for display, when known.
        postcode: Option<String>,
    },
    /// Lookup finished.
    Ready(Arc<LookupResult>),
    /// Lookup failed.
    Error(LookupError),
}

impl LookupState {
    /// Returns `true` while a request is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Resolving | Self::FetchingIncidents { .. })
    }

    /// The finished result, if any.
    #[must_use]
    pub fn result(&self) -> Option<&LookupResult> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// The error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&LookupError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// A state tagged with the submission it belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupSnapshot {
    /// Sequence token of the submission that wrote `state`. `0` before the
    /// first submission.
    pub token: u64,
    pub state: LookupState,
}

/// Everything a finished lookup produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    /// Map centre: the postcode centroid or the device position.
    pub coordinate: Coordinate,
    /// Normalised postcode, when one was resolved.
    pub postcode: Option<String>,
    /// Incidents near `coordinate`.
    pub incidents: Vec<Incident>,
    /// Risk relative to the reference area.
    pub assessment: RiskAssessment,
}

impl LookupResult {
    #[must_use]
    pub const fn incident_count(&self) -> u64 {
        self.assessment.incident_count
    }

    #[must_use]
    pub const fn label(&self) -> RiskLabel {
        self.assessment.label
    }

    /// The most recent month any incident was recorded in.
    #[must_use]
    pub fn latest_month(&self) -> Option<NaiveDate> {
        self.incidents.iter().filter_map(Incident::month_start).max()
    }
}
