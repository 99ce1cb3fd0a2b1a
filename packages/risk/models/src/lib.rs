#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk label, banding scheme and reference area types.
//!
//! Risk is always relative: a location's incident count is divided by the
//! count recorded for a fixed [`ReferenceArea`] and the resulting ratio is
//! mapped onto a [`RiskLabel`] by a [`RiskScheme`].

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Relative phone-theft risk, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLabel {
    /// Under a quarter of the reference area's count.
    Low,
    /// At least a quarter of the reference area's count.
    Moderate,
    /// At least half of the reference area's count.
    High,
    /// At least three quarters of the reference area's count.
    #[strum(serialize = "Very High")]
    VeryHigh,
}

impl RiskLabel {
    /// Returns all variants in ascending severity.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Moderate, Self::High, Self::VeryHigh]
    }
}

/// Which set of threshold bands to classify with.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskScheme {
    /// `Low`, `Moderate`, `High`. Never yields [`RiskLabel::VeryHigh`].
    ThreeLevel,
    /// `Low`, `Moderate`, `High`, `Very High`.
    #[default]
    FourLevel,
}

impl RiskScheme {
    /// Ratio thresholds for this scheme, most severe first.
    ///
    /// A ratio at or above a threshold takes that band's label; anything
    /// below the last threshold is [`RiskLabel::Low`].
    #[must_use]
    pub const fn bands(self) -> &'static [(f64, RiskLabel)] {
        match self {
            Self::ThreeLevel => &[(0.50, RiskLabel::High), (0.25, RiskLabel::Moderate)],
            Self::FourLevel => &[
                (0.75, RiskLabel::VeryHigh),
                (0.50, RiskLabel::High),
                (0.25, RiskLabel::Moderate),
            ],
        }
    }
}

/// A fixed, historically high-crime area whose incident count is the
/// denominator for every risk ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceArea {
    /// Area name shown alongside results (e.g. `"Soho"`).
    pub name: String,
    /// A postcode inside the area.
    pub postcode: String,
    /// The month the count was taken from, as `YYYY-MM`.
    pub period: String,
    /// Number of recorded incidents for the period.
    pub incident_count: NonZeroU32,
}

impl Default for ReferenceArea {
    fn default() -> Self {
        Self {
            name: "Soho".to_string(),
            postcode: "W1D 4EB".to_string(),
            period: "2024-07".to_string(),
            incident_count: NonZeroU32::new(41).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// The figures behind a classification, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Incidents found near the queried location.
    pub incident_count: u64,
    /// `incident_count` divided by the reference area's count.
    pub ratio: f64,
    /// Resulting label.
    pub label: RiskLabel,
    /// Name of the reference area the ratio is relative to.
    pub reference_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_ordered_by_severity() {
        let all = RiskLabel::all();
        for w in all.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn very_high_displays_with_space() {
        assert_eq!(RiskLabel::VeryHigh.to_string(), "Very High");
        assert_eq!(RiskLabel::Moderate.to_string(), "Moderate");
        assert_eq!("Very High".parse::<RiskLabel>().unwrap(), RiskLabel::VeryHigh);
    }

    #[test]
    fn scheme_parses_from_snake_case() {
        assert_eq!("three_level".parse::<RiskScheme>().unwrap(), RiskScheme::ThreeLevel);
        assert_eq!(RiskScheme::default(), RiskScheme::FourLevel);
        let s: RiskScheme = serde_json::from_str("\"four_level\"").unwrap();
        assert_eq!(s, RiskScheme::FourLevel);
    }

    #[test]
    fn bands_are_descending() {
        for scheme in [RiskScheme::ThreeLevel, RiskScheme::FourLevel] {
            for w in scheme.bands().windows(2) {
                assert!(w[0].0 > w[1].0, "{scheme} bands not descending");
                assert!(w[0].1 > w[1].1, "{scheme} labels not descending");
            }
        }
        assert!(
            RiskScheme::ThreeLevel
                .bands()
                .iter()
                .all(|(_, l)| *l != RiskLabel::VeryHigh)
        );
    }

    #[test]
    fn default_reference_is_soho() {
        let r = ReferenceArea::default();
        assert_eq!(r.name, "Soho");
        assert_eq!(r.incident_count.get(), 41);
    }
}
