#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Relative phone-theft risk classification.
//!
//! [`RiskEvaluator`] divides an incident count by the reference area's
//! count and walks the scheme's bands from most to least severe; the first
//! band whose threshold the ratio reaches wins.

pub use phone_safe_risk_models::{ReferenceArea, RiskAssessment, RiskLabel, RiskScheme};

/// Classifies incident counts relative to a fixed [`ReferenceArea`].
#[derive(Debug, Clone, Default)]
pub struct RiskEvaluator {
    reference: ReferenceArea,
    scheme: RiskScheme,
}

impl RiskEvaluator {
    #[must_use]
    pub const fn new(reference: ReferenceArea, scheme: RiskScheme) -> Self {
        Self { reference, scheme }
    }

    #[must_use]
    pub const fn reference(&self) -> &ReferenceArea {
        &self.reference
    }

    #[must_use]
    pub const fn scheme(&self) -> RiskScheme {
        self.scheme
    }

    /// Incident count divided by the reference area's count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, count: u64) -> f64 {
        count as f64 / f64::from(self.reference.incident_count.get())
    }

    /// Maps an incident count onto a [`RiskLabel`].
    #[must_use]
    pub fn classify(&self, count: u64) -> RiskLabel {
        let ratio = self.ratio(count);
        self.scheme
            .bands()
            .iter()
            .find(|(threshold, _)| ratio >= *threshold)
            .map_or(RiskLabel::Low, |(_, label)| *label)
    }

    /// Classifies `count` and bundles the ratio and reference name with the
    /// label.
    #[must_use]
    pub fn assess(&self, count: u64) -> RiskAssessment {
        let ratio = self.ratio(count);
        let label = self.classify(count);
        log::debug!(
            "{count} incidents vs {} in {}: ratio {ratio:.3} -> {label}",
            self.reference.incident_count,
            self.reference.name,
        );
        RiskAssessment {
            incident_count: count,
            ratio,
            label,
            reference_name: self.reference.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use proptest::prelude::*;

    use super::*;

    fn four_level() -> RiskEvaluator {
        RiskEvaluator::new(ReferenceArea::default(), RiskScheme::FourLevel)
    }

    fn three_level() -> RiskEvaluator {
        RiskEvaluator::new(ReferenceArea::default(), RiskScheme::ThreeLevel)
    }

    #[test]
    fn zero_is_low() {
        assert_eq!(four_level().classify(0), RiskLabel::Low);
        assert_eq!(three_level().classify(0), RiskLabel::Low);
    }

    #[test]
    fn four_level_boundaries_against_41() {
        let e = four_level();
        assert_eq!(e.classify(10), RiskLabel::Low); // 0.2439
        assert_eq!(e.classify(11), RiskLabel::Moderate); // 0.2683
        assert_eq!(e.classify(20), RiskLabel::Moderate); // 0.4878
        assert_eq!(e.classify(21), RiskLabel::High); // 0.5122
        assert_eq!(e.classify(30), RiskLabel::High); // 0.7317
        assert_eq!(e.classify(31), RiskLabel::VeryHigh); // 0.7561
        assert_eq!(e.classify(41), RiskLabel::VeryHigh); // 1.0
        assert_eq!(e.classify(500), RiskLabel::VeryHigh);
    }

    #[test]
    fn three_level_caps_at_high() {
        let e = three_level();
        assert_eq!(e.classify(10), RiskLabel::Low);
        assert_eq!(e.classify(11), RiskLabel::Moderate);
        assert_eq!(e.classify(21), RiskLabel::High);
        assert_eq!(e.classify(31), RiskLabel::High);
        assert_eq!(e.classify(41), RiskLabel::High);
    }

    #[test]
    fn exact_thresholds_are_inclusive() {
        let reference = ReferenceArea {
            incident_count: NonZeroU32::new(100).unwrap(),
            ..ReferenceArea::default()
        };
        let e = RiskEvaluator::new(reference, RiskScheme::FourLevel);
        assert_eq!(e.classify(24), RiskLabel::Low);
        assert_eq!(e.classify(25), RiskLabel::Moderate);
        assert_eq!(e.classify(50), RiskLabel::High);
        assert_eq!(e.classify(75), RiskLabel::VeryHigh);
    }

    #[test]
    fn reference_is_injectable() {
        let reference = ReferenceArea {
            name: "Test Area".to_string(),
            incident_count: NonZeroU32::new(4).unwrap(),
            ..ReferenceArea::default()
        };
        let e = RiskEvaluator::new(reference, RiskScheme::FourLevel);
        assert_eq!(e.classify(1), RiskLabel::Moderate);
        assert_eq!(e.classify(3), RiskLabel::VeryHigh);

        let a = e.assess(2);
        assert_eq!(a.label, RiskLabel::High);
        assert!((a.ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(a.reference_name, "Test Area");
        assert_eq!(a.incident_count, 2);
    }

    proptest! {
        #[test]
        fn classify_is_deterministic(count in 0u64..10_000) {
            let e = four_level();
            prop_assert_eq!(e.classify(count), e.classify(count));
        }

        #[test]
        fn classify_is_monotonic(a in 0u64..10_000, b in 0u64..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for e in [four_level(), three_level()] {
                prop_assert!(e.classify(lo) <= e.classify(hi));
            }
        }

        #[test]
        fn schemes_agree_below_three_quarters(count in 0u64..31) {
            prop_assert_eq!(four_level().classify(count), three_level().classify(count));
        }
    }
}
