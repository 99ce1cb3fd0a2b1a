#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Street-level crime record types for the police.uk API.
//!
//! Incidents are deserialized directly from the `crimes-street` response.
//! The API transmits coordinates as decimal strings; [`Incident::coordinate`]
//! turns them into a validated [`Coordinate`].

use chrono::NaiveDate;
use phone_safe_location_models::{Coordinate, InvalidCoordinateError};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// police.uk street-level crime categories, as used in the
/// `crimes-street/{category}` path.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CrimeCategory {
    AllCrime,
    AntiSocialBehaviour,
    BicycleTheft,
    Burglary,
    CriminalDamageArson,
    Drugs,
    OtherTheft,
    PossessionOfWeapons,
    PublicOrder,
    Robbery,
    Shoplifting,
    /// Pickpocketing and snatch theft; the category phone theft falls under.
    #[default]
    TheftFromThePerson,
    VehicleCrime,
    ViolentCrime,
    OtherCrime,
}

impl CrimeCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AllCrime,
            Self::AntiSocialBehaviour,
            Self::BicycleTheft,
            Self::Burglary,
            Self::CriminalDamageArson,
            Self::Drugs,
            Self::OtherTheft,
            Self::PossessionOfWeapons,
            Self::PublicOrder,
            Self::Robbery,
            Self::Shoplifting,
            Self::TheftFromThePerson,
            Self::VehicleCrime,
            Self::ViolentCrime,
            Self::OtherCrime,
        ]
    }
}

/// A single street-level crime record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// police.uk record ID.
    pub id: u64,
    /// Stable identifier across monthly releases. Empty for some
    /// categories (e.g. anti-social behaviour).
    #[serde(default)]
    pub persistent_id: String,
    /// Category slug (e.g. `"theft-from-the-person"`).
    pub category: String,
    /// Month the crime was recorded, as `YYYY-MM`.
    pub month: String,
    /// Anonymised location.
    pub location: IncidentLocation,
    /// `"Force"` or `"BTP"` (British Transport Police).
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub location_subtype: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    /// Latest outcome, when one has been recorded.
    #[serde(default)]
    pub outcome_status: Option<OutcomeStatus>,
}

impl Incident {
    /// The incident's location as a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if the upstream coordinate is out
    /// of range.
    pub fn coordinate(&self) -> Result<Coordinate, InvalidCoordinateError> {
        Coordinate::new(self.location.latitude, self.location.longitude)
    }

    /// First day of the month the incident was recorded in.
    #[must_use]
    pub fn month_start(&self) -> Option<NaiveDate> {
        parse_month(&self.month)
    }
}

/// Parses a `YYYY-MM` month into its first day.
#[must_use]
pub fn parse_month(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok()
}

/// An anonymised incident location snapped to a nearby map point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentLocation {
    #[serde(deserialize_with = "decimal")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal")]
    pub longitude: f64,
    pub street: Street,
}

/// The street an incident location is snapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    pub id: u64,
    /// Description such as `"On or near Parking Area"`.
    pub name: String,
}

/// Outcome recorded against an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeStatus {
    pub category: String,
    /// Month of the outcome, as `YYYY-MM`.
    pub date: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Text(String),
    Number(f64),
}

/// Accepts a coordinate component as either a JSON number or a decimal
/// string.
fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Decimal::deserialize(deserializer)? {
        Decimal::Number(v) => Ok(v),
        Decimal::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid decimal {s:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "category": "theft-from-the-person",
            "location_type": "Force",
            "location": {
                "latitude": "51.500617",
                "street": { "id": 1_738_842, "name": "On or near Cathedral Place" },
                "longitude": "-0.141234"
            },
            "context": "",
            "outcome_status": {
                "category": "Investigation complete; no suspect identified",
                "date": "2024-07"
            },
            "persistent_id": "a1b2c3",
            "id": 120_000_001,
            "location_subtype": "",
            "month": "2024-07"
        })
    }

    #[test]
    fn parses_police_record() {
        let incident: Incident = serde_json::from_value(sample()).unwrap();
        assert_eq!(incident.id, 120_000_001);
        assert_eq!(incident.category, CrimeCategory::TheftFromThePerson.as_ref());
        assert!((incident.location.latitude - 51.500_617).abs() < 1e-9);
        assert!((incident.location.longitude - -0.141_234).abs() < 1e-9);
        assert_eq!(incident.location.street.name, "On or near Cathedral Place");
        assert_eq!(
            incident.month_start(),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        assert!(incident.coordinate().is_ok());
    }

    #[test]
    fn parses_null_outcome_and_missing_optionals() {
        let mut value = sample();
        value["outcome_status"] = serde_json::Value::Null;
        value.as_object_mut().unwrap().remove("context");
        value.as_object_mut().unwrap().remove("location_subtype");
        let incident: Incident = serde_json::from_value(value).unwrap();
        assert!(incident.outcome_status.is_none());
        assert!(incident.context.is_none());
    }

    #[test]
    fn rejects_garbled_coordinate() {
        let mut value = sample();
        value["location"]["latitude"] = serde_json::json!("north-ish");
        assert!(serde_json::from_value::<Incident>(value).is_err());
    }

    #[test]
    fn out_of_range_coordinate_is_reported() {
        let mut value = sample();
        value["location"]["latitude"] = serde_json::json!("151.5");
        let incident: Incident = serde_json::from_value(value).unwrap();
        assert!(incident.coordinate().is_err());
    }

    #[test]
    fn category_slugs_round_trip() {
        for cat in CrimeCategory::all() {
            let slug = cat.to_string();
            assert_eq!(slug.parse::<CrimeCategory>().unwrap(), *cat);
        }
        assert_eq!(
            CrimeCategory::default().to_string(),
            "theft-from-the-person"
        );
        assert_eq!(
            CrimeCategory::CriminalDamageArson.as_ref(),
            "criminal-damage-arson"
        );
    }

    #[test]
    fn parse_month_rejects_garbage() {
        assert!(parse_month("2024-13").is_none());
        assert!(parse_month("July").is_none());
    }
}
