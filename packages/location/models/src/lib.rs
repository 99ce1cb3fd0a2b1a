#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate and postcode types shared by the phone-safe lookup pipeline.
//!
//! A [`Coordinate`] can only be built through [`Coordinate::new`], which
//! enforces WGS84 bounds, so every coordinate flowing between the
//! resolver, the crime client and the map payload is known to be valid.

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating that both components are finite and
    /// in range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if latitude is outside `[-90, 90]`
    /// or longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

/// Error returned when a latitude or longitude is out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidCoordinateError {
    /// Latitude outside `[-90, 90]` or not finite.
    Latitude(f64),
    /// Longitude outside `[-180, 180]` or not finite.
    Longitude(f64),
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latitude(v) => write!(f, "invalid latitude {v}: expected -90 to 90"),
            Self::Longitude(v) => write!(f, "invalid longitude {v}: expected -180 to 180"),
        }
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// A postcode as normalised by the geocoder, together with its centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPostcode {
    /// Canonical postcode text (e.g. `"SW1A 1AA"`).
    pub postcode: String,
    /// Postcode centroid.
    pub coordinate: Coordinate,
}

/// Trims user-supplied postcode text.
///
/// Returns `None` when nothing but whitespace was entered. Anything else is
/// passed through untouched; the geocoder decides whether it is a real
/// postcode.
#[must_use]
pub fn normalize_query(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
