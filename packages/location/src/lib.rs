#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location resolution for phone-safe lookups.
//!
//! Turns what the user gave us into a [`Coordinate`]:
//!
//! 1. **Postcode**: forwarded to a [`PostcodeGeocoder`]
//!    ([`postcodes_io::PostcodesIoClient`] in production). The geocoder is
//!    the only authority on whether a postcode exists; locally we only
//!    reject blank input.
//! 2. **Device location**: read from a [`device::DeviceLocator`], then
//!    reverse geocoded so the result can be shown with a postcode.
//!
//! Every resolution is a single request with no retries. "Not found" and
//! "network failure" produce the same [`LocationError`]
//! variant; the `reason` is kept for logs and tests only.

pub mod device;
pub mod postcodes_io;

use async_trait::async_trait;
pub use phone_safe_location_models::{Coordinate, ResolvedPostcode, normalize_query};

/// Errors from resolving a location.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// The postcode was blank, unknown to the geocoder, or could not be
    /// looked up.
    #[error("Invalid postcode: {reason}")]
    InvalidPostcode {
        /// What went wrong.
        reason: PostcodeFailure,
    },

    /// Reverse geocoding a coordinate found no postcode or failed.
    #[error("Postcode lookup failed: {message}")]
    PostcodeLookup {
        /// Description of the failure.
        message: String,
    },

    /// The device declined or failed to report its position.
    #[error("Location unavailable: {message}")]
    LocationUnavailable {
        /// Description of the failure.
        message: String,
    },
}

impl LocationError {
    pub(crate) const fn invalid_postcode(reason: PostcodeFailure) -> Self {
        Self::InvalidPostcode { reason }
    }
}

/// Why a forward postcode lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostcodeFailure {
    /// Nothing but whitespace was entered. No request was made.
    Empty,
    /// The geocoder reported the postcode as not found or malformed.
    NotFound {
        /// Status reported by the geocoder.
        status: u16,
        /// Error text reported by the geocoder, if any.
        message: Option<String>,
    },
    /// The geocoder found the postcode but it has no usable coordinate
    /// (e.g. a terminated postcode).
    NoCoordinate,
    /// The request failed, timed out, or returned an unparseable body.
    Request(String),
}

impl std::fmt::Display for PostcodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("no postcode entered"),
            Self::NotFound {
                status,
                message: Some(message),
            } => write!(f, "{message} (status {status})"),
            Self::NotFound {
                status,
                message: None,
            } => write!(f, "not found (status {status})"),
            Self::NoCoordinate => f.write_str("postcode has no coordinate"),
            Self::Request(message) => write!(f, "request failed: {message}"),
        }
    }
}

/// A forward and reverse postcode geocoder.
#[async_trait]
pub trait PostcodeGeocoder: Send + Sync {
    /// Looks up a postcode, returning its canonical form and centroid.
    ///
    /// Implementations may assume `postcode` is already trimmed and
    /// non-empty; use [`resolve_from_postcode`] or [`lookup_postcode`]
    /// to get that check.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::InvalidPostcode`] on any failure.
    async fn lookup_postcode(&self, postcode: &str) -> Result<ResolvedPostcode, LocationError>;

    /// Finds the postcode nearest to `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::PostcodeLookup`] if nothing is found or the
    /// request fails.
    async fn resolve_from_coordinate(&self, coordinate: Coordinate)
    -> Result<String, LocationError>;
}

/// Trims `input` and looks it up, rejecting blank input before any request
/// is made.
///
/// # Errors
///
/// Returns [`LocationError::InvalidPostcode`] if `input` is blank or the
/// geocoder fails.
pub async fn lookup_postcode(
    geocoder: &dyn PostcodeGeocoder,
    input: &str,
) -> Result<ResolvedPostcode, LocationError> {
    let Some(postcode) = normalize_query(input) else {
        return Err(LocationError::invalid_postcode(PostcodeFailure::Empty));
    };
    geocoder.lookup_postcode(postcode).await
}

/// Like [`lookup_postcode`] but returns only the coordinate.
///
/// # Errors
///
/// Returns [`LocationError::InvalidPostcode`] if `input` is blank or the
/// geocoder fails.
pub async fn resolve_from_postcode(
    geocoder: &dyn PostcodeGeocoder,
    input: &str,
) -> Result<Coordinate, LocationError> {
    Ok(lookup_postcode(geocoder, input).await?.coordinate)
}
