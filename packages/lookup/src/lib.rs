#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Lookup state machine for phone-safe.
//!
//! A lookup takes a [`Submission`] (a typed postcode or the device's
//! location) through
//!
//! ```text
//! Idle -> Resolving -> FetchingIncidents -> Ready
//!              \               \
//!               `-> Error       `-> Error
//! ```
//!
//! and publishes each [`LookupState`] through a [`LookupSession`]. A new
//! submission may start at any time; results from older submissions that
//! finish late are discarded, see [`session`].
//!
//! [`heatmap::HeatmapLayer`] packages a finished lookup for a map renderer.

pub mod heatmap;
pub mod session;
pub mod state;

use phone_safe_crime::CrimeDataError;
use phone_safe_location::{LocationError, PostcodeFailure};

pub use session::{LookupOutcome, LookupSession};
pub use state::{LookupResult, LookupSnapshot, LookupState};

/// What the user asked to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Free text the user typed as a postcode.
    Postcode(String),
    /// Use the device's current position.
    DeviceLocation,
}

/// Why a lookup ended in [`LookupState::Error`].
///
/// Each variant carries enough detail to tell causes apart in logs and
/// tests, while [`LookupError::user_message`] collapses them to the one
/// message per category shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Blank, unknown or unresolvable postcode. Also covers network
    /// failures during the postcode lookup.
    #[error("Invalid postcode: {reason}")]
    InvalidPostcode {
        /// What went wrong.
        reason: PostcodeFailure,
    },

    /// Reverse geocoding the device position failed.
    #[error("Postcode lookup failed: {message}")]
    PostcodeLookup {
        /// Description of the failure.
        message: String,
    },

    /// The crime API request failed or returned unusable data.
    #[error("Crime data fetch failed: {message}")]
    CrimeDataFetch {
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

impl LookupError {
    /// The message to show the user for this error.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidPostcode {
                reason: PostcodeFailure::Empty,
            } => "Please enter a postcode.",
            Self::InvalidPostcode { .. } => "Please enter a valid postcode",
            Self::PostcodeLookup { .. } => "Failed to fetch postcode",
            Self::CrimeDataFetch { .. } => "Failed to fetch crime data",
            Self::LocationUnavailable { .. } => {
                "Failed to get your location. Please enter a postcode."
            }
        }
    }
}

impl From<LocationError> for LookupError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::InvalidPostcode { reason } => Self::InvalidPostcode { reason },
            LocationError::PostcodeLookup { message } => Self::PostcodeLookup { message },
            LocationError::LocationUnavailable { message } => {
                Self::LocationUnavailable { message }
            }
        }
    }
}

impl From<CrimeDataError> for LookupError {
    fn from(e: CrimeDataError) -> Self {
        Self::CrimeDataFetch {
            message: e.to_string(),
        }
    }
}
