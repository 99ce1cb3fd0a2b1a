//! Device-reported location.
//!
//! The position itself comes from whatever the presentation layer has
//! access to (a browser geolocation prompt, a GPS fix, command-line
//! arguments). This module only defines the seam and two trivial
//! implementations.

use async_trait::async_trait;

use crate::{Coordinate, LocationError};

/// A source of the device's current position.
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// Returns the device's current position.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::LocationUnavailable`] if the user declined
    /// or the position could not be determined.
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// A locator that always reports the same, already-known position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl DeviceLocator for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A locator for environments with no positioning at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeviceLocation;

#[async_trait]
impl DeviceLocator for NoDeviceLocation {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::LocationUnavailable {
            message: "no device location provider is available".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_location_reports_its_coordinate() {
        let c = Coordinate::new(51.513, -0.131).unwrap();
        assert_eq!(FixedLocation(c).current_position().await.unwrap(), c);
    }

    #[tokio::test]
    async fn no_device_location_is_unavailable() {
        assert!(matches!(
            NoDeviceLocation.current_position().await,
            Err(LocationError::LocationUnavailable { .. })
        ));
    }
}
