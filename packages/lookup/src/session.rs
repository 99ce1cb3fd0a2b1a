//! Running lookups and publishing their state.
//!
//! Every [`LookupSession::submit`] call takes the next sequence token from
//! a monotonically increasing counter. A state write is accepted only if
//! its token is still the latest one issued, and that check happens under
//! the same lock as the write. A submission that has been overtaken also
//! stops before making its next request.
//!
//! The net effect: whatever order responses arrive in, the visible state
//! always belongs to the most recent submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use phone_safe_config::Settings;
use phone_safe_crime::{IncidentSource, PoliceUkClient};
use phone_safe_location::device::{DeviceLocator, NoDeviceLocation};
use phone_safe_location::postcodes_io::PostcodesIoClient;
use phone_safe_location::{LocationError, PostcodeGeocoder};
use phone_safe_location_models::Coordinate;
use phone_safe_risk::RiskEvaluator;
use tokio::sync::watch;

use crate::{LookupError, LookupResult, LookupSnapshot, LookupState, Submission};

/// Default bound on waiting for a device position.
const DEFAULT_DEVICE_TIMEOUT: Duration = Duration::from_secs(10);

/// How a call to [`LookupSession::submit`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// This submission ran to the end and its final state was published.
    Completed(LookupState),
    /// A newer submission started first; nothing from this one is visible.
    Superseded,
}

/// Runs lookups and holds the single "current state" slot the
/// presentation layer reads.
pub struct LookupSession {
    geocoder: Arc<dyn PostcodeGeocoder>,
    incidents: Arc<dyn IncidentSource>,
    locator: Arc<dyn DeviceLocator>,
    evaluator: RiskEvaluator,
    device_timeout: Duration,
    latest: AtomicU64,
    slot: watch::Sender<LookupSnapshot>,
}

impl LookupSession {
    /// Creates a session with no device location support.
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn PostcodeGeocoder>,
        incidents: Arc<dyn IncidentSource>,
        evaluator: RiskEvaluator,
    ) -> Self {
        let (slot, _) = watch::channel(LookupSnapshot::default());
        Self {
            geocoder,
            incidents,
            locator: Arc::new(NoDeviceLocation),
            evaluator,
            device_timeout: DEFAULT_DEVICE_TIMEOUT,
            latest: AtomicU64::new(0),
            slot,
        }
    }

    /// Creates a session talking to the configured postcodes.io and
    /// police.uk endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`phone_safe_http::HttpError`] if the HTTP client cannot be
    /// built.
    pub fn from_settings(settings: &Settings) -> Result<Self, phone_safe_http::HttpError> {
        let client =
            phone_safe_http::build_client(settings.http.timeout(), &settings.http.user_agent)?;

        let geocoder = PostcodesIoClient::new(client.clone(), &settings.postcodes.base_url);
        let incidents =
            PoliceUkClient::new(client, &settings.police.base_url, settings.police.category);
        let evaluator =
            RiskEvaluator::new(settings.reference_area.clone(), settings.risk.scheme);

        Ok(Self::new(Arc::new(geocoder), Arc::new(incidents), evaluator)
            .with_device_timeout(settings.http.timeout()))
    }

    /// Uses `locator` for [`Submission::DeviceLocation`].
    #[must_use]
    pub fn with_device_locator(mut self, locator: Arc<dyn DeviceLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Bounds how long to wait for the device position.
    #[must_use]
    pub const fn with_device_timeout(mut self, timeout: Duration) -> Self {
        self.device_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    /// The currently visible state.
    #[must_use]
    pub fn current(&self) -> LookupState {
        self.slot.borrow().state.clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LookupSnapshot> {
        self.slot.subscribe()
    }

    /// Starts a new lookup and runs it to the end.
    ///
    /// Any lookup still in flight is overtaken: whatever it produces from
    /// now on is discarded.
    pub async fn submit(&self, submission: Submission) -> LookupOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("lookup #{token}: {submission:?}");

        if !self.publish(token, LookupState::Resolving) {
            return LookupOutcome::Superseded;
        }

        let state = match self.run(token, submission).await {
            Ok(Some(result)) => {
                log::info!(
                    "lookup #{token}: {} incident(s), risk {}",
                    result.incident_count(),
                    result.label()
                );
                LookupState::Ready(Arc::new(result))
            }
            Ok(None) => {
                log::debug!("lookup #{token}: superseded mid-flight");
                return LookupOutcome::Superseded;
            }
            Err(e) => {
                log::warn!("lookup #{token} failed: {e}");
                LookupState::Error(e)
            }
        };

        if self.publish(token, state.clone()) {
            LookupOutcome::Completed(state)
        } else {
            log::warn!("lookup #{token}: result discarded, a newer lookup started");
            LookupOutcome::Superseded
        }
    }

    /// Returns `Ok(None)` as soon as a newer submission is noticed.
    async fn run(
        &self,
        token: u64,
        submission: Submission,
    ) -> Result<Option<LookupResult>, LookupError> {
        let resolved = match submission {
            Submission::Postcode(input) => {
                phone_safe_location::lookup_postcode(self.geocoder.as_ref(), &input)
                    .await
                    .map(|r| Some((r.coordinate, Some(r.postcode))))?
            }
            Submission::DeviceLocation => self.resolve_device(token).await?,
        };
        let Some((coordinate, postcode)) = resolved else {
            return Ok(None);
        };

        let fetching = LookupState::FetchingIncidents {
            coordinate,
            postcode: postcode.clone(),
        };
        if !self.publish(token, fetching) {
            return Ok(None);
        }

        let incidents = self.incidents.fetch_incidents(coordinate).await?;
        let assessment = self.evaluator.assess(incidents.len() as u64);

        Ok(Some(LookupResult {
            coordinate,
            postcode,
            incidents,
            assessment,
        }))
    }

    /// Reads the device position, then reverse geocodes it for display.
    async fn resolve_device(
        &self,
        token: u64,
    ) -> Result<Option<(Coordinate, Option<String>)>, LocationError> {
        let coordinate = tokio::time::timeout(self.device_timeout, self.locator.current_position())
            .await
            .map_err(|_| LocationError::LocationUnavailable {
                message: format!("no position within {:?}", self.device_timeout),
            })??;

        if !self.is_current(token) {
            return Ok(None);
        }

        let postcode = self.geocoder.resolve_from_coordinate(coordinate).await?;
        Ok(Some((coordinate, Some(postcode))))
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Writes `state` if `token` is still the latest submission.
    fn publish(&self, token: u64, state: LookupState) -> bool {
        self.slot.send_if_modified(|snapshot| {
            if !self.is_current(token) {
                return false;
            }
            *snapshot = LookupSnapshot { token, state };
            true
        })
    }
}
