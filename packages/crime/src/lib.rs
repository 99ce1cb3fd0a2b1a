#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! police.uk street-level crime client.
//!
//! Fetches every incident of one category recorded within a one mile
//! radius of a coordinate, for the latest month police.uk has published.
//! Only `lat` and `lng` are sent; the month window is chosen upstream.
//!
//! A fetch is all-or-nothing: if any record in the response cannot be
//! parsed the whole fetch fails rather than returning a partial list.
//!
//! See <https://data.police.uk/docs/method/crime-street/>

use async_trait::async_trait;
use phone_safe_crime_models::{CrimeCategory, Incident};
use phone_safe_location_models::Coordinate;

/// Errors from fetching incidents.
#[derive(Debug, thiserror::Error)]
pub enum CrimeDataError {
    /// The request failed, timed out, or the body was not JSON.
    #[error(transparent)]
    Http(#[from] phone_safe_http::HttpError),

    /// The upstream answered with a non-success status.
    #[error("police.uk returned status {status}")]
    Status {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
    },

    /// The body was JSON but not a list of incident records.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can list incidents near a coordinate.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns every incident of the configured category near `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`CrimeDataError`] if the incidents cannot be fetched or
    /// parsed.
    async fn fetch_incidents(&self, coordinate: Coordinate)
    -> Result<Vec<Incident>, CrimeDataError>;
}

/// [`IncidentSource`] backed by the public police.uk API.
#[derive(Debug, Clone)]
pub struct PoliceUkClient {
    client: reqwest::Client,
    base_url: String,
    category: CrimeCategory,
}

impl PoliceUkClient {
    /// Creates a client for `base_url` (e.g. `"https://data.police.uk/api"`).
    ///
    /// The timeout configured on `client` bounds every fetch.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, category: CrimeCategory) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            category,
        }
    }

    fn url(&self) -> String {
        format!("{}/crimes-street/{}", self.base_url, self.category)
    }
}

#[async_trait]
impl IncidentSource for PoliceUkClient {
    async fn fetch_incidents(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<Incident>, CrimeDataError> {
        let lat = coordinate.latitude().to_string();
        let lng = coordinate.longitude().to_string();

        let response = phone_safe_http::get_json(
            self.client
                .get(self.url())
                .query(&[("lat", lat.as_str()), ("lng", lng.as_str())]),
        )
        .await?;

        if !response.status.is_success() {
            return Err(CrimeDataError::Status {
                status: response.status,
            });
        }

        let incidents = parse_incidents(response.body)?;
        log::info!(
            "police.uk: {} {} incident(s) near {coordinate}",
            incidents.len(),
            self.category
        );
        Ok(incidents)
    }
}

/// Parses a `crimes-street` response body.
///
/// # Errors
///
/// Returns [`CrimeDataError::Parse`] if the body is not an array of
/// incident records.
pub fn parse_incidents(body: serde_json::Value) -> Result<Vec<Incident>, CrimeDataError> {
    Ok(serde_json::from_value(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, lat: &str, lng: &str) -> serde_json::Value {
        serde_json::json!({
            "category": "theft-from-the-person",
            "location_type": "Force",
            "location": {
                "latitude": lat,
                "street": { "id": 1, "name": "On or near Petrol Station" },
                "longitude": lng
            },
            "context": "",
            "outcome_status": null,
            "persistent_id": "",
            "id": id,
            "location_subtype": "",
            "month": "2024-07"
        })
    }

    #[test]
    fn parses_incident_list() {
        let body = serde_json::json!([
            record(1, "51.5010", "-0.1410"),
            record(2, "51.5020", "-0.1420"),
        ]);
        let incidents = parse_incidents(body).unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[1].id, 2);
    }

    #[test]
    fn parses_empty_list() {
        assert!(parse_incidents(serde_json::json!([])).unwrap().is_empty());
    }

    #[test]
    fn one_bad_record_fails_whole_fetch() {
        let body = serde_json::json!([
            record(1, "51.5010", "-0.1410"),
            { "id": 2, "category": "theft-from-the-person" },
        ]);
        assert!(matches!(
            parse_incidents(body),
            Err(CrimeDataError::Parse(_))
        ));
    }

    #[test]
    fn non_array_body_fails() {
        let body = serde_json::json!({ "error": "too many crimes" });
        assert!(parse_incidents(body).is_err());
    }

    #[test]
    fn builds_category_url() {
        let client = PoliceUkClient::new(
            reqwest::Client::new(),
            "https://data.police.uk/api/",
            CrimeCategory::TheftFromThePerson,
        );
        assert_eq!(
            client.url(),
            "https://data.police.uk/api/crimes-street/theft-from-the-person"
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_is_http_error() {
        let client = PoliceUkClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            CrimeCategory::TheftFromThePerson,
        );
        let coordinate = Coordinate::new(51.501, -0.141).unwrap();
        let err = client.fetch_incidents(coordinate).await.unwrap_err();
        assert!(matches!(err, CrimeDataError::Http(_)));
    }
}
