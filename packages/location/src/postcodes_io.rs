//! postcodes.io geocoder client.
//!
//! - Forward: `GET /postcodes/{postcode}`
//! - Reverse: `GET /postcodes?lon={lng}&lat={lat}`
//!
//! postcodes.io reports its own `status` in every JSON body, including
//! 404s, so the body is parsed regardless of the HTTP status and the
//! body's `status` decides success.
//!
//! See <https://postcodes.io/docs>

use async_trait::async_trait;

use crate::{
    Coordinate, LocationError, PostcodeFailure, PostcodeGeocoder, ResolvedPostcode,
};

/// [`PostcodeGeocoder`] backed by postcodes.io.
#[derive(Debug, Clone)]
pub struct PostcodesIoClient {
    client: reqwest::Client,
    base_url: String,
}

impl PostcodesIoClient {
    /// Creates a client for `base_url` (e.g. `"https://api.postcodes.io"`).
    ///
    /// The timeout configured on `client` bounds every lookup.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds `{base}/postcodes/{postcode}` with the postcode
    /// percent-encoded as a single path segment.
    fn lookup_url(&self, postcode: &str) -> Result<reqwest::Url, String> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|()| format!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(["postcodes", postcode]);
        Ok(url)
    }
}

#[async_trait]
impl PostcodeGeocoder for PostcodesIoClient {
    async fn lookup_postcode(&self, postcode: &str) -> Result<ResolvedPostcode, LocationError> {
        let url = self
            .lookup_url(postcode)
            .map_err(|e| LocationError::invalid_postcode(PostcodeFailure::Request(e)))?;

        let response = phone_safe_http::get_json(self.client.get(url))
            .await
            .map_err(|e| {
                log::warn!("postcodes.io lookup for {postcode:?} failed: {e}");
                LocationError::invalid_postcode(PostcodeFailure::Request(e.to_string()))
            })?;

        parse_lookup_response(&response.body)
    }

    async fn resolve_from_coordinate(
        &self,
        coordinate: Coordinate,
    ) -> Result<String, LocationError> {
        let lon = coordinate.longitude().to_string();
        let lat = coordinate.latitude().to_string();

        let response = phone_safe_http::get_json(
            self.client
                .get(format!("{}/postcodes", self.base_url))
                .query(&[("lon", lon.as_str()), ("lat", lat.as_str())]),
        )
        .await
        .map_err(|e| {
            log::warn!("postcodes.io reverse lookup at {coordinate} failed: {e}");
            LocationError::PostcodeLookup {
                message: e.to_string(),
            }
        })?;

        parse_reverse_response(&response.body)
    }
}

/// Parses a forward lookup body.
fn parse_lookup_response(body: &serde_json::Value) -> Result<ResolvedPostcode, LocationError> {
    let status = body_status(body);
    if status != Some(200) {
        return Err(LocationError::invalid_postcode(PostcodeFailure::NotFound {
            status: status.unwrap_or_default(),
            message: body["error"].as_str().map(String::from),
        }));
    }

    let result = &body["result"];
    let (Some(lat), Some(lng)) = (result["latitude"].as_f64(), result["longitude"].as_f64())
    else {
        return Err(LocationError::invalid_postcode(PostcodeFailure::NoCoordinate));
    };

    let coordinate = Coordinate::new(lat, lng).map_err(|e| {
        log::warn!("postcodes.io returned an invalid coordinate: {e}");
        LocationError::invalid_postcode(PostcodeFailure::NoCoordinate)
    })?;

    let postcode = result["postcode"].as_str().ok_or_else(|| {
        LocationError::invalid_postcode(PostcodeFailure::Request(
            "response missing result.postcode".to_string(),
        ))
    })?;

    Ok(ResolvedPostcode {
        postcode: postcode.to_string(),
        coordinate,
    })
}

/// Parses a reverse lookup body, returning the nearest postcode.
fn parse_reverse_response(body: &serde_json::Value) -> Result<String, LocationError> {
    let status = body_status(body);
    if status != Some(200) {
        return Err(LocationError::PostcodeLookup {
            message: format!(
                "postcodes.io status {}",
                status.map_or_else(|| "missing".to_string(), |s| s.to_string())
            ),
        });
    }

    // `result` is null rather than an empty array when nothing is nearby.
    body["result"]
        .as_array()
        .and_then(|results| results.first())
        .and_then(|first| first["postcode"].as_str())
        .map(String::from)
        .ok_or_else(|| LocationError::PostcodeLookup {
            message: "no postcode near this location".to_string(),
        })
}

fn body_status(body: &serde_json::Value) -> Option<u16> {
    body["status"].as_u64().and_then(|s| u16::try_from(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lookup_result() {
        let body = serde_json::json!({
            "status": 200,
            "result": {
                "postcode": "SW1A 1AA",
                "longitude": -0.141_588,
                "latitude": 51.501_009,
                "admin_district": "Westminster"
            }
        });
        let resolved = parse_lookup_response(&body).unwrap();
        assert_eq!(resolved.postcode, "SW1A 1AA");
        assert!((resolved.coordinate.latitude() - 51.501).abs() < 1e-3);
        assert!((resolved.coordinate.longitude() - -0.141).abs() < 1e-3);
    }

    #[test]
    fn lookup_not_found() {
        let body = serde_json::json!({ "status": 404, "error": "Invalid postcode" });
        let err = parse_lookup_response(&body).unwrap_err();
        let LocationError::InvalidPostcode { reason } = err else {
            panic!("expected InvalidPostcode, got {err:?}");
        };
        assert_eq!(
            reason,
            PostcodeFailure::NotFound {
                status: 404,
                message: Some("Invalid postcode".to_string()),
            }
        );
    }

    #[test]
    fn lookup_without_coordinate() {
        let body = serde_json::json!({
            "status": 200,
            "result": { "postcode": "GY1 1AA", "longitude": null, "latitude": null }
        });
        assert!(matches!(
            parse_lookup_response(&body),
            Err(LocationError::InvalidPostcode {
                reason: PostcodeFailure::NoCoordinate
            })
        ));
    }

    #[test]
    fn parses_reverse_result_takes_first() {
        let body = serde_json::json!({
            "status": 200,
            "result": [
                { "postcode": "SW1A 1AA", "distance": 12.5 },
                { "postcode": "SW1A 1BA", "distance": 80.1 }
            ]
        });
        assert_eq!(parse_reverse_response(&body).unwrap(), "SW1A 1AA");
    }

    #[test]
    fn reverse_null_result_is_lookup_error() {
        let body = serde_json::json!({ "status": 200, "result": null });
        assert!(matches!(
            parse_reverse_response(&body),
            Err(LocationError::PostcodeLookup { .. })
        ));

        let body = serde_json::json!({ "status": 200, "result": [] });
        assert!(parse_reverse_response(&body).is_err());
    }

    #[test]
    fn reverse_bad_status_is_lookup_error() {
        let body = serde_json::json!({ "status": 400, "error": "Invalid longitude/latitude submitted" });
        assert!(matches!(
            parse_reverse_response(&body),
            Err(LocationError::PostcodeLookup { .. })
        ));
    }

    #[test]
    fn lookup_url_encodes_postcode() {
        let client = PostcodesIoClient::new(reqwest::Client::new(), "https://api.postcodes.io/");
        let url = client.lookup_url("SW1A 1AA").unwrap();
        assert_eq!(url.as_str(), "https://api.postcodes.io/postcodes/SW1A%201AA");

        let url = client.lookup_url("../admin").unwrap();
        assert!(url.as_str().starts_with("https://api.postcodes.io/postcodes/"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_invalid_postcode() {
        let client = PostcodesIoClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = client.lookup_postcode("SW1A 1AA").await.unwrap_err();
        assert!(matches!(
            err,
            LocationError::InvalidPostcode {
                reason: PostcodeFailure::Request(_)
            }
        ));

        let coordinate = Coordinate::new(51.501, -0.141).unwrap();
        let err = client.resolve_from_coordinate(coordinate).await.unwrap_err();
        assert!(matches!(err, LocationError::PostcodeLookup { .. }));
    }
}
