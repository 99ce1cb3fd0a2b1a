#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared HTTP plumbing for the upstream services.
//!
//! Every upstream client builds its [`reqwest::Client`] through
//! [`build_client`] so that each request is bounded by the configured
//! timeout, and sends requests through [`get_json`] so that body-decode
//! failures are logged with a preview of what actually came back.
//!
//! Requests are sent exactly **once**. There is no retry loop: a failure
//! ends the current lookup and the user decides whether to try again.
//!
//! # Usage
//!
//! ```ignore
//! let client = phone_safe_http::build_client(Duration::from_secs(10), "phone-safe")?;
//! let response = phone_safe_http::get_json(client.get(&url)).await?;
//! if response.status.is_success() { /* ... */ }
//! ```

use std::time::Duration;

pub use reqwest::StatusCode;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Errors from sending a request or decoding its body.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request could not be sent, timed out, or the body could not be
    /// read.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was received but is not valid JSON.
    #[error("JSON parse failed (status={status}, received {received} bytes): {source}")]
    Json {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Number of bytes received.
        received: usize,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// A decoded JSON response along with its HTTP status.
///
/// Non-success statuses are returned rather than turned into errors
/// because some upstreams (postcodes.io) describe failures in a JSON body
/// that callers want to inspect.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    /// HTTP status of the response.
    pub status: reqwest::StatusCode,
    /// Parsed body.
    pub body: serde_json::Value,
}

/// Builds a [`reqwest::Client`] with a per-request timeout and user agent.
///
/// # Errors
///
/// Returns [`HttpError`] if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, HttpError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(user_agent)
        .build()?)
}

/// Sends a request once and parses the response body as JSON.
///
/// The body is read as text first so that a parse failure can be logged
/// with the content that was actually received.
///
/// # Errors
///
/// Returns [`HttpError::Request`] if the request fails, times out, or the
/// body cannot be read, and [`HttpError::Json`] if the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn get_json(request: reqwest::RequestBuilder) -> Result<JsonResponse, HttpError> {
    let response = request.send().await.inspect_err(|e| {
        log::warn!("request failed: {e}");
    })?;

    let url = response.url().to_string();
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    log::debug!("GET {url} -> {status}");

    let text = response.text().await.inspect_err(|e| {
        log::warn!("response body read failed\n  url: {url}\n  status: {status}\n  error: {e}");
    })?;

    parse_body(&url, status, content_type.as_deref(), &text)
}

/// Parses a received body, logging a preview when it is not JSON.
fn parse_body(
    url: &str,
    status: reqwest::StatusCode,
    content_type: Option<&str>,
    text: &str,
) -> Result<JsonResponse, HttpError> {
    match serde_json::from_str(text) {
        Ok(body) => Ok(JsonResponse { status, body }),
        Err(source) => {
            log::warn!(
                "JSON parse failed\n  \
                 url: {url}\n  \
                 status: {status}\n  \
                 content-type: {content_type:?}\n  \
                 received: {} bytes\n  \
                 parse error: {source}\n  \
                 body preview: {}",
                text.len(),
                preview(text),
            );
            Err(HttpError::Json {
                status,
                received: text.len(),
                source,
            })
        }
    }
}

/// Truncates `text` to [`BODY_PREVIEW_LEN`] bytes on a char boundary.
fn preview(text: &str) -> String {
    if text.len() <= BODY_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
