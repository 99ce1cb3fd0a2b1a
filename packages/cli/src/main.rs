#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for phone-theft risk lookups.
//!
//! Looks up a postcode (or a position given on the command line, treated
//! as the device's own) and prints how its phone-theft count compares to
//! the reference area. Run with no arguments for an interactive prompt.

mod interactive;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use phone_safe_config::Settings;
use phone_safe_location::device::FixedLocation;
use phone_safe_location_models::Coordinate;
use phone_safe_lookup::heatmap::HeatmapLayer;
use phone_safe_lookup::{LookupOutcome, LookupSession, LookupState, Submission};

#[derive(Parser)]
#[command(
    name = "phone_safe",
    about = "Phone-theft risk for a UK postcode or position"
)]
struct Cli {
    /// UK postcode to look up (e.g. "SW1A 1AA")
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    postcode: Option<String>,
    /// Latitude of the current position
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude of the current position
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
    /// Print the result and heatmap as JSON instead of a summary
    #[arg(long)]
    json: bool,
    /// Write the incident heatmap as `GeoJSON` to this file
    #[arg(long)]
    heatmap: Option<PathBuf>,
}

/// A submission plus, for position lookups, the position to report.
struct Request {
    submission: Submission,
    position: Option<Coordinate>,
}

impl Request {
    #[must_use]
    const fn postcode(text: String) -> Self {
        Self {
            submission: Submission::Postcode(text),
            position: None,
        }
    }

    #[must_use]
    const fn position(coordinate: Coordinate) -> Self {
        Self {
            submission: Submission::DeviceLocation,
            position: Some(coordinate),
        }
    }
}

impl Cli {
    fn request(&self) -> Result<Option<Request>, Box<dyn std::error::Error>> {
        if let Some(postcode) = &self.postcode {
            return Ok(Some(Request::postcode(postcode.clone())));
        }
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            return Ok(Some(Request::position(Coordinate::new(lat, lng)?)));
        }
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let request = match cli.request()? {
        Some(request) => request,
        None => interactive::prompt()?,
    };

    let settings = Settings::load()?;
    let mut session = LookupSession::from_settings(&settings)?;
    if let Some(coordinate) = request.position {
        session = session.with_device_locator(Arc::new(FixedLocation(coordinate)));
    }

    let state = match session.submit(request.submission).await {
        LookupOutcome::Completed(state) => state,
        LookupOutcome::Superseded => session.current(),
    };

    match state {
        LookupState::Ready(result) => {
            let layer = HeatmapLayer::from_result(&result);

            if let Some(path) = &cli.heatmap {
                std::fs::write(path, serde_json::to_string_pretty(&layer.points)?)?;
                log::info!("wrote heatmap to {}", path.display());
            }

            if cli.json {
                let summary = report::Summary::new(&result, session.evaluator(), &layer);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                report::print(&result, session.evaluator());
            }
            Ok(ExitCode::SUCCESS)
        }
        LookupState::Error(e) => {
            log::debug!("lookup failed: {e}");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
        other => Err(format!("lookup stopped in state {other:?}").into()),
    }
}
