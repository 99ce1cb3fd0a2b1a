//! Rendering a finished lookup.

use chrono::NaiveDate;
use phone_safe_location_models::Coordinate;
use phone_safe_lookup::LookupResult;
use phone_safe_lookup::heatmap::HeatmapLayer;
use phone_safe_risk::{RiskEvaluator, RiskLabel, RiskScheme};
use serde::Serialize;

/// Machine-readable lookup summary printed by `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary<'a> {
    postcode: Option<&'a str>,
    coordinate: Coordinate,
    incident_count: u64,
    latest_month: Option<String>,
    label: RiskLabel,
    ratio: f64,
    scheme: RiskScheme,
    reference_name: &'a str,
    reference_postcode: &'a str,
    reference_period: &'a str,
    reference_count: u32,
    heatmap: &'a HeatmapLayer,
}

impl<'a> Summary<'a> {
    pub fn new(
        result: &'a LookupResult,
        evaluator: &'a RiskEvaluator,
        heatmap: &'a HeatmapLayer,
    ) -> Self {
        let reference = evaluator.reference();
        Self {
            postcode: result.postcode.as_deref(),
            coordinate: result.coordinate,
            incident_count: result.incident_count(),
            latest_month: result.latest_month().map(format_month),
            label: result.label(),
            ratio: result.assessment.ratio,
            scheme: evaluator.scheme(),
            reference_name: &reference.name,
            reference_postcode: &reference.postcode,
            reference_period: &reference.period,
            reference_count: reference.incident_count.get(),
            heatmap,
        }
    }
}

/// Prints a short human-readable summary to stdout.
pub fn print(result: &LookupResult, evaluator: &RiskEvaluator) {
    let reference = evaluator.reference();

    if let Some(postcode) = &result.postcode {
        println!("Postcode:   {postcode}");
    }
    println!("Location:   {}", result.coordinate);

    let month = result
        .latest_month()
        .map_or_else(String::new, |m| format!(" (latest month {})", format_month(m)));
    println!(
        "Incidents:  {} phone theft report(s) within a mile{month}",
        result.incident_count()
    );
    println!(
        "Reference:  {} ({}), {} report(s) in {}",
        reference.name, reference.postcode, reference.incident_count, reference.period
    );
    println!();
    println!(
        "Risk:       {} ({:.0}% of {})",
        result.label(),
        result.assessment.ratio * 100.0,
        result.assessment.reference_name
    );
}

fn format_month(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}
