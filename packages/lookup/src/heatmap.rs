//! Heatmap payload for map renderers.
//!
//! [`HeatmapLayer`] holds the map centre, a `GeoJSON` point per incident,
//! and the paint settings the renderer should apply. The renderer itself
//! (tiles, colours, interaction) lives in the presentation layer.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use phone_safe_location_models::Coordinate;
use serde::Serialize;

use crate::LookupResult;

/// Heatmap paint settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapStyle {
    /// Initial map zoom level.
    pub zoom: f64,
    /// Per-point weight.
    pub weight: f64,
    pub intensity: f64,
    /// Influence radius of each point, in pixels.
    pub radius: f64,
    pub opacity: f64,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            zoom: 13.0,
            weight: 1.0,
            intensity: 0.6,
            radius: 40.0,
            opacity: 0.7,
        }
    }
}

/// Everything a renderer needs to draw one lookup's heatmap.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapLayer {
    pub center: Coordinate,
    /// One `Point` feature per incident, `[longitude, latitude]`.
    pub points: FeatureCollection,
    pub style: HeatmapStyle,
}

impl HeatmapLayer {
    /// Builds the layer for a finished lookup.
    ///
    /// Incidents with an out-of-range location are left off the map; they
    /// still count towards the risk label.
    #[must_use]
    pub fn from_result(result: &LookupResult) -> Self {
        let features = result
            .incidents
            .iter()
            .filter_map(|incident| match incident.coordinate() {
                Ok(c) => Some(point(c)),
                Err(e) => {
                    log::warn!("incident {} left off heatmap: {e}", incident.id);
                    None
                }
            })
            .collect();

        Self {
            center: result.coordinate,
            points: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
            style: HeatmapStyle::default(),
        }
    }
}

fn point(c: Coordinate) -> Feature {
    Feature::from(Geometry::new(Value::Point(vec![c.longitude(), c.latitude()])))
}
