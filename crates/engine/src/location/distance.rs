//! Great-circle distance to reference points.

use listings_core::{Coordinates, ReferencePoint, buckets};
use serde::Serialize;

const EARTH_RADIUS_MILES: f64 = 3_958.8;

/// Haversine distance between two points, in statute miles.
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Where a listing sits relative to the reference points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub bucket: &'static str,
    /// Miles to the primary reference point.
    pub miles: Option<f64>,
    pub reference_point: String,
    pub nearest_city: Option<String>,
    pub nearest_miles: Option<f64>,
}

impl DistanceReport {
    /// Report for a listing without coordinates.
    pub fn unknown(reference: &ReferencePoint) -> Self {
        Self {
            bucket: buckets::UNKNOWN_DISTANCE,
            miles: None,
            reference_point: reference.name.clone(),
            nearest_city: None,
            nearest_miles: None,
        }
    }

    /// Measure `point` against the primary reference and find the nearest of `all`.
    pub fn measure(point: Coordinates, primary: &ReferencePoint, all: &[ReferencePoint]) -> Self {
        let miles = round_tenth(haversine_miles(point, primary.coordinates()));
        let nearest = all
            .iter()
            .map(|r| (r, haversine_miles(point, r.coordinates())))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        Self {
            bucket: buckets::distance_bucket(Some(miles)),
            miles: Some(miles),
            reference_point: primary.name.clone(),
            nearest_city: nearest.map(|(r, _)| r.name.clone()),
            nearest_miles: nearest.map(|(_, m)| round_tenth(m)),
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
