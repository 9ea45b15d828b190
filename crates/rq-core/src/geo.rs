//! Coordinate geometry on real-world latitude/longitude pairs.
//!
//! Two Earth radius constants are in use and they are not interchangeable:
//! the mean radius for haversine distances, and the equatorial radius for
//! generating patrol circles (matching the projection the route provider
//! works in). Keep both.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used for great-circle distances.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// Equatorial Earth radius in meters, used for circle-point generation.
pub const EARTH_EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl LatLng {
    /// Create a new coordinate.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Haversine great-circle distance between two points, in meters.
pub fn distance_meters(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_MEAN_RADIUS_M * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Generate `n` points evenly spaced on a circle of `radius_meters` around
/// `center`.
///
/// The longitude delta is stretched by `1 / cos(lat)` to offset projection
/// distortion away from the equator. These points are handed to a route
/// provider as waypoints for a patrol loop.
pub fn circle_points(center: LatLng, radius_meters: f64, n: usize) -> Vec<LatLng> {
    let rad = radius_meters / EARTH_EQUATORIAL_RADIUS_M;
    let lat_cos = center.lat.to_radians().cos();

    (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            let d_lat = rad * theta.cos();
            let d_lng = rad * theta.sin() / lat_cos;
            LatLng::new(center.lat + d_lat.to_degrees(), center.lng + d_lng.to_degrees())
        })
        .collect()
}

/// Move `step_meters` from `from` along the normalized bearing toward `to`.
///
/// Works in a local tangent plane: deltas are converted to meters, the
/// bearing vector is normalized, and the step is converted back to degree
/// deltas. If the remaining distance is shorter than the step, lands exactly
/// on `to`.
pub fn step_toward(from: LatLng, to: LatLng, step_meters: f64) -> LatLng {
    let lat_cos = from.lat.to_radians().cos();
    let dy = (to.lat - from.lat).to_radians() * EARTH_MEAN_RADIUS_M;
    let dx = (to.lng - from.lng).to_radians() * EARTH_MEAN_RADIUS_M * lat_cos;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= step_meters || len == 0.0 {
        return to;
    }
    let scale = step_meters / len;
    offset_meters(from, dx * scale, dy * scale)
}

/// Offset a point by `east_meters` and `north_meters` in the local tangent
/// plane.
pub fn offset_meters(origin: LatLng, east_meters: f64, north_meters: f64) -> LatLng {
    let lat_cos = origin.lat.to_radians().cos();
    let d_lat = (north_meters / EARTH_MEAN_RADIUS_M).to_degrees();
    let d_lng = (east_meters / (EARTH_MEAN_RADIUS_M * lat_cos)).to_degrees();
    LatLng::new(origin.lat + d_lat, origin.lng + d_lng)
}
