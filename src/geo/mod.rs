//! Geographic primitives: coordinates, great-circle distance, and
//! distance display formatting.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers (WGS84 approximate).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Meters in one tenth of a mile (528 ft), the metric/imperial display switch.
const TENTH_MILE_METERS: f64 = 160.934;

/// Meters per mile.
const MILE_METERS: f64 = 1609.34;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate from degrees.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether the coordinate lies in the valid WGS84 range.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to another coordinate in meters.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        haversine_distance_m(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle distance between two points in kilometers. Arguments in degrees.
pub fn haversine_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in meters. Arguments in degrees.
pub fn haversine_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance_km(lat1, lng1, lat2, lng2) * 1000.0
}

/// Format a distance for display: meters below a tenth of a mile, miles above.
///
/// Internal computation elsewhere is always in meters; this is display only.
pub fn format_distance(meters: f64) -> String {
    if meters < TENTH_MILE_METERS {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} mi", meters / MILE_METERS)
    }
}
