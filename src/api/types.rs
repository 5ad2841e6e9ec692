//! Wire models for the collaborator APIs.

use serde::{Deserialize, Serialize};

/// Request body for `POST /recommendation`.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationRequest {
    /// Origin latitude in degrees
    pub lat: f64,
    /// Origin longitude in degrees
    pub lng: f64,
    /// Destination building id, empty when raw coordinates are given
    pub destination_building_id: String,
    /// Desired arrival time, ISO-8601 local
    pub arrive_by_iso: String,
    /// Assumed walking speed in m/s
    pub walking_speed_mps: f64,
    /// Safety buffer in minutes
    pub buffer_minutes: f64,
    /// Maximum number of ranked options
    pub max_options: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
}

impl RecommendationRequest {
    /// Validate value ranges before sending.
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err("lat must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err("lng must be between -180 and 180".to_string());
        }
        if !(0.1..=3.0).contains(&self.walking_speed_mps) {
            return Err("walking_speed_mps must be between 0.1 and 3.0".to_string());
        }
        if !(0.0..=60.0).contains(&self.buffer_minutes) {
            return Err("buffer_minutes must be between 0 and 60".to_string());
        }
        if !(1..=10).contains(&self.max_options) {
            return Err("max_options must be between 1 and 10".to_string());
        }
        if let (Some(lat), Some(lng)) = (self.destination_lat, self.destination_lng) {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err("destination coordinates out of range".to_string());
            }
        }
        Ok(())
    }
}

/// Response body for `POST /recommendation`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationResponse {
    pub options: Vec<crate::routes::RouteOption>,
}

/// One stop along a transit leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitStop {
    pub stop_id: String,
    pub stop_name: String,
    pub lat: f64,
    pub lng: f64,
}

/// Ordered stop sequence and optional shape for the leg being ridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitLegDetail {
    /// Stops from boarding to alighting, inclusive
    pub stops: Vec<TransitStop>,
    /// Encoded polyline of the route shape, when the feed provides one
    #[serde(default)]
    pub shape: Option<String>,
}

/// Request body for `POST /encouragement`.
#[derive(Debug, Clone, Serialize)]
pub struct EncouragementRequest {
    pub mode: String,
    pub distance_m: f64,
    pub calories: f64,
    pub dest_name: String,
}

/// Response body for `POST /encouragement`.
#[derive(Debug, Clone, Deserialize)]
pub struct EncouragementResponse {
    pub message: String,
}
