//! HTTP client for the recommendation backend.

use std::time::Duration;

use crate::api::types::{
    EncouragementRequest, EncouragementResponse, RecommendationRequest, RecommendationResponse,
    TransitLegDetail,
};
use crate::navigation::machine::RideRef;
use crate::navigation::mode::WalkingMode;
use crate::routes::RouteOption;
use thiserror::Error;

/// Default request timeout. Collaborator calls are best-effort and must
/// fail fast rather than stall the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend unreachable")]
    Offline,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Client for the recommendation backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::ApiError(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// Fetch ranked route options for a trip.
    pub async fn recommendation(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RouteOption>, ApiError> {
        request.validate().map_err(ApiError::InvalidRequest)?;

        let url = format!("{}/recommendation", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let response = check_status(response)?;
        let body: RecommendationResponse = response
            .json()
            .await
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        // Drop structurally invalid options rather than failing the batch
        let mut options = body.options;
        options.retain(|o| match o.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed route option");
                false
            }
        });
        Ok(options)
    }

    /// Fetch the stop sequence and shape for the leg being ridden.
    ///
    /// Only called while ON_TRANSIT; failures degrade to no overlay.
    pub async fn transit_leg(
        &self,
        ride: &RideRef,
        time_of_day: &str,
    ) -> Result<TransitLegDetail, ApiError> {
        let url = format!("{}/transit/leg", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("route", ride.route.as_str()),
                ("boarding_stop_id", ride.boarding_stop_id.as_str()),
                ("alighting_stop_id", ride.alighting_stop_id.as_str()),
                ("at", time_of_day),
            ])
            .send()
            .await
            .map_err(classify)?;

        let response = check_status(response)?;
        response
            .json()
            .await
            .map_err(|e| ApiError::SerializationError(e.to_string()))
    }

    /// Fetch a short encouragement message for a completed walk.
    pub async fn encouragement(
        &self,
        mode: WalkingMode,
        distance_m: f64,
        calories: f64,
        dest_name: &str,
    ) -> Result<String, ApiError> {
        let url = format!("{}/encouragement", self.base_url);
        let request = EncouragementRequest {
            mode: mode.to_string(),
            distance_m,
            calories,
            dest_name: dest_name.to_string(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let response = check_status(response)?;
        let body: EncouragementResponse = response
            .json()
            .await
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(body.message)
    }
}

/// Map transport failures to the offline/API error taxonomy.
fn classify(e: reqwest::Error) -> ApiError {
    if e.is_connect() || e.is_timeout() {
        ApiError::Offline
    } else {
        ApiError::ApiError(e.to_string())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status.is_server_error() {
        Err(ApiError::Offline)
    } else {
        Err(ApiError::ApiError(format!("API returned status {status}")))
    }
}
