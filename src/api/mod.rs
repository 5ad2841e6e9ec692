//! HTTP clients for the external collaborators: route recommendation,
//! transit leg detail, and walk encouragement.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use types::{RecommendationRequest, TransitLegDetail, TransitStop};
