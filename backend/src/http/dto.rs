//! Data Transfer Objects for the HTTP API.
//!
//! Session types that already derive Serialize are re-exported as-is.

use serde::{Deserialize, Serialize};

pub use crate::models::{GeoPoint, LocationSource};
pub use crate::render::RenderStats;
pub use crate::services::{GenerateForm, SessionSnapshot, SessionStatus};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Sky data endpoint the session talks to
    pub sky_data: String,
}

/// Body of `PUT /v1/location`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub lat: f64,
    pub lon: f64,
    /// What moved the marker; defaults to a field edit
    #[serde(default)]
    pub source: Option<LocationSource>,
}

/// Marker position and the field texts derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub marker: GeoPoint,
    pub lat_field: String,
    pub lon_field: String,
    pub zoom: u8,
}

impl From<&SessionSnapshot> for LocationResponse {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            marker: snapshot.marker,
            lat_field: snapshot.lat_field.clone(),
            lon_field: snapshot.lon_field.clone(),
            zoom: snapshot.zoom,
        }
    }
}

/// Body of `POST /v1/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Outcome of a search; `found` is false only for a blank query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub found: bool,
    pub location: LocationResponse,
}

/// Response of `POST /v1/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub generation: u64,
    pub demo_mode: bool,
    pub status: SessionStatus,
    pub status_text: String,
    pub stats: RenderStats,
}
