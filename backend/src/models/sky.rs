//! Sky data as produced by the external sky-data service.
//!
//! All collections default to empty so a partial response still renders;
//! fields the service adds beyond the ones the renderer uses are kept as
//! optional values so they round-trip through logs and tests.

use serde::{Deserialize, Serialize};

/// Complete sky description for one place and instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyDataResponse {
    #[serde(default)]
    pub stars: Vec<Star>,
    #[serde(default)]
    pub solar_system: Vec<Body>,
    #[serde(default)]
    pub constellations: Vec<Constellation>,
    /// Echo of the request parameters, when the service provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SkyMetadata>,
}

impl SkyDataResponse {
    /// True when there is nothing to draw inside the dome.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty() && self.solar_system.is_empty() && self.constellations.is_empty()
    }
}

/// Request echo attached to a sky-data response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyMetadata {
    pub lat: f64,
    pub lon: f64,
    pub datetime_utc: String,
}

/// A single star in horizontal coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub alt_deg: f64,
    pub az_deg: f64,
    /// Apparent magnitude; lower is brighter.
    pub magnitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Star {
    pub fn new(alt_deg: f64, az_deg: f64, magnitude: f64) -> Self {
        Self {
            alt_deg,
            az_deg,
            magnitude,
            name: None,
            kind: None,
        }
    }
}

/// Sun, Moon or planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub alt_deg: f64,
    pub az_deg: f64,
    /// `sun`, `moon` or `planet` in service responses.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Body {
    pub fn new(name: impl Into<String>, alt_deg: f64, az_deg: f64) -> Self {
        Self {
            name: name.into(),
            alt_deg,
            az_deg,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Vertex of a constellation stick figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPoint {
    pub alt: f64,
    pub az: f64,
}

/// Ordered vertices drawn as connected, open segments.
pub type Polyline = Vec<HorizontalPoint>;

/// Label anchor for a constellation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub alt: f64,
    pub az: f64,
    /// Set by the service when the anchor is worth labelling.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub lines: Vec<Polyline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Centroid>,
}

impl Constellation {
    /// Centroid to label, if the service flagged it as visible.
    pub fn label_anchor(&self) -> Option<Centroid> {
        self.centroid.filter(|c| c.visible)
    }
}
