//! Selected geographic location shared by the map marker and the numeric
//! latitude/longitude fields.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Decimal places kept for the selected location.
pub const COORDINATE_DECIMALS: i32 = 4;

/// Default map center: Mérida area, Yucatán.
pub const DEFAULT_LAT: f64 = 20.689;
pub const DEFAULT_LON: f64 = -88.201;
pub const DEFAULT_ZOOM: u8 = 10;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// How a location update was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Drag,
    Click,
    Fields,
    Search,
}

/// Current map view.
///
/// The location is stored once, already rounded, and both the marker and
/// the form fields are derived from it, so they can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    location: GeoPoint,
    zoom: u8,
}

impl ViewState {
    pub fn new(lat: f64, lon: f64, zoom: u8) -> Result<Self, SessionError> {
        let mut view = Self {
            location: GeoPoint {
                lat: DEFAULT_LAT,
                lon: DEFAULT_LON,
            },
            zoom,
        };
        view.set_location(lat, lon)?;
        Ok(view)
    }

    /// The single update path for drag, click, field edits and search.
    ///
    /// Longitudes from a wrapped map are normalized into [-180, 180] and
    /// latitudes are clamped to [-90, 90].
    pub fn set_location(&mut self, lat: f64, lon: f64) -> Result<GeoPoint, SessionError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(SessionError::InvalidLocation { lat, lon });
        }
        self.location = GeoPoint {
            lat: round_coordinate(lat.clamp(-90.0, 90.0)),
            lon: round_coordinate(normalize_longitude(lon)),
        };
        Ok(self.location)
    }

    /// Recenter the map on a location at the given zoom level.
    pub fn recenter(&mut self, lat: f64, lon: f64, zoom: u8) -> Result<GeoPoint, SessionError> {
        let point = self.set_location(lat, lon)?;
        self.zoom = zoom;
        Ok(point)
    }

    /// Position of the draggable marker.
    pub fn marker(&self) -> GeoPoint {
        self.location
    }

    /// Text shown in the latitude and longitude fields.
    pub fn fields(&self) -> (String, String) {
        let places = COORDINATE_DECIMALS as usize;
        (
            format!("{:.*}", places, self.location.lat),
            format!("{:.*}", places, self.location.lon),
        )
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            location: GeoPoint {
                lat: DEFAULT_LAT,
                lon: DEFAULT_LON,
            },
            zoom: DEFAULT_ZOOM,
        }
    }
}

fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_DECIMALS);
    (value * factor).round() / factor
}

fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}
