//! Horizontal (alt/az) coordinates to points on the sky dome.
//!
//! The dome is a zenithal equidistant chart: radial distance grows linearly
//! from the zenith (center) to the horizon (rim). Azimuth is a compass
//! bearing, so it is rotated by -90° to put North at the top of the canvas
//! and East on the right.

use std::f64::consts::PI;

/// A point in canvas pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Canvas angle for a compass azimuth.
fn azimuth_to_theta(az_deg: f64) -> f64 {
    (az_deg - 90.0) * (PI / 180.0)
}

/// Project altitude/azimuth onto the dome.
///
/// Altitude 90° lands on `center`, altitude 0° on the rim at `radius`,
/// negative altitudes outside the rim. Inputs are not validated.
pub fn project(alt_deg: f64, az_deg: f64, center: ScreenPoint, radius: f64) -> ScreenPoint {
    let r = radius * (1.0 - alt_deg / 90.0);
    let theta = azimuth_to_theta(az_deg);
    ScreenPoint::new(center.x + r * theta.cos(), center.y + r * theta.sin())
}

/// Anchor for a compass label `offset` pixels beyond the rim, on the same
/// ray as `project(0, az_deg)`.
pub fn compass_point(az_deg: f64, center: ScreenPoint, radius: f64, offset: f64) -> ScreenPoint {
    let theta = azimuth_to_theta(az_deg);
    let r = radius + offset;
    ScreenPoint::new(center.x + r * theta.cos(), center.y + r * theta.sin())
}
