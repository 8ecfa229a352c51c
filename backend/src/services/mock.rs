//! Demo sky used when the sky-data service cannot be reached.

use rand::Rng;

use crate::models::{Body, SkyDataResponse, Star};

/// Star count of the default demo sky.
pub const MOCK_STAR_COUNT: usize = 300;

/// Random stars above the horizon plus a fixed Moon and Jupiter.
///
/// Altitudes fall in [0, 90), azimuths in [0, 360) and magnitudes in
/// [0, 6). No constellations are included.
pub fn generate_mock_sky<R: Rng>(rng: &mut R, star_count: usize) -> SkyDataResponse {
    let stars = (0..star_count)
        .map(|_| {
            Star::new(
                rng.random_range(0.0..90.0),
                rng.random_range(0.0..360.0),
                rng.random_range(0.0..6.0),
            )
        })
        .collect();

    SkyDataResponse {
        stars,
        solar_system: vec![
            Body::new("Moon", 45.0, 180.0).with_kind("moon"),
            Body::new("Jupiter", 60.0, 120.0).with_kind("planet"),
        ],
        constellations: Vec::new(),
        metadata: None,
    }
}
