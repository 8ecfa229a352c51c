//! Service layer: external collaborators, the interaction session and
//! exports.
//!
//! The session orchestrates the other services; the HTTP layer only talks
//! to [`StarMapSession`].

pub mod export;
pub mod geocoding;
pub mod mock;
pub mod session;
pub mod sky_data;

pub use export::{export_pdf, export_png, ExportArtifact, ExportError};
pub use geocoding::{GeocodeError, GeocodeHit, Geocoder, NominatimGeocoder};
pub use mock::{generate_mock_sky, MOCK_STAR_COUNT};
pub use session::{
    GenerateForm, GenerateOutcome, SessionOptions, SessionSnapshot, SessionStatus, StarMapSession,
};
pub use sky_data::{HttpSkyDataSource, SkyDataError, SkyDataSource};
