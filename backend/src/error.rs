//! Error types shared across the crate.
//!
//! Each concern owns its error enum next to its code; [`StarlightError`]
//! aggregates them for callers that drive the whole pipeline.

use crate::config::ConfigError;
use crate::render::RenderError;
use crate::services::export::ExportError;
use crate::services::geocoding::GeocodeError;
use crate::services::sky_data::SkyDataError;

/// Result type for session-level operations
pub type StarlightResult<T> = Result<T, StarlightError>;

/// Errors raised by the interaction session itself.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid location: lat={lat}, lon={lon}")]
    InvalidLocation { lat: f64, lon: f64 },

    #[error("Invalid date/time value: '{0}'")]
    InvalidDateTime(String),

    #[error("A location search is already running")]
    SearchInProgress,

    #[error("No completed map is available for export")]
    NothingToExport,

    /// A newer submit replaced this one before its data arrived.
    #[error("Generation {generation} was superseded by generation {latest}")]
    Superseded { generation: u64, latest: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum StarlightError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    SkyData(#[from] SkyDataError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StarlightError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            StarlightError::Geocode(e) => e.user_message().to_string(),
            StarlightError::Session(SessionError::NothingToExport) => {
                "Genera un mapa antes de descargarlo.".to_string()
            }
            StarlightError::Session(SessionError::SearchInProgress) => {
                "Ya hay una búsqueda en curso.".to_string()
            }
            _ => crate::services::session::SessionStatus::Failed.to_string(),
        }
    }
}
