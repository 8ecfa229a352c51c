//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, StarlightError};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Message suitable for the status line of the page
    pub message: String,
    /// Optional technical details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Request conflicts with the session state
    Conflict(String),
    /// Internal server error
    Internal(String),
    /// Failure raised by the session
    Session(StarlightError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Session(e) => {
                let (status, code) = classify(&e);
                (
                    status,
                    ApiError::new(code, e.user_message()).with_details(e.to_string()),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

fn classify(err: &StarlightError) -> (StatusCode, &'static str) {
    use crate::services::GeocodeError;

    match err {
        StarlightError::Session(SessionError::InvalidLocation { .. }) => {
            (StatusCode::BAD_REQUEST, "INVALID_LOCATION")
        }
        StarlightError::Session(SessionError::InvalidDateTime(_)) => {
            (StatusCode::BAD_REQUEST, "INVALID_DATETIME")
        }
        StarlightError::Session(SessionError::SearchInProgress) => {
            (StatusCode::CONFLICT, "SEARCH_IN_PROGRESS")
        }
        StarlightError::Session(SessionError::NothingToExport) => {
            (StatusCode::CONFLICT, "NOTHING_TO_EXPORT")
        }
        StarlightError::Session(SessionError::Superseded { .. }) => {
            (StatusCode::CONFLICT, "SUPERSEDED")
        }
        StarlightError::Geocode(GeocodeError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "LOCATION_NOT_FOUND")
        }
        StarlightError::Geocode(_) | StarlightError::SkyData(_) => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        }
        StarlightError::Render(_) | StarlightError::Export(_) | StarlightError::Config(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

impl From<StarlightError> for AppError {
    fn from(err: StarlightError) -> Self {
        AppError::Session(err)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Session(err.into())
    }
}
