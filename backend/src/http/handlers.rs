//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to one action of the map page and delegates to
//! the session.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::debug;

use super::dto::{
    GenerateForm, GenerateResponse, HealthResponse, LocationRequest, LocationResponse,
    LocationSource, SearchRequest, SearchResponse, SessionSnapshot,
};
use super::error::AppError;
use super::state::AppState;
use crate::error::StarlightResult;
use crate::services::{ExportArtifact, StarMapSession};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        sky_data: state.config.sky_data.base_url.clone(),
    }))
}

// =============================================================================
// Session State
// =============================================================================

/// GET /v1/state
///
/// Marker, fields, status line, loading flag and export availability.
pub async fn get_state(State(state): State<AppState>) -> HandlerResult<SessionSnapshot> {
    Ok(Json(state.session.snapshot()))
}

/// PUT /v1/location
///
/// Marker drag, map click or edit of the latitude/longitude fields.
pub async fn put_location(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> HandlerResult<LocationResponse> {
    let source = request.source.unwrap_or(LocationSource::Fields);
    state.session.set_location(request.lat, request.lon, source)?;
    Ok(Json(LocationResponse::from(&state.session.snapshot())))
}

/// POST /v1/search
///
/// Geocode a free-text query and recenter the map on the first hit.
pub async fn search_location(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> HandlerResult<SearchResponse> {
    let found = state.session.search_location(&request.query).await?;
    Ok(Json(SearchResponse {
        found: found.is_some(),
        location: LocationResponse::from(&state.session.snapshot()),
    }))
}

// =============================================================================
// Map Generation
// =============================================================================

/// POST /v1/generate
///
/// Submit the form. Falls back to the demo sky when the sky data service is
/// unavailable; a submit overtaken by a newer one answers 409.
pub async fn generate_map(
    State(state): State<AppState>,
    Json(form): Json<GenerateForm>,
) -> HandlerResult<GenerateResponse> {
    let outcome = state.session.generate(form).await?;
    let snapshot = state.session.snapshot();

    Ok(Json(GenerateResponse {
        generation: outcome.generation,
        demo_mode: outcome.demo_mode,
        status: snapshot.status,
        status_text: snapshot.status_text,
        stats: outcome.stats,
    }))
}

// =============================================================================
// Images and Downloads
// =============================================================================

/// GET /v1/preview.png
///
/// Current surface: the placeholder until a map is generated.
pub async fn preview_png(State(state): State<AppState>) -> Result<Response, AppError> {
    let artifact = encode_blocking(&state, StarMapSession::preview_png).await?;
    Ok(binary(artifact, false))
}

/// GET /v1/export/png
pub async fn export_png(State(state): State<AppState>) -> Result<Response, AppError> {
    let artifact = encode_blocking(&state, StarMapSession::export_png).await?;
    Ok(binary(artifact, true))
}

/// GET /v1/export/pdf
pub async fn export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let artifact = encode_blocking(&state, StarMapSession::export_pdf).await?;
    Ok(binary(artifact, true))
}

/// Run an encoder off the async workers.
async fn encode_blocking(
    state: &AppState,
    encode: fn(&StarMapSession) -> StarlightResult<ExportArtifact>,
) -> Result<ExportArtifact, AppError> {
    let session = state.session.clone();
    let artifact = tokio::task::spawn_blocking(move || encode(&session))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;
    debug!("Serving {} ({} bytes)", artifact.filename, artifact.bytes.len());
    Ok(artifact)
}

fn binary(artifact: ExportArtifact, attachment: bool) -> Response {
    let disposition = if attachment {
        format!("attachment; filename=\"{}\"", artifact.filename)
    } else {
        format!("inline; filename=\"{}\"", artifact.filename)
    };
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}
