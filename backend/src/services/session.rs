//! Interaction session: one star map being configured, generated and
//! downloaded.
//!
//! The session owns the map view, the status line, the loading flag and the
//! current surface. State lives behind a `parking_lot::Mutex` that is never
//! held across an await; the only suspension points are the sky-data fetch,
//! the geocoder lookup and the demo delay.
//!
//! Overlapping submits are resolved by a generation counter: every submit
//! takes the next generation and only the latest one may publish its
//! surface or status. Older submits finish with [`SessionError::Superseded`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::config::StarlightConfig;
use crate::error::{SessionError, StarlightError, StarlightResult};
use crate::models::{
    parse_local_datetime, GeoPoint, LocationSource, RenderRequest, SkyDataResponse, ViewState,
};
use crate::render::{
    CanvasLayout, FontSet, PixmapSurface, RenderError, RenderStats, SceneRenderer,
};
use crate::services::export::{self, ExportArtifact};
use crate::services::geocoding::{GeocodeError, Geocoder, NominatimGeocoder};
use crate::services::mock::generate_mock_sky;
use crate::services::sky_data::{HttpSkyDataSource, SkyDataSource};

/// Status line shown under the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Connecting,
    DemoMode,
    Success,
    Failed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionStatus::Idle => "",
            SessionStatus::Connecting => "Conectando con el universo...",
            SessionStatus::DemoMode => "Modo Demo (Backend no detectado)",
            SessionStatus::Success => "Mapa generado con éxito.",
            SessionStatus::Failed => "Error al generar el mapa.",
        };
        f.write_str(text)
    }
}

/// Submitted form fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateForm {
    /// Local date and time, `YYYY-MM-DDTHH:MM`.
    pub datetime: String,
    /// Submitter's offset from UTC in minutes, east positive.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub message: String,
    /// Field values; when present they update the view before rendering.
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Result of a submit that published its surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateOutcome {
    pub generation: u64,
    pub demo_mode: bool,
    pub stats: RenderStats,
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub marker: GeoPoint,
    pub lat_field: String,
    pub lon_field: String,
    pub zoom: u8,
    pub status: SessionStatus,
    pub status_text: String,
    pub loading: bool,
    pub exports_enabled: bool,
    pub searching: bool,
    pub search_message: Option<String>,
    pub generation: u64,
    pub last_render: Option<RenderStats>,
}

/// Tunables taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub mock_delay: Duration,
    pub mock_star_count: usize,
    pub search_zoom: u8,
    pub jpeg_quality: u8,
}

impl From<&StarlightConfig> for SessionOptions {
    fn from(config: &StarlightConfig) -> Self {
        Self {
            mock_delay: config.sky_data.mock_delay(),
            mock_star_count: config.sky_data.mock_star_count,
            search_zoom: config.geocoding.search_zoom,
            jpeg_quality: config.export.jpeg_quality,
        }
    }
}

struct SessionState {
    view: ViewState,
    status: SessionStatus,
    in_flight: usize,
    searching: bool,
    search_message: Option<String>,
    exports_enabled: bool,
    generation: u64,
    /// Placeholder until the first render, then the latest published map.
    surface: Arc<Pixmap>,
    last_stats: Option<RenderStats>,
}

/// Decrements the in-flight count on every exit path of a submit.
struct LoadingGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(state: &'a Mutex<SessionState>) -> Self {
        state.lock().in_flight += 1;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Clears the searching flag however the lookup ends.
struct SearchGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().searching = false;
    }
}

pub struct StarMapSession {
    state: Mutex<SessionState>,
    sky: Arc<dyn SkyDataSource>,
    geocoder: Arc<dyn Geocoder>,
    renderer: SceneRenderer,
    fonts: Arc<FontSet>,
    options: SessionOptions,
}

impl StarMapSession {
    /// Session wired to the HTTP collaborators named in `config`.
    pub fn from_config(config: &StarlightConfig) -> StarlightResult<Self> {
        let sky = HttpSkyDataSource::new(&config.sky_data)?;
        let geocoder = NominatimGeocoder::new(&config.geocoding)?;
        let fonts = FontSet::load(&config.fonts)?;
        info!(
            "Sky data service at {}, geocoder at {}",
            sky.endpoint(),
            config.geocoding.endpoint
        );
        Self::new(config, Arc::new(sky), Arc::new(geocoder), Arc::new(fonts))
    }

    /// New session showing the placeholder scene.
    pub fn new(
        config: &StarlightConfig,
        sky: Arc<dyn SkyDataSource>,
        geocoder: Arc<dyn Geocoder>,
        fonts: Arc<FontSet>,
    ) -> StarlightResult<Self> {
        let renderer = SceneRenderer::new(CanvasLayout::from(&config.canvas));
        let view = ViewState::new(
            config.map.default_lat,
            config.map.default_lon,
            config.map.default_zoom,
        )?;

        let mut placeholder = new_surface(&renderer, &fonts)?;
        renderer.draw_placeholder(&mut placeholder);

        Ok(Self {
            state: Mutex::new(SessionState {
                view,
                status: SessionStatus::Idle,
                in_flight: 0,
                searching: false,
                search_message: None,
                exports_enabled: false,
                generation: 0,
                surface: Arc::new(placeholder.into_pixmap()),
                last_stats: None,
            }),
            sky,
            geocoder,
            renderer,
            fonts,
            options: SessionOptions::from(config),
        })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        let (lat_field, lon_field) = state.view.fields();
        SessionSnapshot {
            marker: state.view.marker(),
            lat_field,
            lon_field,
            zoom: state.view.zoom(),
            status: state.status,
            status_text: state.status.to_string(),
            loading: state.in_flight > 0,
            exports_enabled: state.exports_enabled,
            searching: state.searching,
            search_message: state.search_message.clone(),
            generation: state.generation,
            last_render: state.last_stats.clone(),
        }
    }

    /// Move the marker and fields together.
    pub fn set_location(
        &self,
        lat: f64,
        lon: f64,
        source: LocationSource,
    ) -> Result<GeoPoint, SessionError> {
        let point = self.state.lock().view.set_location(lat, lon)?;
        debug!("Location set from {:?}: {}, {}", source, point.lat, point.lon);
        Ok(point)
    }

    /// Geocode `query` and recenter on the first hit.
    ///
    /// A blank query does nothing and returns `Ok(None)`. On failure the
    /// view is left untouched and the user-facing message is recorded.
    pub async fn search_location(&self, query: &str) -> StarlightResult<Option<GeoPoint>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        {
            let mut state = self.state.lock();
            if state.searching {
                return Err(SessionError::SearchInProgress.into());
            }
            state.searching = true;
            state.search_message = None;
        }
        let _searching = SearchGuard { state: &self.state };

        let found = self.geocoder.lookup(query).await.and_then(|hit| {
            self.state
                .lock()
                .view
                .recenter(hit.lat, hit.lon, self.options.search_zoom)
                .map_err(|e| GeocodeError::Decode(e.to_string()))
        });

        match found {
            Ok(point) => {
                info!("Search '{}' resolved to {}, {}", query, point.lat, point.lon);
                Ok(Some(point))
            }
            Err(e) => {
                warn!("Search '{}' failed: {}", query, e);
                self.state.lock().search_message = Some(e.user_message().to_string());
                Err(e.into())
            }
        }
    }

    /// Submit the form: fetch sky data (or fall back to the demo sky),
    /// render once and publish the surface.
    pub async fn generate(&self, form: GenerateForm) -> StarlightResult<GenerateOutcome> {
        let _loading = LoadingGuard::enter(&self.state);

        let (generation, request) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.status = SessionStatus::Connecting;
            state.exports_enabled = false;
            let generation = state.generation;
            (generation, build_request(&mut state.view, &form))
        };
        let request = match request {
            Ok(request) => request,
            Err(e) => return Err(self.fail(generation, e.into())),
        };
        debug!("Generation {} requesting sky for {}", generation, request.datetime_utc());

        let (data, demo_mode) = match self.sky.fetch(&request.sky_query()).await {
            Ok(data) => (data, false),
            Err(e) => {
                warn!("Sky data unavailable, switching to demo sky: {}", e);
                self.set_status_if_latest(generation, SessionStatus::DemoMode);
                tokio::time::sleep(self.options.mock_delay).await;
                let data = {
                    let mut rng = rand::rng();
                    generate_mock_sky(&mut rng, self.options.mock_star_count)
                };
                (data, true)
            }
        };

        self.ensure_latest(generation)?;

        let (pixmap, stats) = match self.render_blocking(data, request).await {
            Ok(rendered) => rendered,
            Err(e) => return Err(self.fail(generation, e)),
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                return Err(superseded(generation, state.generation).into());
            }
            state.surface = pixmap;
            state.last_stats = Some(stats.clone());
            state.exports_enabled = true;
            state.status = if demo_mode {
                SessionStatus::DemoMode
            } else {
                SessionStatus::Success
            };
        }
        info!(
            "Generation {} published ({} stars{})",
            generation,
            stats.stars_drawn,
            if demo_mode { ", demo sky" } else { "" }
        );

        Ok(GenerateOutcome {
            generation,
            demo_mode,
            stats,
        })
    }

    /// PNG of the current surface, placeholder included.
    pub fn preview_png(&self) -> StarlightResult<ExportArtifact> {
        let pixmap = Arc::clone(&self.state.lock().surface);
        Ok(export::export_png(&pixmap)?)
    }

    pub fn export_png(&self) -> StarlightResult<ExportArtifact> {
        let pixmap = self.exportable()?;
        Ok(export::export_png(&pixmap)?)
    }

    pub fn export_pdf(&self) -> StarlightResult<ExportArtifact> {
        let pixmap = self.exportable()?;
        Ok(export::export_pdf(&pixmap, self.options.jpeg_quality)?)
    }

    /// Rasterize off the async workers.
    async fn render_blocking(
        &self,
        data: SkyDataResponse,
        request: RenderRequest,
    ) -> StarlightResult<(Arc<Pixmap>, RenderStats)> {
        let renderer = self.renderer.clone();
        let fonts = Arc::clone(&self.fonts);
        let render = move || -> StarlightResult<(Arc<Pixmap>, RenderStats)> {
            let mut surface = new_surface(&renderer, &fonts)?;
            let stats = renderer.render(&mut surface, &data, &request);
            Ok((Arc::new(surface.into_pixmap()), stats))
        };
        tokio::task::spawn_blocking(render)
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }

    fn exportable(&self) -> Result<Arc<Pixmap>, SessionError> {
        let state = self.state.lock();
        if !state.exports_enabled {
            return Err(SessionError::NothingToExport);
        }
        Ok(Arc::clone(&state.surface))
    }

    fn ensure_latest(&self, generation: u64) -> Result<(), SessionError> {
        let latest = self.state.lock().generation;
        if latest != generation {
            debug!("Generation {} discarded, {} is current", generation, latest);
            return Err(superseded(generation, latest));
        }
        Ok(())
    }

    fn set_status_if_latest(&self, generation: u64, status: SessionStatus) {
        let mut state = self.state.lock();
        if state.generation == generation {
            state.status = status;
        }
    }

    fn fail(&self, generation: u64, error: StarlightError) -> StarlightError {
        warn!("Generation {} failed: {}", generation, error);
        self.set_status_if_latest(generation, SessionStatus::Failed);
        error
    }
}

fn superseded(generation: u64, latest: u64) -> SessionError {
    SessionError::Superseded { generation, latest }
}

fn new_surface(renderer: &SceneRenderer, fonts: &Arc<FontSet>) -> StarlightResult<PixmapSurface> {
    let layout = renderer.layout();
    Ok(PixmapSurface::new(
        layout.width,
        layout.height,
        Arc::clone(fonts),
    )?)
}

/// Validate the form, apply any location fields, then capture the request
/// from the view. A rejected form leaves the view untouched.
fn build_request(view: &mut ViewState, form: &GenerateForm) -> Result<RenderRequest, SessionError> {
    let datetime = parse_local_datetime(&form.datetime, form.utc_offset_minutes)?;
    if form.lat.is_some() || form.lon.is_some() {
        let current = view.marker();
        view.set_location(
            form.lat.unwrap_or(current.lat),
            form.lon.unwrap_or(current.lon),
        )?;
    }
    let location = view.marker();
    Ok(RenderRequest {
        datetime,
        lat: location.lat,
        lon: location.lon,
        recipient: form.recipient.trim().to_string(),
        message: form.message.clone(),
    })
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
