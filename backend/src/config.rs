//! Service configuration.
//!
//! Settings come from a TOML file with one table per concern. Every key has
//! a default, so an empty file (or no file at all) yields a working setup
//! pointed at local collaborators. A handful of environment variables
//! override the file for container deployments.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::models::{DEFAULT_LAT, DEFAULT_LON, DEFAULT_ZOOM};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "STARLIGHT_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No starlight.toml found in standard locations")]
    NotFound,

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarlightConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sky_data: SkyDataConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub fonts: FontConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// External sky-data service and the demo fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyDataConfig {
    #[serde(default = "default_sky_base_url")]
    pub base_url: String,
    #[serde(default = "default_sky_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause before showing demo data when the service is unreachable.
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,
    #[serde(default = "default_mock_star_count")]
    pub mock_star_count: usize,
}

impl Default for SkyDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_sky_base_url(),
            timeout_secs: default_sky_timeout_secs(),
            mock_delay_ms: default_mock_delay_ms(),
            mock_star_count: default_mock_star_count(),
        }
    }
}

impl SkyDataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

fn default_sky_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_sky_timeout_secs() -> u64 {
    30
}

fn default_mock_delay_ms() -> u64 {
    1000
}

fn default_mock_star_count() -> usize {
    300
}

/// Nominatim-compatible geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout_secs")]
    pub timeout_secs: u64,
    /// Map zoom applied after a successful search.
    #[serde(default = "default_search_zoom")]
    pub search_zoom: u8,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout_secs(),
            search_zoom: default_search_zoom(),
        }
    }
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_geocoder_endpoint() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    format!("starlight-map/{}", env!("CARGO_PKG_VERSION"))
}

fn default_geocoder_timeout_secs() -> u64 {
    10
}

fn default_search_zoom() -> u8 {
    12
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
    #[serde(default = "default_dome_radius")]
    pub dome_radius: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            dome_radius: default_dome_radius(),
        }
    }
}

fn default_canvas_width() -> u32 {
    1200
}

fn default_canvas_height() -> u32 {
    1600
}

fn default_dome_radius() -> f64 {
    500.0
}

/// Initial map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_lat")]
    pub default_lat: f64,
    #[serde(default = "default_lon")]
    pub default_lon: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_lat: default_lat(),
            default_lon: default_lon(),
            default_zoom: default_zoom(),
        }
    }
}

fn default_lat() -> f64 {
    DEFAULT_LAT
}

fn default_lon() -> f64 {
    DEFAULT_LON
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

/// TrueType files per font role. Unset roles are looked up in system font
/// directories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default)]
    pub sans: Option<PathBuf>,
    #[serde(default)]
    pub sans_bold: Option<PathBuf>,
    #[serde(default)]
    pub serif: Option<PathBuf>,
    #[serde(default)]
    pub serif_italic: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// JPEG quality of the image embedded in PDF exports (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_jpeg_quality() -> u8 {
    90
}

impl StarlightConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: StarlightConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `starlight.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("starlight.toml"),
            PathBuf::from("backend/starlight.toml"),
            PathBuf::from("../starlight.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Resolve the effective configuration for the server.
    ///
    /// `STARLIGHT_CONFIG` wins over the default locations; when no file is
    /// found the built-in defaults are used. Environment overrides apply last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                info!("Loading configuration from {} ({})", path, CONFIG_PATH_ENV);
                Self::from_file(path.trim())?
            }
            _ => match Self::from_default_location() {
                Ok(config) => config,
                Err(ConfigError::NotFound) => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
                Err(e) => return Err(e),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `STARLIGHT_SKY_API_URL` and
    /// `STARLIGHT_GEOCODER_URL` from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(url) = get("STARLIGHT_SKY_API_URL") {
            self.sky_data.base_url = url;
        }
        if let Some(url) = get("STARLIGHT_GEOCODER_URL") {
            self.geocoding.endpoint = url;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, value: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        };

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(invalid(
                "canvas",
                format!("{}x{}", self.canvas.width, self.canvas.height),
            ));
        }
        if !(self.canvas.dome_radius.is_finite() && self.canvas.dome_radius > 0.0) {
            return Err(invalid("canvas.dome_radius", self.canvas.dome_radius.to_string()));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(invalid("export.jpeg_quality", self.export.jpeg_quality.to_string()));
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
