//! Client for the external sky-data service.

use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

use crate::config::SkyDataConfig;
use crate::models::{SkyDataRequest, SkyDataResponse};

#[derive(Debug, thiserror::Error)]
pub enum SkyDataError {
    #[error("Sky data service unreachable: {0}")]
    Transport(String),

    #[error("Sky data request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Sky data service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode sky data: {0}")]
    Decode(String),
}

/// Source of sky data for a place and instant.
///
/// Implementations must be `Send + Sync` so one instance can serve every
/// session request.
#[async_trait]
pub trait SkyDataSource: Send + Sync {
    async fn fetch(&self, request: &SkyDataRequest) -> Result<SkyDataResponse, SkyDataError>;
}

/// `POST {base_url}/generate` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSkyDataSource {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSkyDataSource {
    pub fn new(config: &SkyDataConfig) -> Result<Self, SkyDataError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SkyDataError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/generate", config.base_url.trim_end_matches('/')),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SkyDataSource for HttpSkyDataSource {
    async fn fetch(&self, request: &SkyDataRequest) -> Result<SkyDataResponse, SkyDataError> {
        debug!(
            "Requesting sky data from {} for ({}, {}) at {}",
            self.endpoint, request.lat, request.lon, request.datetime_utc
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SkyDataError::Timeout(self.timeout)
                } else {
                    SkyDataError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SkyDataError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!("Sky data service answered {}", status);
            return Err(SkyDataError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let data: SkyDataResponse =
            serde_json::from_str(&body).map_err(|e| SkyDataError::Decode(e.to_string()))?;
        debug!(
            "Received {} stars, {} bodies, {} constellations",
            data.stars.len(),
            data.solar_system.len(),
            data.constellations.len()
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_generate() {
        let config = SkyDataConfig {
            base_url: "http://sky.local:8000/".to_string(),
            ..SkyDataConfig::default()
        };
        let source = HttpSkyDataSource::new(&config).unwrap();
        assert_eq!(source.endpoint(), "http://sky.local:8000/generate");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = SkyDataConfig {
            // Reserved port, nothing listens there
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..SkyDataConfig::default()
        };
        let source = HttpSkyDataSource::new(&config).unwrap();
        let request = SkyDataRequest {
            lat: 0.0,
            lon: 0.0,
            datetime_utc: "2026-01-25 16:51:00".to_string(),
        };
        let err = source.fetch(&request).await.unwrap_err();
        assert!(matches!(
            err,
            SkyDataError::Transport(_) | SkyDataError::Timeout(_)
        ));
    }
}
