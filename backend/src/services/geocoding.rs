//! Free-text location search against a Nominatim-compatible geocoder.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::config::GeocodingConfig;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("No results for '{0}'")]
    NotFound(String),

    #[error("Geocoder unreachable: {0}")]
    Transport(String),

    #[error("Geocoder returned {status}")]
    Status { status: u16 },

    #[error("Failed to decode geocoder response: {0}")]
    Decode(String),
}

impl GeocodeError {
    /// Message shown next to the search box.
    pub fn user_message(&self) -> &'static str {
        match self {
            GeocodeError::NotFound(_) => "Ubicación no encontrada",
            _ => "Error al buscar la ubicación",
        }
    }
}

/// First match of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub lat: f64,
    pub lon: f64,
    pub display_name: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `query` to its best match.
    async fn lookup(&self, query: &str) -> Result<GeocodeHit, GeocodeError>;
}

/// Nominatim answers coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// `GET {endpoint}?format=json&q={query}`.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, query: &str) -> Result<GeocodeHit, GeocodeError> {
        debug!("Geocoding '{}' via {}", query, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        parse_first_hit(query, &body)
    }
}

fn parse_first_hit(query: &str, body: &str) -> Result<GeocodeHit, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

    let Some(first) = places.into_iter().next() else {
        return Err(GeocodeError::NotFound(query.to_string()));
    };

    let parse = |field: &str, value: &str| match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GeocodeError::Decode(format!(
            "{} is not a number: '{}'",
            field, value
        ))),
    };

    Ok(GeocodeHit {
        lat: parse("lat", &first.lat)?,
        lon: parse("lon", &first.lon)?,
        display_name: first.display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_wins() {
        let body = r#"[
            {"lat": "20.9670", "lon": "-89.6240", "display_name": "Mérida, Yucatán, México"},
            {"lat": "38.9160", "lon": "-6.3437", "display_name": "Mérida, Extremadura, España"}
        ]"#;
        let hit = parse_first_hit("Merida", body).unwrap();
        assert_eq!(hit.lat, 20.9670);
        assert_eq!(hit.lon, -89.6240);
        assert_eq!(hit.display_name.as_deref(), Some("Mérida, Yucatán, México"));
    }

    #[test]
    fn test_empty_array_is_not_found() {
        let err = parse_first_hit("Atlantis", "[]").unwrap_err();
        assert!(matches!(err, GeocodeError::NotFound(ref q) if q == "Atlantis"));
        assert_eq!(err.user_message(), "Ubicación no encontrada");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = parse_first_hit("x", "<html>").unwrap_err();
        assert!(matches!(err, GeocodeError::Decode(_)));
        assert_eq!(err.user_message(), "Error al buscar la ubicación");

        let err = parse_first_hit("x", r#"[{"lat": "north", "lon": "1"}]"#).unwrap_err();
        assert!(err.to_string().contains("lat"));
    }

    #[test]
    fn test_non_finite_coordinates_are_decode_errors() {
        for (lat, lon) in [("NaN", "1"), ("20.9", "inf"), ("-infinity", "0")] {
            let body = format!(r#"[{{"lat": "{}", "lon": "{}"}}]"#, lat, lon);
            let err = parse_first_hit("x", &body).unwrap_err();
            assert!(matches!(err, GeocodeError::Decode(_)), "{} {}", lat, lon);
        }
    }
}
