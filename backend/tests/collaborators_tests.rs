#![cfg(feature = "http-server")]

mod support;

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use starlight::config::{GeocodingConfig, SkyDataConfig};
use starlight::models::SkyDataRequest;
use starlight::services::{
    GeocodeError, Geocoder, HttpSkyDataSource, NominatimGeocoder, SkyDataError, SkyDataSource,
};

fn sky_request() -> SkyDataRequest {
    SkyDataRequest {
        lat: 20.689,
        lon: -88.201,
        datetime_utc: "2026-01-25 16:51:00".to_string(),
    }
}

fn sky_source(base_url: String) -> HttpSkyDataSource {
    HttpSkyDataSource::new(&SkyDataConfig {
        base_url,
        timeout_secs: 5,
        ..SkyDataConfig::default()
    })
    .unwrap()
}

fn geocoder(base_url: &str) -> NominatimGeocoder {
    NominatimGeocoder::new(&GeocodingConfig {
        endpoint: format!("{}/search", base_url),
        user_agent: "starlight-tests/1.0".to_string(),
        ..GeocodingConfig::default()
    })
    .unwrap()
}

/// Echoes the request back inside `metadata`.
async fn sky_echo(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "metadata": body,
        "stars": [
            {"alt_deg": 45.0, "az_deg": 90.0, "magnitude": 0.5, "name": "Vega"}
        ],
        "solar_system": [
            {"name": "Moon", "alt_deg": 30.0, "az_deg": 200.0, "type": "moon"}
        ],
        "constellations": [
            {
                "id": "Lyr",
                "name": "Lyra",
                "lines": [[{"alt": 44.0, "az": 89.0}, {"alt": 46.0, "az": 91.0}]],
                "centroid": {"alt": 45.0, "az": 90.0, "visible": true}
            }
        ]
    }))
}

#[tokio::test]
async fn test_sky_data_round_trip() {
    let base = support::serve(Router::new().route("/generate", post(sky_echo))).await;
    let data = sky_source(base).fetch(&sky_request()).await.unwrap();

    let metadata = data.metadata.unwrap();
    assert_eq!(metadata.datetime_utc, "2026-01-25 16:51:00");
    assert_eq!(metadata.lat, 20.689);
    assert_eq!(data.stars[0].name.as_deref(), Some("Vega"));
    assert_eq!(data.solar_system[0].kind.as_deref(), Some("moon"));
    assert_eq!(data.constellations[0].label_anchor().unwrap().az, 90.0);
}

#[tokio::test]
async fn test_sky_data_server_error() {
    let router = Router::new().route(
        "/generate",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "ephemeris offline") }),
    );
    let base = support::serve(router).await;
    let err = sky_source(base).fetch(&sky_request()).await.unwrap_err();

    match err {
        SkyDataError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "ephemeris offline");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_sky_data_bad_json() {
    let router = Router::new().route("/generate", post(|| async { "not json" }));
    let base = support::serve(router).await;
    let err = sky_source(base).fetch(&sky_request()).await.unwrap_err();
    assert!(matches!(err, SkyDataError::Decode(_)));
}

#[tokio::test]
async fn test_sky_data_unreachable() {
    let err = sky_source(support::unreachable_url())
        .fetch(&sky_request())
        .await
        .unwrap_err();
    assert!(matches!(err, SkyDataError::Transport(_)));
}

async fn nominatim(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if agent != "starlight-tests/1.0" || params.get("format").map(String::as_str) != Some("json") {
        return (StatusCode::FORBIDDEN, Json(json!([])));
    }
    let body = match params.get("q").map(String::as_str) {
        Some("Merida") => json!([
            {"lat": "20.9670", "lon": "-89.6240", "display_name": "Mérida, Yucatán, México"}
        ]),
        _ => json!([]),
    };
    (StatusCode::OK, Json(body))
}

#[tokio::test]
async fn test_geocoder_first_hit() {
    let base = support::serve(Router::new().route("/search", get(nominatim))).await;
    let hit = geocoder(&base).lookup("Merida").await.unwrap();

    assert_eq!(hit.lat, 20.9670);
    assert_eq!(hit.lon, -89.6240);
    assert_eq!(hit.display_name.as_deref(), Some("Mérida, Yucatán, México"));
}

#[tokio::test]
async fn test_geocoder_no_results() {
    let base = support::serve(Router::new().route("/search", get(nominatim))).await;
    let err = geocoder(&base).lookup("Atlantis").await.unwrap_err();

    assert!(matches!(err, GeocodeError::NotFound(ref q) if q == "Atlantis"));
    assert_eq!(err.user_message(), "Ubicación no encontrada");
}

#[tokio::test]
async fn test_geocoder_http_error() {
    let router = Router::new().route(
        "/search",
        get(|| async { StatusCode::TOO_MANY_REQUESTS }),
    );
    let base = support::serve(router).await;
    let err = geocoder(&base).lookup("Merida").await.unwrap_err();

    assert!(matches!(err, GeocodeError::Status { status: 429 }));
    assert_eq!(err.user_message(), "Error al buscar la ubicación");
}
