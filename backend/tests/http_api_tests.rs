#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use starlight::config::StarlightConfig;
use starlight::http::{create_router, AppState};
use starlight::services::StarMapSession;

const BODY_LIMIT: usize = 32 * 1024 * 1024;

fn app() -> Router {
    let mut config = StarlightConfig::default();
    config.sky_data.base_url = support::unreachable_url();
    config.sky_data.mock_delay_ms = 10;
    config.geocoding.endpoint = support::unreachable_url();

    let session = Arc::new(StarMapSession::from_config(&config).unwrap());
    create_router(AppState::new(session, Arc::new(config)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn generate_body() -> Value {
    json!({
        "datetime": "2026-01-25T10:51",
        "utc_offset_minutes": -360,
        "recipient": "Ana",
        "message": "Para siempre"
    })
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_initial_state() {
    let app = app();
    let response = send(&app, Method::GET, "/v1/state", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let state = json_body(response).await;
    assert_eq!(state["lat_field"], "20.6890");
    assert_eq!(state["lon_field"], "-88.2010");
    assert_eq!(state["status"], "idle");
    assert_eq!(state["loading"], false);
    assert_eq!(state["exports_enabled"], false);
}

#[tokio::test]
async fn test_put_location_rounds_and_syncs_fields() {
    let app = app();
    let response = send(
        &app,
        Method::PUT,
        "/v1/location",
        Some(json!({"lat": 40.416775, "lon": -3.703790, "source": "drag"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["lat_field"], "40.4168");
    assert_eq!(body["lon_field"], "-3.7038");
    assert_eq!(body["marker"]["lat"], 40.4168);
}

#[tokio::test]
async fn test_put_location_rejects_malformed_body() {
    let app = app();
    let response = send(&app, Method::PUT, "/v1/location", Some(json!({"lat": "north"}))).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_search_failure_reports_message() {
    let app = app();
    let response = send(&app, Method::POST, "/v1/search", Some(json!({"query": "Merida"}))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Error al buscar la ubicación");
}

#[tokio::test]
async fn test_blank_search_is_noop() {
    let app = app();
    let response = send(&app, Method::POST, "/v1/search", Some(json!({"query": " "}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["found"], false);
}

#[tokio::test]
async fn test_exports_conflict_before_first_map() {
    let app = app();
    for uri in ["/v1/export/png", "/v1/export/pdf"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["code"], "NOTHING_TO_EXPORT");
    }
}

#[tokio::test]
async fn test_preview_shows_placeholder() {
    let app = app();
    let response = send(&app, Method::GET, "/v1/preview.png", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_generate_then_download() {
    let app = app();

    let response = send(&app, Method::POST, "/v1/generate", Some(generate_body())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["demo_mode"], true);
    assert_eq!(body["status_text"], "Modo Demo (Backend no detectado)");
    assert_eq!(body["stats"]["stars_drawn"], 300);
    assert_eq!(body["stats"]["message_lines"], json!(["Para siempre"]));

    let response = send(&app, Method::GET, "/v1/export/png", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"starlight-map.png\""
    );

    let response = send(&app, Method::GET, "/v1/export/pdf", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let state = json_body(send(&app, Method::GET, "/v1/state", None).await).await;
    assert_eq!(state["exports_enabled"], true);
    assert_eq!(state["generation"], 1);
}

#[tokio::test]
async fn test_generate_with_bad_datetime() {
    let app = app();
    let mut body = generate_body();
    body["datetime"] = json!("25/01/2026");

    let response = send(&app, Method::POST, "/v1/generate", Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_DATETIME");
    assert_eq!(body["message"], "Error al generar el mapa.");

    let state = json_body(send(&app, Method::GET, "/v1/state", None).await).await;
    assert_eq!(state["status"], "failed");
    assert_eq!(state["loading"], false);
}
