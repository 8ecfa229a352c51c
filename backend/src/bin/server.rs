//! Starlight HTTP Server Binary
//!
//! Serves one star map session over HTTP: location and search, map
//! generation, preview and PNG/PDF downloads.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin starlight-server
//!
//! # Point at a sky data service and a private geocoder
//! STARLIGHT_SKY_API_URL=http://sky:8000 \
//! STARLIGHT_GEOCODER_URL=http://nominatim:8080/search \
//!   cargo run --bin starlight-server
//! ```
//!
//! # Environment Variables
//!
//! - `STARLIGHT_CONFIG`: Path to a `starlight.toml` (default: search standard locations)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `STARLIGHT_SKY_API_URL`: Base URL of the sky data service
//! - `STARLIGHT_GEOCODER_URL`: Nominatim-compatible search endpoint
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use starlight::config::StarlightConfig;
use starlight::http::{create_router, AppState};
use starlight::services::StarMapSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Starlight HTTP Server");

    let config = Arc::new(StarlightConfig::load()?);
    let session = Arc::new(StarMapSession::from_config(&config)?);
    info!(
        "Session ready ({}x{} canvas)",
        config.canvas.width, config.canvas.height
    );

    let state = AppState::new(session, Arc::clone(&config));
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
