//! # Starlight Map
//!
//! Personalized star map renderer.
//!
//! A map is a chart of the sky over one place at one instant, drawn on a
//! circular dome and framed by a dedication, a date/location stamp and a
//! watermark. Sky positions come from an external sky data service; when it
//! is unreachable a demo sky is drawn instead.
//!
//! ## Features
//!
//! - **Projection**: altitude/azimuth to dome pixels, North up and East right
//! - **Text Layout**: word wrapping by character count or rendered width
//! - **Scene Rendering**: stars, constellation figures, solar-system bodies,
//!   compass and captions on a tiny-skia surface
//! - **Session**: map location, geocoded search and map generation with a
//!   demo fallback
//! - **Export**: PNG and single-page PDF downloads
//! - **HTTP API**: axum endpoints for every page action
//!
//! ## Architecture
//!
//! - [`models`]: sky data, view state and render requests
//! - [`render`]: projection, layout and the scene renderer
//! - [`services`]: sky data and geocoding clients, session, exports
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{SessionError, StarlightError, StarlightResult};
