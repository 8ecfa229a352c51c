//! HTTP server module for the star map service.
//!
//! The browser actions of the map page map onto endpoints over one shared
//! [`StarMapSession`](crate::services::StarMapSession).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON and binary (PNG/PDF) responses                    │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Session (services/session.rs)                            │
//! │  - View state, search, generate, exports                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Collaborators and rendering                              │
//! │  - Sky data service / Nominatim / demo sky                │
//! │  - Scene renderer on a tiny-skia surface                  │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
