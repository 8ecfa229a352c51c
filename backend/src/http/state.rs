//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::StarlightConfig;
use crate::services::StarMapSession;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The map session driven by the endpoints
    pub session: Arc<StarMapSession>,
    /// Effective configuration, read-only
    pub config: Arc<StarlightConfig>,
}

impl AppState {
    pub fn new(session: Arc<StarMapSession>, config: Arc<StarlightConfig>) -> Self {
        Self { session, config }
    }
}
