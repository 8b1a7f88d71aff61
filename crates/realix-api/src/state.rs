//! Application state shared across all handlers.

use std::sync::Arc;

use realix_core::config::AppConfig;
use realix_realtime::server::RealtimeEngine;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Real-time engine.
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    /// Bundles configuration and engine.
    pub fn new(config: AppConfig, realtime: RealtimeEngine) -> Self {
        Self {
            config: Arc::new(config),
            realtime: Arc::new(realtime),
        }
    }
}
