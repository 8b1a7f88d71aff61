//! Response DTOs.

use serde::Serialize;

use realix_realtime::metrics::MetricsSnapshot;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Identities with a live session.
    pub active_sessions: usize,
    /// Values issued since start.
    pub issued_values: usize,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}
