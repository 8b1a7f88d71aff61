//! Real-time session configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Close every live session once the accept loop has stopped.
    ///
    /// Off by default: live sessions outlive the listener and end only
    /// when their own read fails.
    #[serde(default)]
    pub close_sessions_on_shutdown: bool,
}
