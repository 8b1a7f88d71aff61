//! Unique-value allocator configuration.

use serde::{Deserialize, Serialize};

/// Allocator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Inclusive upper bound `U` of the draw range `[1, U]`.
    ///
    /// Kept as a decimal string so bounds beyond 64 bits can be expressed
    /// in TOML and environment variables.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: String,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            upper_bound: default_upper_bound(),
        }
    }
}

fn default_upper_bound() -> String {
    "1000000000000000000".to_string()
}
