//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Default upper bound for one frame (1 MiB).
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 1024 * 1024;

/// Transport configuration options for the worker side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Maximum accepted length of one incoming frame, in bytes.
    #[serde(default = "default_max_frame_length")]
    pub max_frame_length: usize,
}

fn default_max_frame_length() -> usize {
    DEFAULT_MAX_FRAME_LENGTH
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_frame_length: default_max_frame_length(),
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let max_frame_length = std::env::var("MATH_MAX_FRAME_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_frame_length);

        Self { max_frame_length }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        format!(
            "STDIO (newline-delimited JSON-RPC, max frame {} bytes)",
            self.max_frame_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_description() {
        let config = TransportConfig::default();
        assert!(config.description().starts_with("STDIO"));
        assert!(config.description().contains("1048576"));
    }

    #[test]
    fn test_deserialize_uses_default_frame_length() {
        let config: TransportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_frame_length, DEFAULT_MAX_FRAME_LENGTH);
    }
}
