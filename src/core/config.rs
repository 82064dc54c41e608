//! Configuration management for the math worker and its clients.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. The same structure is
//! shared by the `math-worker` and `math-client` binaries: the worker reads
//! the server, logging and transport sections, the client reads the client
//! section.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// File name of the worker executable, without platform suffix.
pub const WORKER_BIN: &str = "math-worker";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Worker identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Client session configuration.
    pub client: ClientConfig,
}

/// Worker identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the worker as reported to clients during the handshake.
    pub name: String,

    /// The version of the worker.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for a client session.
///
/// Every wait on the worker is bounded: a stalled or crashed worker turns
/// into a `Connection` or `Timeout` error instead of hanging the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Path to the worker executable spawned by `ClientSession::connect`.
    pub worker_path: PathBuf,

    /// Extra arguments passed to the worker executable.
    pub worker_args: Vec<String>,

    /// Upper bound for the initialize exchange.
    pub handshake_timeout: Duration,

    /// Upper bound for a single request/response round trip.
    pub request_timeout: Duration,

    /// How long `close()` waits for the worker to exit before killing it.
    pub shutdown_timeout: Duration,

    /// Maximum accepted length of one incoming frame, in bytes.
    pub max_frame_length: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            worker_path: default_worker_path(),
            worker_args: Vec::new(),
            handshake_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(2),
            max_frame_length: super::transport::DEFAULT_MAX_FRAME_LENGTH,
        }
    }
}

impl ClientConfig {
    /// Create a client configuration for the worker at `path`.
    pub fn with_worker(path: impl Into<PathBuf>) -> Self {
        Self {
            worker_path: path.into(),
            ..Default::default()
        }
    }

    /// Load client configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("MATH_WORKER_PATH") {
            config.worker_path = PathBuf::from(path);
        }
        if let Some(timeout) = duration_from_env("MATH_HANDSHAKE_TIMEOUT_MS") {
            config.handshake_timeout = timeout;
        }
        if let Some(timeout) = duration_from_env("MATH_REQUEST_TIMEOUT_MS") {
            config.request_timeout = timeout;
        }
        if let Some(timeout) = duration_from_env("MATH_SHUTDOWN_TIMEOUT_MS") {
            config.shutdown_timeout = timeout;
        }
        if let Some(length) = std::env::var("MATH_MAX_FRAME_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.max_frame_length = length;
        }

        config
    }
}

/// The worker binary installed next to the running executable.
///
/// Falls back to a bare file name, resolved through `PATH` at spawn time.
fn default_worker_path() -> PathBuf {
    let file_name = format!("{}{}", WORKER_BIN, std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

fn duration_from_env(key: &str) -> Option<Duration> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            warn!("Ignoring {}={:?}: expected milliseconds", key, raw);
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "math-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MATH_`.
    /// For example: `MATH_SERVER_NAME`, `MATH_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MATH_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MATH_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MATH_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.parse().unwrap_or(true);
        }

        config.transport = TransportConfig::from_env();
        config.client = ClientConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_timeouts_are_bounded() {
        let config = ClientConfig::default();
        assert_eq!(config.handshake_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.shutdown_timeout < config.request_timeout);
    }

    #[test]
    fn test_default_worker_path_names_worker_binary() {
        let config = ClientConfig::default();
        let file_name = config.worker_path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with(WORKER_BIN));
    }

    #[test]
    fn test_client_config_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MATH_WORKER_PATH", "/opt/math/worker");
            std::env::set_var("MATH_REQUEST_TIMEOUT_MS", "1500");
        }
        let config = ClientConfig::from_env();
        assert_eq!(config.worker_path, PathBuf::from("/opt/math/worker"));
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        unsafe {
            std::env::remove_var("MATH_WORKER_PATH");
            std::env::remove_var("MATH_REQUEST_TIMEOUT_MS");
        }
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MATH_HANDSHAKE_TIMEOUT_MS", "soon");
        }
        let config = ClientConfig::from_env();
        assert_eq!(config.handshake_timeout, Duration::from_secs(10));
        unsafe {
            std::env::remove_var("MATH_HANDSHAKE_TIMEOUT_MS");
        }
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MATH_SERVER_NAME", "calc-worker");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "calc-worker");
        unsafe {
            std::env::remove_var("MATH_SERVER_NAME");
        }
    }
}
