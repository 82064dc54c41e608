//! Transport service - runs the worker endpoint on its configured transport.

use tracing::info;

use super::stdio::StdioTransport;
use super::{TransportConfig, TransportResult};
use crate::core::WorkerEndpoint;

/// Transport service - manages the transport layer for the worker.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Log information about the configured transport.
    pub fn log_info(&self) {
        info!("Starting transport: {}", self.config.description());
    }

    /// Serve the endpoint.
    ///
    /// This method blocks until the client closes the transport.
    pub async fn run(self, mut endpoint: WorkerEndpoint) -> TransportResult<()> {
        self.log_info();
        StdioTransport::run(&mut endpoint).await
    }
}
