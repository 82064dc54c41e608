//! Math worker entry point
//!
//! Serves the arithmetic tools over stdin/stdout until the client closes the
//! pipe. Logs go to stderr.

use anyhow::Result;
use tracing::info;

use math_mcp_server::core::{Config, TransportService, WorkerEndpoint, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let transport = TransportService::new(config.transport.clone());
    let endpoint = WorkerEndpoint::new(config)?;

    info!("Worker initialized with {} tools", endpoint.registry().len());

    transport.run(endpoint).await?;

    info!("Worker shutting down");

    Ok(())
}
