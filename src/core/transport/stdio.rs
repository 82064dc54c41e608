//! STDIO transport implementation.
//!
//! The worker side of the process pipe: requests arrive on stdin, responses
//! leave on stdout. Logs must never be written to stdout.

use tracing::info;

use super::TransportResult;
use crate::core::WorkerEndpoint;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the worker endpoint over this process's stdin/stdout until the
    /// client closes the pipe.
    pub async fn run(endpoint: &mut WorkerEndpoint) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        endpoint
            .run(tokio::io::stdin(), tokio::io::stdout())
            .await?;

        info!("STDIO transport finished");
        Ok(())
    }
}
