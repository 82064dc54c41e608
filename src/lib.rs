//! Math MCP Server Library
//!
//! A small tool-invocation protocol: a worker process exposes named
//! arithmetic operations and a client session discovers and calls them over
//! the worker's stdin/stdout.
//!
//! # Architecture
//!
//! - **core**: configuration, logging, errors, the wire protocol, the
//!   worker endpoint and the transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: the operation registry and the math tool definitions
//! - **client**: the session that spawns and talks to a worker
//! - **presentation**: operand collection and result rendering for the CLI
//!
//! # Example
//!
//! ```rust,no_run
//! use math_mcp_server::{ClientSession, core::ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = ClientSession::connect(&ClientConfig::from_env()).await?;
//!     println!("{}", session.divide(10.0, 4.0).await?);
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod core;
pub mod domains;
pub mod presentation;

// Re-export commonly used types for convenience
pub use client::{ClientError, ClientSession};
pub use core::{Config, Error, Result, WorkerEndpoint};
