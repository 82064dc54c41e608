//! Error types and handling for the math worker and client.
//!
//! This module defines a unified error type that can represent errors from
//! the tools domain, the transport layer and the client session, providing
//! consistent error handling for the binaries.

use thiserror::Error;

/// A specialized Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the framed transport.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// Error surfaced by a client session.
    #[error("Client error: {0}")]
    Client(#[from] crate::client::ClientError),

    /// I/O errors from process or pipe handling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
