//! Client-side error types.

use std::time::Duration;

use thiserror::Error;

use crate::core::protocol::{ErrorKind, JsonRpcResponse};
use crate::core::transport::TransportError;

/// Result type for client session operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced to the caller of a client session.
///
/// Tool failures reported by the worker carry the worker's message verbatim.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The worker could not be started or the handshake failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The requested operation is not registered in the worker.
    #[error("{0}")]
    UnknownOperation(String),

    /// Arguments did not match the operation's parameter list.
    #[error("{0}")]
    InvalidArguments(String),

    /// The operation's precondition was violated (e.g. division by zero).
    #[error("{0}")]
    Domain(String),

    /// The worker went away while a call was in flight.
    #[error("Transport closed by worker")]
    TransportClosed,

    /// No response arrived within the configured bound.
    #[error("No response within {0:?}")]
    Timeout(Duration),

    /// The worker sent something the session cannot interpret.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Transport(TransportError),
}

impl ClientError {
    /// Create a new connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a new protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(format!("Invalid arguments: {}", msg.into()))
    }

    /// Whether the session is unusable after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Connection(_)
                | Self::TransportClosed
                | Self::Timeout(_)
                | Self::Protocol(_)
                | Self::Transport(_)
        )
    }

    /// Map a JSON-RPC error response to the matching variant.
    pub(crate) fn from_response(response: &JsonRpcResponse) -> Self {
        let Some(error) = response.error.as_ref() else {
            return Self::protocol("response carries neither result nor error");
        };
        match response.error_kind() {
            Some(ErrorKind::UnknownOperation) => Self::UnknownOperation(error.message.clone()),
            Some(ErrorKind::InvalidArguments) => Self::InvalidArguments(error.message.clone()),
            None => Self::Protocol(format!("{} (code {})", error.message, error.code)),
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(error: TransportError) -> Self {
        if error.is_disconnect() {
            Self::TransportClosed
        } else {
            Self::Transport(error)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Protocol(error.to_string())
    }
}
