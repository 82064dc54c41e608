//! Transport error types.

use std::path::PathBuf;

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The worker process could not be started.
    #[error("Failed to spawn {path}: {source}")]
    SpawnError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during transport.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A frame exceeded the configured maximum length.
    #[error("Frame exceeds maximum length of {0} bytes")]
    FrameTooLong(usize),

    /// A frame was not valid UTF-8.
    #[error("Frame is not valid UTF-8")]
    InvalidUtf8,

    /// The transport was used after it reached its terminal state.
    #[error("Transport closed")]
    Closed,
}

impl TransportError {
    /// Create a spawn error.
    pub fn spawn(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SpawnError {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the peer is gone.
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::Closed => true,
            Self::IoError(e) => matches!(
                e.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }

    pub(crate) fn from_codec(error: LinesCodecError, max_frame_length: usize) -> Self {
        match error {
            LinesCodecError::MaxLineLengthExceeded => Self::FrameTooLong(max_frame_length),
            LinesCodecError::Io(e) => Self::IoError(e),
        }
    }
}
